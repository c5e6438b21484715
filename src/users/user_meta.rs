// Copyright 2025 Felipe Torres González
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and

//! Module that contains definitions related to the records of the users of the bot.

use crate::errors::BotError;
use chrono::{DateTime, Utc};
use std::str::FromStr;

/// Columns of the `Users` table, in store order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserColumn {
    UserId = 0,
    Name = 1,
    ChatId = 2,
    Phone = 3,
    Aadhar = 4,
    Status = 5,
    Role = 6,
    Lang = 7,
    JoinDate = 8,
}

impl UserColumn {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Role chosen by the user when registering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Manager,
    Owner,
}

impl FromStr for Role {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "manager" => Ok(Role::Manager),
            "owner" => Ok(Role::Owner),
            _ => Err("Invalid Role type"),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Manager => write!(f, "manager"),
            Role::Owner => write!(f, "owner"),
        }
    }
}

/// Value of the `Status` column.
///
/// # Description
///
/// Statuses written by other tools are kept as they are in [UserStatus::Other], so they are never
/// overwritten by accident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserStatus {
    PendingDetails,
    Active,
    Other(String),
}

impl From<&str> for UserStatus {
    fn from(value: &str) -> Self {
        match value {
            "pending_details" => UserStatus::PendingDetails,
            "active" => UserStatus::Active,
            other => UserStatus::Other(other.to_owned()),
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::PendingDetails => write!(f, "pending_details"),
            UserStatus::Active => write!(f, "active"),
            UserStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Registration state machine.
///
/// # Description
///
/// ```text
/// Unregistered --ChooseRole--> RoleChosen --SubmitDetails--> Active
///                                             Active --SubmitDetails--> Active
/// ```
///
/// Any other combination is rejected with [BotError::IllegalTransition].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Unregistered,
    RoleChosen,
    Active,
}

/// Events that move the registration state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationEvent {
    ChooseRole,
    SubmitDetails,
}

impl RegistrationState {
    /// State of a user given its record, if any.
    pub fn of(record: Option<&UserRecord>) -> Self {
        match record.map(|r| &r.status) {
            None => RegistrationState::Unregistered,
            Some(UserStatus::Active) => RegistrationState::Active,
            // Unknown statuses are considered as incomplete profiles.
            Some(_) => RegistrationState::RoleChosen,
        }
    }

    pub fn transition(self, event: RegistrationEvent) -> Result<Self, BotError> {
        match (self, event) {
            (RegistrationState::Unregistered, RegistrationEvent::ChooseRole) => {
                Ok(RegistrationState::RoleChosen)
            }
            (
                RegistrationState::RoleChosen | RegistrationState::Active,
                RegistrationEvent::SubmitDetails,
            ) => Ok(RegistrationState::Active),
            (from, _) => Err(BotError::IllegalTransition { from }),
        }
    }
}

/// A row of the `Users` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: String,
    pub name: String,
    pub chat_id: String,
    pub phone: String,
    pub aadhar: String,
    pub status: UserStatus,
    pub role: String,
    pub lang: String,
    pub join_date: String,
}

impl UserRecord {
    /// Build the record of a user that just chose a role.
    pub fn new(name: &str, chat_id: &str, role: Role, now: DateTime<Utc>) -> Self {
        UserRecord {
            user_id: format!("USER{}", now.timestamp_millis()),
            name: name.to_owned(),
            chat_id: chat_id.to_owned(),
            phone: String::new(),
            aadhar: String::new(),
            status: UserStatus::PendingDetails,
            role: role.to_string(),
            lang: "en".to_owned(),
            join_date: now.to_rfc3339(),
        }
    }

    /// Parse a row of the store. Missing trailing cells are read as empty values.
    pub fn from_row(row: &[String]) -> Self {
        let cell = |column: UserColumn| row.get(column.index()).cloned().unwrap_or_default();

        UserRecord {
            user_id: cell(UserColumn::UserId),
            name: cell(UserColumn::Name),
            chat_id: cell(UserColumn::ChatId),
            phone: cell(UserColumn::Phone),
            aadhar: cell(UserColumn::Aadhar),
            status: UserStatus::from(cell(UserColumn::Status).as_str()),
            role: cell(UserColumn::Role),
            lang: cell(UserColumn::Lang),
            join_date: cell(UserColumn::JoinDate),
        }
    }

    /// Values in the order of the columns of the table.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.user_id.clone(),
            self.name.clone(),
            self.chat_id.clone(),
            self.phone.clone(),
            self.aadhar.clone(),
            self.status.to_string(),
            self.role.clone(),
            self.lang.clone(),
            self.join_date.clone(),
        ]
    }

    pub fn state(&self) -> RegistrationState {
        RegistrationState::of(Some(self))
    }
}
