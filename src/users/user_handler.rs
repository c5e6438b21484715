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

//! Module that includes all the logic related to the management of the user's records.
//!
//! # Description
//!
//! The `struct` [UserHandler] is the API for external modules that aim to request or modify data related to
//! users of the bot. The records are stored in the `Users` table of the tabular store, which is hidden from
//! the rest of the modules of BusBot.
//!
//! Every method resolves the row of the user again before writing to it. Two requests of the same user
//! racing on the same row are not protected by any lock.

use crate::{
    errors::{BotError, StoreError},
    store::{CellUpdate, RowHandle, TabularStore, USERS, find_row_by_key},
    users::{
        ProfileDetails, RegistrationEvent, RegistrationState, Role, SUPPORTED_LANGUAGES, UserColumn,
        UserRecord, UserStatus,
    },
};
use chrono::Utc;
use std::sync::Arc;
use teloxide::types::ChatId;
use tracing::{debug, info, warn};

/// Handler for the management of the user's records.
pub struct UserHandler<S> {
    store: Arc<S>,
}

/// Outcome of a registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// A new row was appended.
    Created(UserRecord),
    /// The chat already had a row, nothing was written.
    AlreadyRegistered(UserRecord),
}

impl<S: TabularStore> UserHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        UserHandler { store }
    }

    /// Resolve the row of a chat. The handle must not outlive the current operation.
    async fn lookup(&self, chat_id: ChatId) -> Result<Option<RowHandle>, StoreError> {
        find_row_by_key(
            self.store.as_ref(),
            &USERS,
            UserColumn::ChatId.index(),
            &chat_id.0.to_string(),
        )
        .await
    }

    /// Retrieve the record of a chat, if it was registered.
    pub async fn find_user(&self, chat_id: ChatId) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .lookup(chat_id)
            .await?
            .map(|handle| UserRecord::from_row(&handle.values)))
    }

    /// Language of the replies for a chat.
    ///
    /// # Description
    ///
    /// The language stored in the profile wins over `fallback`, which is usually the language of the
    /// Telegram client. A missing row, an empty or unsupported value, or a failing store resolve to
    /// `fallback`.
    pub async fn lang_code(&self, chat_id: ChatId, fallback: &'static str) -> &'static str {
        match self.find_user(chat_id).await {
            Ok(Some(user)) => SUPPORTED_LANGUAGES
                .iter()
                .map(|(code, _)| *code)
                .find(|code| *code == user.lang.trim())
                .unwrap_or(fallback),
            Ok(None) => fallback,
            Err(e) => {
                warn!("Failed to read the language of chat {chat_id}: {e}");
                fallback
            }
        }
    }

    /// Register a new user with the chosen role.
    ///
    /// # Description
    ///
    /// When the chat already has a row, the existing record is returned and nothing is written, so a user
    /// never ends up with two rows.
    pub async fn register_user(
        &self,
        chat_id: ChatId,
        name: &str,
        role: Role,
    ) -> Result<Registration, BotError> {
        let existing = self.find_user(chat_id).await?;

        let next = match RegistrationState::of(existing.as_ref())
            .transition(RegistrationEvent::ChooseRole)
        {
            Ok(next) => next,
            Err(e) => {
                info!("The chat {chat_id} was already registered: {e}");
                return existing.map(Registration::AlreadyRegistered).ok_or(e);
            }
        };
        debug!("Registration of chat {chat_id} moves to {next:?}");

        let record = UserRecord::new(name, &chat_id.0.to_string(), role, Utc::now());
        self.store
            .append_row(&USERS.full_range(), record.to_row())
            .await?;

        info!("New user {} registered as {role}", record.user_id);

        Ok(Registration::Created(record))
    }

    /// Complete the profile of a registered user.
    ///
    /// # Description
    ///
    /// Exactly three cells are written: the name, the Aadhar number and the status.
    pub async fn update_profile(
        &self,
        chat_id: ChatId,
        details: &ProfileDetails,
    ) -> Result<(), BotError> {
        let handle = self.lookup(chat_id).await?.ok_or(BotError::UserNotFound)?;
        let record = UserRecord::from_row(&handle.values);

        let next = record.state().transition(RegistrationEvent::SubmitDetails)?;
        debug!("Registration state: {:?} -> {next:?}", record.state());

        self.store
            .batch_update(vec![
                CellUpdate::new(handle.cell(&USERS, UserColumn::Name.index()), &details.name),
                CellUpdate::new(
                    handle.cell(&USERS, UserColumn::Aadhar.index()),
                    &details.aadhar,
                ),
                CellUpdate::new(
                    handle.cell(&USERS, UserColumn::Status.index()),
                    UserStatus::Active.to_string(),
                ),
            ])
            .await?;

        info!("Profile of {} updated", record.user_id);

        Ok(())
    }

    /// Store the preferred language of a registered user.
    pub async fn set_language(&self, chat_id: ChatId, lang_code: &str) -> Result<(), BotError> {
        let handle = self.lookup(chat_id).await?.ok_or(BotError::UserNotFound)?;

        self.store
            .batch_update(vec![CellUpdate::new(
                handle.cell(&USERS, UserColumn::Lang.index()),
                lang_code,
            )])
            .await?;

        Ok(())
    }

    /// List all the users of the table.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        let rows = self.store.read_range(&USERS.full_range()).await?;

        if rows.is_empty() {
            warn!("The users table has no header");
        }

        Ok(rows
            .iter()
            .skip(1)
            .map(|row| UserRecord::from_row(row))
            .collect())
    }
}
