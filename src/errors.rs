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
//    limitations under the License.

//! Custom error types.
//!
//! # Description
//!
//! Errors are tagged where they happen: the store client decides whether a failure is a credentials,
//! an authorisation or a permission problem, and the handlers only switch on the variants to pick the
//! message that is shown to the user. Raw error text never leaves the logs.

use crate::users::RegistrationState;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors raised by the tabular store client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store credentials are missing or malformed: {0}")]
    Unavailable(String),
    #[error("the store rejected the service identity: {0}")]
    Auth(String),
    #[error("access to the store document was denied: {0}")]
    Permission(String),
    #[error("unexpected error from the store: {0}")]
    Unexpected(String),
}

/// Errors raised by the messaging platform adaptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessengerError {
    /// The platform refused an edit because the content did not change.
    #[error("message is not modified")]
    NotModified,
    #[error("messaging platform error: {0}")]
    Api(String),
}

/// Errors that reach the boundary of a handler.
#[derive(Error, Debug)]
pub enum BotError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Messenger(#[from] MessengerError),
    #[error("the chat is not registered")]
    UserNotFound,
    #[error("wrong format of the profile details")]
    InvalidFormat,
    #[error("no bus ID found in the request")]
    MissingBusId,
    #[error("no seats found for {0}")]
    NoSeatsFound(String),
    #[error("the seats sheet returned no data")]
    SeatDataUnavailable,
    #[error("illegal registration transition from {from:?}")]
    IllegalTransition { from: RegistrationState },
}

/// Categories of user-facing messages for store failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Access,
    Retry,
}

impl StoreError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StoreError::Unavailable(_) | StoreError::Auth(_) => ErrorCategory::Configuration,
            StoreError::Permission(_) => ErrorCategory::Access,
            StoreError::Unexpected(_) => ErrorCategory::Retry,
        }
    }
}

impl BotError {
    /// Message that is sent to the user when a handler fails.
    pub fn user_message(&self, lang_code: &str) -> String {
        match self {
            BotError::Store(e) => store_message(e.category(), lang_code).to_owned(),
            BotError::InvalidFormat => {
                include_str!("../data/templates/profile_format_en.txt").to_owned()
            }
            BotError::UserNotFound => {
                "👤 You are not registered yet. Please send /start to create your profile."
                    .to_owned()
            }
            BotError::MissingBusId => {
                "🚌 Please include a bus ID, for example: <code>show seats BUS101</code>".to_owned()
            }
            BotError::NoSeatsFound(bus_id) => {
                format!(
                    "🚌 No seats were found for <b>{bus_id}</b>. Check the bus ID and try again."
                )
            }
            BotError::Messenger(_)
            | BotError::SeatDataUnavailable
            | BotError::IllegalTransition { .. } => error_message(lang_code).to_owned(),
        }
    }
}

fn store_message(category: ErrorCategory, lang_code: &str) -> &str {
    match category {
        ErrorCategory::Configuration => configuration_message(lang_code),
        ErrorCategory::Access => access_message(lang_code),
        ErrorCategory::Retry => error_message(lang_code),
    }
}

pub(crate) fn error_message(lang_code: &str) -> &str {
    match lang_code {
        "hi" => "🚒 एक त्रुटि हुई, कृपया बाद में पुनः प्रयास करें",
        _ => "🚒 Something went wrong, please try again later",
    }
}

fn configuration_message(lang_code: &str) -> &str {
    match lang_code {
        "hi" => "⚙️ सेवा अभी कॉन्फ़िगर नहीं है, कृपया बाद में प्रयास करें",
        _ => "⚙️ The service is not configured properly right now. Please try again later.",
    }
}

fn access_message(lang_code: &str) -> &str {
    match lang_code {
        "hi" => "🔒 सेवा डेटा तक नहीं पहुँच सकती, कृपया बाद में प्रयास करें",
        _ => "🔒 The service can't access its records right now. Please try again later.",
    }
}

/// Failure body of the scheduled tracking endpoint.
#[derive(Debug)]
pub struct TrackingError(pub BotError);

impl IntoResponse for TrackingError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "success": false,
            "message": "Tracking job failed",
            "error": self.0.to_string(),
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
