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

//! Users of the bot: records, registration state machine and profile parsing.

mod profile;
mod user_handler;
mod user_meta;

pub use profile::ProfileDetails;
pub use user_handler::{Registration, UserHandler};
pub use user_meta::{
    RegistrationEvent, RegistrationState, Role, UserColumn, UserRecord, UserStatus,
};

/// Languages offered in the language menu.
pub const SUPPORTED_LANGUAGES: [(&str, &str); 3] =
    [("en", "English"), ("hi", "हिन्दी"), ("te", "తెలుగు")];

/// Language code used for the replies of a user.
///
/// # Description
///
/// Only the language code sent by Telegram is considered. Anything that is not supported falls back to
/// English.
pub fn user_lang_code(telegram_code: Option<&str>) -> &'static str {
    let code = telegram_code.unwrap_or("en");

    SUPPORTED_LANGUAGES
        .iter()
        .map(|(c, _)| *c)
        .find(|c| code.starts_with(c))
        .unwrap_or("en")
}
