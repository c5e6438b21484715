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

//! Parser of the profile completion message.

use crate::errors::BotError;

/// Keyword that separates the command from the details.
const DETAILS_KEYWORD: &str = "details";

/// Details sent by a user to complete the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDetails {
    pub name: String,
    pub aadhar: String,
}

impl TryFrom<&str> for ProfileDetails {
    type Error = BotError;

    /// Parse a message like `my profile details <name> / <aadhar>`.
    ///
    /// # Description
    ///
    /// The text is split at the first occurrence of the word _details_ (ignoring ASCII case), and the rest
    /// is split at `/`. Segments after the second one are ignored.
    fn try_from(text: &str) -> Result<Self, Self::Error> {
        // ASCII lowercasing keeps the byte offsets of the original text.
        let lowercase = text.to_ascii_lowercase();
        let start = lowercase
            .find(DETAILS_KEYWORD)
            .ok_or(BotError::InvalidFormat)?;
        let payload = &text[start + DETAILS_KEYWORD.len()..];

        let mut segments = payload.split('/');
        let (name, aadhar) = match (segments.next(), segments.next()) {
            (Some(name), Some(aadhar)) => (name.trim(), aadhar.trim()),
            _ => return Err(BotError::InvalidFormat),
        };

        if name.is_empty() || aadhar.is_empty() {
            return Err(BotError::InvalidFormat);
        }

        Ok(ProfileDetails {
            name: name.to_owned(),
            aadhar: aadhar.to_owned(),
        })
    }
}
