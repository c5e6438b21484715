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

//! Keyboards module
//!
//! # Description
//!
//! This module includes all the keyboards that are used within the handlers of the bot. The payloads of the
//! buttons are the callback tokens understood by [crate::router::CallbackIntent].

use crate::users::SUPPORTED_LANGUAGES;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// How many language buttons to show per row.
const LANGUAGES_PER_ROW: usize = 3;

/// Keyboard shown after `/start` to unregistered users.
pub fn role_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        vec![InlineKeyboardButton::callback(
            "🧳 Passenger",
            "cb_register_role_user",
        )],
        vec![InlineKeyboardButton::callback(
            "🧑‍💼 Manager",
            "cb_register_role_manager",
        )],
        vec![InlineKeyboardButton::callback(
            "🚌 Bus owner",
            "cb_register_role_owner",
        )],
    ])
}

/// Main menu of the bot.
pub fn main_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        vec![
            InlineKeyboardButton::callback("🎫 Book bus", "cb_book_bus"),
            InlineKeyboardButton::callback("📋 My booking", "cb_my_booking"),
        ],
        vec![
            InlineKeyboardButton::callback("👤 My profile", "cb_my_profile"),
            InlineKeyboardButton::callback("❓ Help", "cb_help"),
        ],
        vec![InlineKeyboardButton::callback("🟢 Status", "cb_status")],
    ])
}

pub fn language_keyboard() -> InlineKeyboardMarkup {
    let mut keyboard_markup = InlineKeyboardMarkup::default();

    for chunk in SUPPORTED_LANGUAGES.chunks(LANGUAGES_PER_ROW) {
        keyboard_markup = keyboard_markup.append_row(
            chunk
                .iter()
                .map(|(code, name)| InlineKeyboardButton::callback(*name, format!("lang_{code}"))),
        );
    }

    keyboard_markup
}
