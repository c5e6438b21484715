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

//! Main router of the BusBot.
//!
//! # Description
//!
//! Every inbound event is classified into an intent and handed to one of the [crate::endpoints]. The router
//! keeps no state between events.
//!
//! Text messages are matched against an ordered list of commands, ignoring case and surrounding whitespace;
//! the first match wins. Callback events carry the token of the pressed button. Before routing a callback,
//! the router answers it, removes the keyboard of the message that held the button, if any, and shows the
//! typing indicator. Failures of those three steps are logged and never stop the handler.
//!
//! Errors returned by the handlers are turned into a user-facing message by [BotError::user_message].

use crate::{
    BotContext, HandlerResult, endpoints,
    errors::{BotError, MessengerError},
    messenger::{Messenger, OutboundMessage},
    store::TabularStore,
    users::{Role, user_lang_code},
};
use std::str::FromStr;
use teloxide::types::{ChatAction, ChatId, MessageId, Update, UpdateKind, User};
use tracing::{debug, error, info, warn};

/// The person that sent an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sender {
    pub user_id: u64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
}

impl Sender {
    /// Full name as shown by Telegram.
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {last}", self.first_name),
            _ => self.first_name.clone(),
        }
    }

    /// Language of the Telegram client of the sender.
    pub fn lang_code(&self) -> &'static str {
        user_lang_code(self.language_code.as_deref())
    }
}

impl From<User> for Sender {
    fn from(user: User) -> Self {
        Sender {
            user_id: user.id.0,
            first_name: user.first_name,
            last_name: user.last_name,
            language_code: user.language_code,
        }
    }
}

/// An event received from the messaging platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Text {
        chat_id: ChatId,
        body: String,
        sender: Sender,
    },
    /// A button press.
    ///
    /// Buttons of inline messages have no message in a chat: `message_id` is `None` and `chat_id` is the
    /// private chat of the sender.
    Callback {
        callback_id: String,
        data: String,
        chat_id: ChatId,
        message_id: Option<MessageId>,
        sender: Sender,
    },
}

impl InboundEvent {
    /// Build an event out of a Telegram update.
    ///
    /// # Description
    ///
    /// Only text messages and callback queries are handled, any other update yields `None`.
    pub fn from_update(update: Update) -> Option<Self> {
        match update.kind {
            UpdateKind::Message(message) => Some(InboundEvent::Text {
                chat_id: message.chat.id,
                body: message.text()?.to_owned(),
                sender: message.from.map(Sender::from).unwrap_or_default(),
            }),
            UpdateKind::CallbackQuery(query) => {
                let (chat_id, message_id) = match &query.message {
                    Some(message) => (message.chat().id, Some(message.id())),
                    None => (ChatId::from(query.from.id), None),
                };

                Some(InboundEvent::Callback {
                    callback_id: query.id.0,
                    data: query.data.unwrap_or_default(),
                    chat_id,
                    message_id,
                    sender: Sender::from(query.from),
                })
            }
            _ => None,
        }
    }
}

/// Purpose of a text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextIntent {
    Register,
    Help,
    ProfileUpdate,
    BusSearch,
    SeatMap,
    BookSeat,
    LanguageMenu,
    Status,
    MyBooking,
    CancelBooking,
    ProfileView,
    LiveTracking,
    Greeting,
    Unknown,
}

/// Purpose of a button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackIntent {
    RegisterRole(Role),
    BookBus,
    MyBooking,
    MyProfile,
    Help,
    Status,
    Language(String),
    Unknown,
}

enum Rule {
    Exact(&'static [&'static str]),
    Prefix(&'static str),
}

/// Text commands in matching order.
const TEXT_RULES: [(Rule, TextIntent); 13] = [
    (Rule::Exact(&["/start"]), TextIntent::Register),
    (Rule::Exact(&["help", "/help"]), TextIntent::Help),
    (Rule::Prefix("my profile details"), TextIntent::ProfileUpdate),
    (Rule::Exact(&["book bus", "/book"]), TextIntent::BusSearch),
    (Rule::Prefix("show seats"), TextIntent::SeatMap),
    (Rule::Prefix("book seat"), TextIntent::BookSeat),
    (Rule::Exact(&["/language", "language"]), TextIntent::LanguageMenu),
    (Rule::Exact(&["status", "/status"]), TextIntent::Status),
    (Rule::Exact(&["my booking", "my tickets"]), TextIntent::MyBooking),
    (Rule::Prefix("cancel booking"), TextIntent::CancelBooking),
    (Rule::Exact(&["my profile", "/profile"]), TextIntent::ProfileView),
    (Rule::Prefix("live tracking"), TextIntent::LiveTracking),
    (Rule::Exact(&["hello", "hi", "hey"]), TextIntent::Greeting),
];

/// Classify a text message.
pub fn classify_text(text: &str) -> TextIntent {
    let text = text.trim().to_lowercase();

    TEXT_RULES
        .iter()
        .find(|(rule, _)| match rule {
            Rule::Exact(options) => options.contains(&text.as_str()),
            Rule::Prefix(prefix) => text.starts_with(prefix),
        })
        .map(|(_, intent)| *intent)
        .unwrap_or(TextIntent::Unknown)
}

/// Classify the payload of a button press.
pub fn classify_callback(data: &str) -> CallbackIntent {
    if let Some(role) = data.strip_prefix("cb_register_role_") {
        return Role::from_str(role)
            .map(CallbackIntent::RegisterRole)
            .unwrap_or(CallbackIntent::Unknown);
    }
    if let Some(code) = data.strip_prefix("lang_") {
        return CallbackIntent::Language(code.to_owned());
    }

    match data {
        "cb_book_bus" => CallbackIntent::BookBus,
        "cb_my_booking" => CallbackIntent::MyBooking,
        "cb_my_profile" => CallbackIntent::MyProfile,
        "cb_help" => CallbackIntent::Help,
        "cb_status" => CallbackIntent::Status,
        _ => CallbackIntent::Unknown,
    }
}

impl<S: TabularStore, M: Messenger> BotContext<S, M> {
    /// Handle an inbound event.
    ///
    /// # Description
    ///
    /// Errors of the handler are reported to the user and logged. The report is written in the language
    /// stored in the profile of the user, or in the language of their Telegram client when there is none.
    /// The returned value is only an error when the error report couldn't be delivered either.
    pub async fn dispatch(&self, event: InboundEvent) -> HandlerResult {
        let (chat_id, sender, result) = match event {
            InboundEvent::Text {
                chat_id,
                body,
                sender,
            } => {
                let result = self.route_text(chat_id, &body, &sender).await;
                (chat_id, sender, result)
            }
            InboundEvent::Callback {
                callback_id,
                data,
                chat_id,
                message_id,
                sender,
            } => {
                self.callback_preamble(callback_id, chat_id, message_id)
                    .await;
                let result = self.route_callback(chat_id, &data, &sender).await;
                (chat_id, sender, result)
            }
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("Handler failed for chat {chat_id}: {e}");
                let lang_code = self.users.lang_code(chat_id, sender.lang_code()).await;
                self.messenger
                    .send_message(OutboundMessage::new(chat_id, e.user_message(lang_code)).html())
                    .await?;
                Ok(())
            }
        }
    }

    /// Side effects that precede the handler of every callback.
    async fn callback_preamble(
        &self,
        callback_id: String,
        chat_id: ChatId,
        message_id: Option<MessageId>,
    ) {
        if let Err(e) = self.messenger.answer_callback(callback_id).await {
            error!("Failed to answer a callback query: {e}");
        }

        if let Some(message_id) = message_id {
            match self.messenger.clear_reply_markup(chat_id, message_id).await {
                Ok(()) | Err(MessengerError::NotModified) => (),
                Err(e) => warn!("Failed to remove the keyboard of message {}: {e}", message_id.0),
            }
        }

        if let Err(e) = self
            .messenger
            .send_chat_action(chat_id, ChatAction::Typing)
            .await
        {
            warn!("Failed to send the typing indicator: {e}");
        }
    }

    async fn route_text(
        &self,
        chat_id: ChatId,
        text: &str,
        sender: &Sender,
    ) -> Result<(), BotError> {
        let intent = classify_text(text);
        info!("Text message routed to {intent:?}");
        debug!("Message: {text}");

        match intent {
            TextIntent::Register => endpoints::start(self, chat_id, sender).await,
            TextIntent::Help => endpoints::help(self, chat_id).await,
            TextIntent::ProfileUpdate => endpoints::update_profile(self, chat_id, text).await,
            TextIntent::BusSearch => endpoints::bus_search(self, chat_id).await,
            TextIntent::SeatMap => endpoints::seat_map(self, chat_id, text).await,
            TextIntent::BookSeat => endpoints::book_seat(self, chat_id, text).await,
            TextIntent::LanguageMenu => endpoints::language_menu(self, chat_id).await,
            TextIntent::Status => endpoints::status(self, chat_id).await,
            TextIntent::MyBooking => endpoints::my_booking(self, chat_id).await,
            TextIntent::CancelBooking => endpoints::cancel_booking(self, chat_id, text).await,
            TextIntent::ProfileView => endpoints::show_profile(self, chat_id).await,
            TextIntent::LiveTracking => endpoints::live_tracking(self, chat_id, text).await,
            TextIntent::Greeting => endpoints::greet(self, chat_id, sender).await,
            TextIntent::Unknown => endpoints::default(self, chat_id).await,
        }
    }

    async fn route_callback(
        &self,
        chat_id: ChatId,
        data: &str,
        sender: &Sender,
    ) -> Result<(), BotError> {
        let intent = classify_callback(data);
        info!("Callback routed to {intent:?}");

        match intent {
            CallbackIntent::RegisterRole(role) => {
                endpoints::register_role(self, chat_id, sender, role).await
            }
            CallbackIntent::BookBus => endpoints::bus_search(self, chat_id).await,
            CallbackIntent::MyBooking => endpoints::my_booking(self, chat_id).await,
            CallbackIntent::MyProfile => endpoints::show_profile(self, chat_id).await,
            CallbackIntent::Help => endpoints::help(self, chat_id).await,
            CallbackIntent::Status => endpoints::status(self, chat_id).await,
            CallbackIntent::Language(code) => endpoints::set_language(self, chat_id, &code).await,
            CallbackIntent::Unknown => {
                warn!("Unknown callback payload: {data}");
                endpoints::default(self, chat_id).await
            }
        }
    }
}
