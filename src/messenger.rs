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

//! Messaging platform module.
//!
//! # Description
//!
//! The handlers of the bot only need four operations from Telegram. They are gathered in the trait
//! [Messenger], which is implemented for the throttled Teloxide's bot used in production.

use crate::errors::MessengerError;
use std::future::Future;
use teloxide::{
    ApiError, Bot, RequestError,
    adaptors::Throttle,
    payloads::SendMessageSetters,
    prelude::Requester,
    types::{CallbackQueryId, ChatAction, ChatId, InlineKeyboardMarkup, MessageId, ParseMode},
};

/// A text message that is sent to a chat.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub parse_mode: Option<ParseMode>,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl OutboundMessage {
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        OutboundMessage {
            chat_id,
            text: text.into(),
            parse_mode: None,
            keyboard: None,
        }
    }

    /// Format the text as HTML.
    pub fn html(mut self) -> Self {
        self.parse_mode = Some(ParseMode::Html);
        self
    }

    pub fn keyboard(mut self, keyboard: InlineKeyboardMarkup) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Operations of the messaging platform used by the handlers.
pub trait Messenger: Send + Sync {
    fn send_message(
        &self,
        message: OutboundMessage,
    ) -> impl Future<Output = Result<(), MessengerError>> + Send;

    fn send_chat_action(
        &self,
        chat_id: ChatId,
        action: ChatAction,
    ) -> impl Future<Output = Result<(), MessengerError>> + Send;

    /// Stop the spinner shown by the client after a button press.
    fn answer_callback(
        &self,
        callback_id: String,
    ) -> impl Future<Output = Result<(), MessengerError>> + Send;

    /// Remove the inline keyboard of a message.
    fn clear_reply_markup(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> impl Future<Output = Result<(), MessengerError>> + Send;
}

impl From<RequestError> for MessengerError {
    fn from(value: RequestError) -> Self {
        match value {
            RequestError::Api(ApiError::MessageNotModified) => MessengerError::NotModified,
            e => MessengerError::Api(e.to_string()),
        }
    }
}

impl Messenger for Throttle<Bot> {
    async fn send_message(&self, message: OutboundMessage) -> Result<(), MessengerError> {
        let mut request = Requester::send_message(self, message.chat_id, message.text);

        if let Some(parse_mode) = message.parse_mode {
            request = request.parse_mode(parse_mode);
        }
        if let Some(keyboard) = message.keyboard {
            request = request.reply_markup(keyboard);
        }

        request.await?;

        Ok(())
    }

    async fn send_chat_action(
        &self,
        chat_id: ChatId,
        action: ChatAction,
    ) -> Result<(), MessengerError> {
        Requester::send_chat_action(self, chat_id, action).await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: String) -> Result<(), MessengerError> {
        self.answer_callback_query(CallbackQueryId(callback_id))
            .await?;
        Ok(())
    }

    async fn clear_reply_markup(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), MessengerError> {
        // Omitting the markup removes the inline keyboard.
        self.edit_message_reply_markup(chat_id, message_id).await?;
        Ok(())
    }
}
