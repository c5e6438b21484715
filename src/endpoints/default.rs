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

//! Handlers for greetings and unknown messages.

use crate::{
    BotContext, HandlerResult,
    messenger::{Messenger, OutboundMessage},
    router::Sender,
    store::TabularStore,
};
use teloxide::{types::ChatId, utils::html};
use tracing::{error, info};

/// Default handler.
#[tracing::instrument(
    name = "Default handler",
    skip_all,
    fields(
        chat_id = %chat_id,
    )
)]
pub async fn default<S: TabularStore, M: Messenger>(
    ctx: &BotContext<S, M>,
    chat_id: ChatId,
) -> HandlerResult {
    info!("Unknown message received");

    ctx.messenger
        .send_message(
            OutboundMessage::new(chat_id, include_str!("../../data/templates/warning_en.txt"))
                .html(),
        )
        .await?;

    Ok(())
}

/// Greeting handler.
///
/// # Description
///
/// Registered users are greeted with the name of their profile, anybody else with the name of their
/// Telegram account. A failure of the store doesn't prevent the greeting.
#[tracing::instrument(
    name = "Greeting handler",
    skip_all,
    fields(
        chat_id = %chat_id,
    )
)]
pub async fn greet<S: TabularStore, M: Messenger>(
    ctx: &BotContext<S, M>,
    chat_id: ChatId,
    sender: &Sender,
) -> HandlerResult {
    let name = match ctx.users.find_user(chat_id).await {
        Ok(Some(user)) if !user.name.is_empty() => user.name,
        Ok(_) => sender.first_name.clone(),
        Err(e) => {
            error!("Failed to retrieve the user of the chat: {e}");
            sender.first_name.clone()
        }
    };

    ctx.messenger
        .send_message(
            OutboundMessage::new(
                chat_id,
                format!(
                    "👋 Hello, <b>{}</b>! Send <b>help</b> to see what I can do.",
                    html::escape(&name)
                ),
            )
            .html(),
        )
        .await?;

    Ok(())
}
