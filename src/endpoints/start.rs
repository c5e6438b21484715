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

//! Handlers for the /start command and the role selection.

use crate::{
    BotContext, HandlerResult,
    keyboards::{main_menu_keyboard, role_keyboard},
    messenger::{Messenger, OutboundMessage},
    router::Sender,
    store::TabularStore,
    users::{Registration, Role, UserRecord},
};
use teloxide::{types::ChatId, utils::html};
use tracing::info;

/// Start handler.
///
/// # Description
///
/// Unregistered chats get the role selection keyboard. Registered chats, whatever the status of their
/// profile, get the main menu.
#[tracing::instrument(
    name = "Start handler",
    skip_all,
    fields(
        chat_id = %chat_id,
    )
)]
pub async fn start<S: TabularStore, M: Messenger>(
    ctx: &BotContext<S, M>,
    chat_id: ChatId,
    sender: &Sender,
) -> HandlerResult {
    info!("Command /start called");

    match ctx.users.find_user(chat_id).await? {
        Some(user) => welcome_back(ctx, chat_id, &user).await,
        None => {
            let welcome = include_str!("../../data/templates/welcome_en.txt");
            ctx.messenger
                .send_message(
                    OutboundMessage::new(chat_id, welcome)
                        .html()
                        .keyboard(role_keyboard()),
                )
                .await?;
            info!("Role selection sent to {}", sender.user_id);
            Ok(())
        }
    }
}

/// Role selection handler.
#[tracing::instrument(
    name = "Register role handler",
    skip_all,
    fields(
        chat_id = %chat_id,
        role = %role,
    )
)]
pub async fn register_role<S: TabularStore, M: Messenger>(
    ctx: &BotContext<S, M>,
    chat_id: ChatId,
    sender: &Sender,
    role: Role,
) -> HandlerResult {
    match ctx
        .users
        .register_user(chat_id, &sender.display_name(), role)
        .await?
    {
        Registration::Created(_) => {
            ctx.messenger
                .send_message(
                    OutboundMessage::new(
                        chat_id,
                        format!(include_str!("../../data/templates/registration_en.txt"), role),
                    )
                    .html(),
                )
                .await?;
            Ok(())
        }
        Registration::AlreadyRegistered(user) => welcome_back(ctx, chat_id, &user).await,
    }
}

async fn welcome_back<S: TabularStore, M: Messenger>(
    ctx: &BotContext<S, M>,
    chat_id: ChatId,
    user: &UserRecord,
) -> HandlerResult {
    let name = if user.name.is_empty() {
        "traveller".to_owned()
    } else {
        html::escape(&user.name)
    };

    ctx.messenger
        .send_message(
            OutboundMessage::new(chat_id, format!("👋 Welcome back, <b>{name}</b>!")).html(),
        )
        .await?;
    ctx.messenger
        .send_message(
            OutboundMessage::new(chat_id, "🧭 <b>Main menu</b>")
                .html()
                .keyboard(main_menu_keyboard()),
        )
        .await?;

    Ok(())
}
