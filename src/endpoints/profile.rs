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

//! Handlers for the profile of the user.

use crate::{
    BotContext, HandlerResult,
    errors::BotError,
    messenger::{Messenger, OutboundMessage},
    store::TabularStore,
    users::{ProfileDetails, UserRecord, UserStatus},
};
use teloxide::{types::ChatId, utils::html};
use tracing::{debug, info};

const NOT_SET: &str = "Not set";

/// Profile update handler.
///
/// # Description
///
/// The message must follow the format `my profile details <name> / <aadhar>`. Nothing is written to the
/// store when the format is wrong. After the update, the profile is read again and shown to the user.
#[tracing::instrument(
    name = "Update profile handler",
    skip_all,
    fields(
        chat_id = %chat_id,
    )
)]
pub async fn update_profile<S: TabularStore, M: Messenger>(
    ctx: &BotContext<S, M>,
    chat_id: ChatId,
    text: &str,
) -> HandlerResult {
    let details = ProfileDetails::try_from(text)?;
    debug!("Profile details: {details:?}");

    ctx.users.update_profile(chat_id, &details).await?;
    info!("Profile completed");

    ctx.messenger
        .send_message(
            OutboundMessage::new(chat_id, "✅ <b>Your profile has been updated!</b>").html(),
        )
        .await?;

    show_profile(ctx, chat_id).await
}

/// Profile view handler.
#[tracing::instrument(
    name = "Show profile handler",
    skip_all,
    fields(
        chat_id = %chat_id,
    )
)]
pub async fn show_profile<S: TabularStore, M: Messenger>(
    ctx: &BotContext<S, M>,
    chat_id: ChatId,
) -> HandlerResult {
    let user = ctx
        .users
        .find_user(chat_id)
        .await?
        .ok_or(BotError::UserNotFound)?;

    ctx.messenger
        .send_message(OutboundMessage::new(chat_id, render_profile(&user)).html())
        .await?;

    Ok(())
}

fn or_not_set(value: &str) -> String {
    if value.trim().is_empty() {
        NOT_SET.to_owned()
    } else {
        html::escape(value)
    }
}

fn render_profile(user: &UserRecord) -> String {
    let mut profile = format!(
        "👤 <b>Your profile</b>\n\n\
         🆔 ID: {}\n\
         📛 Name: {}\n\
         📞 Phone: {}\n\
         🪪 Aadhar: {}\n\
         🧭 Role: {}\n\
         📌 Status: {}\n\
         🌐 Language: {}\n\
         📅 Joined: {}",
        or_not_set(&user.user_id),
        or_not_set(&user.name),
        or_not_set(&user.phone),
        or_not_set(&user.aadhar),
        or_not_set(&user.role),
        or_not_set(&user.status.to_string()),
        or_not_set(&user.lang),
        or_not_set(&user.join_date),
    );

    if user.status == UserStatus::PendingDetails {
        profile.push_str(
            "\n\n⚠️ Your profile is incomplete. Send:\n\
             <code>my profile details Full Name / Aadhar Number</code>",
        );
    }

    profile
}
