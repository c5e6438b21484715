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

//! Handlers for the language preferences of the user.

use crate::{
    BotContext, HandlerResult,
    keyboards::language_keyboard,
    messenger::{Messenger, OutboundMessage},
    store::TabularStore,
    users::SUPPORTED_LANGUAGES,
};
use teloxide::types::ChatId;
use tracing::{info, warn};

/// Language menu handler.
#[tracing::instrument(
    name = "Language menu handler",
    skip_all,
    fields(
        chat_id = %chat_id,
    )
)]
pub async fn language_menu<S: TabularStore, M: Messenger>(
    ctx: &BotContext<S, M>,
    chat_id: ChatId,
) -> HandlerResult {
    ctx.messenger
        .send_message(
            OutboundMessage::new(chat_id, "🌐 <b>Choose your language</b>")
                .html()
                .keyboard(language_keyboard()),
        )
        .await?;

    Ok(())
}

/// Language selection handler.
///
/// # Description
///
/// Codes that are not in [SUPPORTED_LANGUAGES] get the language menu again.
#[tracing::instrument(
    name = "Set language handler",
    skip_all,
    fields(
        chat_id = %chat_id,
        lang_code = %lang_code,
    )
)]
pub async fn set_language<S: TabularStore, M: Messenger>(
    ctx: &BotContext<S, M>,
    chat_id: ChatId,
    lang_code: &str,
) -> HandlerResult {
    let Some((_, lang_name)) = SUPPORTED_LANGUAGES.iter().find(|(c, _)| *c == lang_code) else {
        warn!("Unsupported language: {lang_code}");
        return language_menu(ctx, chat_id).await;
    };

    ctx.users.set_language(chat_id, lang_code).await?;
    info!("Language set to {lang_code}");

    ctx.messenger
        .send_message(
            OutboundMessage::new(chat_id, format!("✅ Language set to <b>{lang_name}</b>")).html(),
        )
        .await?;

    Ok(())
}
