// Copyright 2024-2025 Felipe Torres González
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

//! Handler for the help command.

use crate::{
    BotContext, CommandEng, HandlerResult,
    keyboards::main_menu_keyboard,
    messenger::{Messenger, OutboundMessage},
    store::TabularStore,
};
use teloxide::{types::ChatId, utils::command::BotCommands};

/// Help handler.
#[tracing::instrument(
    name = "Help handler",
    skip_all,
    fields(
        chat_id = %chat_id,
    )
)]
pub async fn help<S: TabularStore, M: Messenger>(
    ctx: &BotContext<S, M>,
    chat_id: ChatId,
) -> HandlerResult {
    ctx.messenger
        .send_message(
            OutboundMessage::new(chat_id, main_help())
                .html()
                .keyboard(main_menu_keyboard()),
        )
        .await?;

    Ok(())
}

fn main_help() -> String {
    format!(
        "{}\n⚙️{}",
        include_str!("../../data/templates/help_en.txt"),
        CommandEng::descriptions(),
    )
}
