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

//! Handler for the status command.

use crate::{
    BotContext, HandlerResult,
    messenger::{Messenger, OutboundMessage},
    store::TabularStore,
};
use teloxide::types::ChatId;

#[tracing::instrument(
    name = "Status handler",
    skip_all,
    fields(
        chat_id = %chat_id,
    )
)]
pub async fn status<S: TabularStore, M: Messenger>(
    ctx: &BotContext<S, M>,
    chat_id: ChatId,
) -> HandlerResult {
    ctx.messenger
        .send_message(
            OutboundMessage::new(
                chat_id,
                format!(
                    "🟢 <b>BusBot is up</b>\n\n🚌 {} buses in service\n🏷️ Version {}",
                    ctx.catalog.buses().len(),
                    env!("CARGO_PKG_VERSION"),
                ),
            )
            .html(),
        )
        .await?;

    Ok(())
}
