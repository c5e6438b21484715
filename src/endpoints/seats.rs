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

//! Handler for the seat map requests.

use crate::{
    BotContext, HandlerResult,
    messenger::{Messenger, OutboundMessage},
    seats::load_seat_map,
    store::TabularStore,
};
use teloxide::types::ChatId;
use tracing::info;

/// Seat map handler.
///
/// # Description
///
/// The bus ID is taken from anywhere in the message, e.g. _show seats bus101_.
#[tracing::instrument(
    name = "Seat map handler",
    skip_all,
    fields(
        chat_id = %chat_id,
    )
)]
pub async fn seat_map<S: TabularStore, M: Messenger>(
    ctx: &BotContext<S, M>,
    chat_id: ChatId,
    text: &str,
) -> HandlerResult {
    let seat_map = load_seat_map(ctx.store.as_ref(), text).await?;

    let (available, matched) = seat_map.availability();
    info!(
        "Seat map of {}: {available} of {matched} available",
        seat_map.bus_id
    );

    ctx.messenger
        .send_message(OutboundMessage::new(chat_id, seat_map.render()).html())
        .await?;

    Ok(())
}
