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

//! Handlers for searching buses and managing bookings.
//!
//! # Description
//!
//! Bookings are not stored yet: [book_seat], [my_booking] and [cancel_booking] only reply with a notice.

use crate::{
    BotContext, HandlerResult,
    messenger::{Messenger, OutboundMessage},
    seats::extract_bus_id,
    store::TabularStore,
};
use teloxide::types::ChatId;
use tracing::{debug, info};

/// Bus search handler.
#[tracing::instrument(
    name = "Bus search handler",
    skip_all,
    fields(
        chat_id = %chat_id,
    )
)]
pub async fn bus_search<S: TabularStore, M: Messenger>(
    ctx: &BotContext<S, M>,
    chat_id: ChatId,
) -> HandlerResult {
    let buses = ctx.catalog.buses();
    info!("{} buses listed", buses.len());

    let message = if buses.is_empty() {
        "🚌 There are no buses available right now.".to_owned()
    } else {
        let list = buses
            .iter()
            .map(|b| b.summary())
            .collect::<Vec<_>>()
            .join("\n\n");
        format!(
            "🔎 <b>Available buses</b>\n\n{list}\n\n\
             To check the seats of a bus, send: <code>show seats BUS101</code>"
        )
    };

    ctx.messenger
        .send_message(OutboundMessage::new(chat_id, message).html())
        .await?;

    Ok(())
}

#[tracing::instrument(
    name = "Book seat handler",
    skip_all,
    fields(
        chat_id = %chat_id,
    )
)]
pub async fn book_seat<S: TabularStore, M: Messenger>(
    ctx: &BotContext<S, M>,
    chat_id: ChatId,
    text: &str,
) -> HandlerResult {
    debug!("Booking request: {text}");

    let message = match extract_bus_id(text) {
        Some(bus_id) => format!(
            "🎫 Online booking for <b>{bus_id}</b> is coming soon.\n\
             Check the free seats with <code>show seats {bus_id}</code>"
        ),
        None => "🎫 Online booking is coming soon.".to_owned(),
    };

    ctx.messenger
        .send_message(OutboundMessage::new(chat_id, message).html())
        .await?;

    Ok(())
}

#[tracing::instrument(
    name = "My booking handler",
    skip_all,
    fields(
        chat_id = %chat_id,
    )
)]
pub async fn my_booking<S: TabularStore, M: Messenger>(
    ctx: &BotContext<S, M>,
    chat_id: ChatId,
) -> HandlerResult {
    ctx.messenger
        .send_message(
            OutboundMessage::new(
                chat_id,
                "📋 You have no bookings yet. Send <b>book bus</b> to find a bus.",
            )
            .html(),
        )
        .await?;

    Ok(())
}

#[tracing::instrument(
    name = "Cancel booking handler",
    skip_all,
    fields(
        chat_id = %chat_id,
    )
)]
pub async fn cancel_booking<S: TabularStore, M: Messenger>(
    ctx: &BotContext<S, M>,
    chat_id: ChatId,
    text: &str,
) -> HandlerResult {
    debug!("Cancellation request: {text}");

    ctx.messenger
        .send_message(OutboundMessage::new(
            chat_id,
            "❌ There is no booking to cancel.",
        ))
        .await?;

    Ok(())
}
