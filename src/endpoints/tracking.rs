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

//! Live tracking of the buses.
//!
//! # Description
//!
//! The tracking job is triggered periodically by an external scheduler through the tracking endpoint. Every
//! run looks for the buses of the catalog that depart soon and sends a reminder to their owners. An owner is
//! a registered user with the role `owner` whose name matches the owner of the bus.

use crate::{
    BotContext, HandlerResult,
    errors::BotError,
    messenger::{Messenger, OutboundMessage},
    seats::extract_bus_id,
    store::TabularStore,
    users::Role,
};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use teloxide::types::ChatId;
use tracing::{debug, error, info, warn};

/// Outcome of a run of the tracking job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrackingReport {
    /// Number of notices delivered.
    pub updates_sent: usize,
}

/// Live tracking handler.
#[tracing::instrument(
    name = "Live tracking handler",
    skip_all,
    fields(
        chat_id = %chat_id,
    )
)]
pub async fn live_tracking<S: TabularStore, M: Messenger>(
    ctx: &BotContext<S, M>,
    chat_id: ChatId,
    text: &str,
) -> HandlerResult {
    let message = match extract_bus_id(text) {
        Some(bus_id) => format!("📍 Live tracking for <b>{bus_id}</b> is not available yet."),
        None => {
            "📍 Please include a bus ID, for example: <code>live tracking BUS101</code>".to_owned()
        }
    };

    ctx.messenger
        .send_message(OutboundMessage::new(chat_id, message).html())
        .await?;

    Ok(())
}

/// Run the tracking job.
///
/// # Description
///
/// Failures to deliver a single notice are logged and skipped. Failing to read the users table aborts the
/// run.
#[tracing::instrument(name = "Tracking job", skip(ctx))]
pub async fn run_tracking<S: TabularStore, M: Messenger>(
    ctx: &BotContext<S, M>,
    now: DateTime<Utc>,
    window: TimeDelta,
) -> Result<TrackingReport, BotError> {
    let departing = ctx.catalog.departing_within(now, window);
    if departing.is_empty() {
        debug!("No buses departing soon");
        return Ok(TrackingReport::default());
    }

    let owner_role = Role::Owner.to_string();
    let owners = ctx
        .users
        .list_users()
        .await?
        .into_iter()
        .filter(|u| u.role == owner_role)
        .collect::<Vec<_>>();

    let mut report = TrackingReport::default();

    for bus in departing {
        for owner in owners.iter().filter(|u| u.name == bus.owner) {
            let chat_id = match owner.chat_id.parse::<i64>() {
                Ok(id) => ChatId(id),
                Err(_) => {
                    warn!("Invalid chat ID for {}: {}", owner.user_id, owner.chat_id);
                    continue;
                }
            };

            let notice = format!(
                "⏰ <b>{}</b> ({} ➡️ {}) departs at {}",
                bus.bus_id,
                bus.from,
                bus.to,
                bus.departure().format("%H:%M"),
            );

            match ctx
                .messenger
                .send_message(OutboundMessage::new(chat_id, notice).html())
                .await
            {
                Ok(()) => report.updates_sent += 1,
                Err(e) => error!("Failed to notify {} about {}: {e}", owner.user_id, bus.bus_id),
            }
        }
    }

    info!("Tracking job sent {} updates", report.updates_sent);

    Ok(report)
}
