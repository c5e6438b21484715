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

//! Module with the HTTP endpoints of BusBot.
//!
//! # Description
//!
//! **BusBot** exposes two endpoints:
//!
//! - The webhook that receives the updates of Telegram. Only text messages and callback queries are
//!   handled, anything else is ignored. The endpoint always answers `200 OK`, even when the body can't be
//!   parsed, so that Telegram doesn't retry the delivery.
//! - The tracking endpoint, which is called by an external scheduler to run the tracking job. It only
//!   accepts `GET` and `HEAD` requests.
//!
//! Example of a tracking request:
//!
//! ```bash
//! curl -X GET 'http://localhost:9602/tracking'
//! ```

use crate::{
    BotContext,
    configuration::ApplicationSettings,
    endpoints::run_tracking,
    errors::TrackingError,
    messenger::Messenger,
    router::InboundEvent,
    store::TabularStore,
};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    routing::{get, post},
};
use chrono::{TimeDelta, Utc};
use serde::Serialize;
use std::sync::Arc;
use teloxide::types::Update;
use tracing::{debug, error, info, warn};

/// State shared by the handlers of the HTTP server.
pub struct WebServerState<S, M> {
    pub context: Arc<BotContext<S, M>>,
    /// How far ahead the tracking job looks for departures.
    pub tracking_window: TimeDelta,
}

impl<S, M> Clone for WebServerState<S, M> {
    fn clone(&self) -> Self {
        WebServerState {
            context: self.context.clone(),
            tracking_window: self.tracking_window,
        }
    }
}

/// Body of a successful run of the tracking job.
#[derive(Debug, Clone, Serialize)]
pub struct TrackingResponse {
    pub success: bool,
    pub message: String,
    pub updates_sent: usize,
}

/// Handler of the Telegram webhook.
pub async fn webhook_handler<S, M>(
    State(state): State<WebServerState<S, M>>,
    body: Bytes,
) -> &'static str
where
    S: TabularStore + 'static,
    M: Messenger + 'static,
{
    let update = match serde_json::from_slice::<Update>(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Discarded an update that couldn't be parsed: {e}");
            return "OK";
        }
    };

    let Some(event) = InboundEvent::from_update(update) else {
        debug!("Update ignored");
        return "OK";
    };

    if let Err(e) = state.context.dispatch(event).await {
        error!("Failed to deliver the error report: {e}");
    }

    "OK"
}

/// Handler of the tracking endpoint.
pub async fn tracking_handler<S, M>(
    State(state): State<WebServerState<S, M>>,
) -> Result<Json<TrackingResponse>, TrackingError>
where
    S: TabularStore + 'static,
    M: Messenger + 'static,
{
    info!("Tracking job requested");

    let report = run_tracking(state.context.as_ref(), Utc::now(), state.tracking_window)
        .await
        .map_err(|e| {
            error!("Tracking job failed: {e}");
            TrackingError(e)
        })?;

    Ok(Json(TrackingResponse {
        success: true,
        message: "Tracking job completed".to_owned(),
        updates_sent: report.updates_sent,
    }))
}

/// Build the router of the HTTP server.
pub fn app_router<S, M>(state: WebServerState<S, M>, settings: &ApplicationSettings) -> Router
where
    S: TabularStore + 'static,
    M: Messenger + 'static,
{
    Router::new()
        .route(&settings.webhook_path, post(webhook_handler::<S, M>))
        .route(&settings.tracking_path, get(tracking_handler::<S, M>))
        .with_state(state)
}
