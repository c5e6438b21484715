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

//! Main file of the BusBot

use busbot::{
    BotContext, CommandEng,
    buses::BusCatalog,
    configuration::Settings,
    endpoints::{WebServerState, app_router},
    store::SheetsClient,
    telemetry::configure_tracing,
};
use chrono::TimeDelta;
use secrecy::ExposeSecret;
use std::{net::SocketAddr, process::exit, str::FromStr, sync::Arc};
use teloxide::{
    adaptors::throttle::Limits, prelude::*, requests::RequesterExt, utils::command::BotCommands,
};
use tokio::net::TcpListener;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load the settings.
    let settings = Settings::new()?;

    // Initialize the tracing subsystem.
    configure_tracing(settings.tracing_level.as_str());

    // Set up the client of the spreadsheet.
    let store = match SheetsClient::new(&settings.sheets) {
        Ok(client) => client,
        Err(e) => {
            error!("An error occurred while setting up the spreadsheet client:\n{e}");
            exit(69)
        }
    };

    // Instance a throttled bot, to avoid reaching the message limits of Telegram.
    let bot = Bot::new(settings.application.api_token.expose_secret()).throttle(Limits::default());

    debug!("Setting up commands of the bot");
    bot.set_my_commands(CommandEng::bot_commands()).await?;

    let context = Arc::new(BotContext::new(
        Arc::new(store),
        Arc::new(bot),
        BusCatalog::sample(),
    ));

    let state = WebServerState {
        context,
        tracking_window: TimeDelta::minutes(settings.tracking.window_minutes),
    };

    let app = app_router(state, &settings.application);

    let http_server_address = SocketAddr::from_str(&format!(
        "{}:{}",
        &settings.application.http_server_host, settings.application.http_server_port
    ))?;

    let tcp_listener = TcpListener::bind(http_server_address).await?;

    info!("Started BusBot server at {http_server_address}");

    axum::serve(tcp_listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gracefully closed BusBot server");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for the shutdown signal: {e}");
    }
}
