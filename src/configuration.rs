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

//! BusBot configuration module
//!
//! # Description
//!
//! This module includes all the definitions for the app's settings and the
//! objects that automate reading the configuration from files or environment
//! variables and parsing them to Rust's native types.
//!
//! Secrets must be overrided by environment variables, for example, the
//! API token for the Telegram Bot client or the service account of the
//! spreadsheet backend. All the environment variables that are meant to be
//! used within this module shall use the prefix _BUSBOT_.

use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde_derive::Deserialize;

/// Name of the directory in which configuration files will be stored.
const CONF_DIR: &str = "config";

/// Main settings `struct`.
///
/// # Description
///
/// An instance of this `struct` is built once when the application starts and
/// passed by reference to the constructors of the clients that need it.
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Level for the tracing crate.
    pub tracing_level: String,
    /// Application specific settings.
    pub application: ApplicationSettings,
    /// Settings of the spreadsheet backend.
    pub sheets: SheetsSettings,
    /// Settings of the scheduled tracking job.
    #[serde(default)]
    pub tracking: TrackingSettings,
}

/// Settings of the BusBot application.
///
/// # Description
///
/// - [ApplicationSettings::api_token]: Telegram BOT API token. Override the value
///   of the YML file using an environment variable: `export BUSBOT__APPLICATION__API_TOKEN="key"`.
#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    pub api_token: SecretString,
    pub http_server_host: String,
    pub http_server_port: u16,
    /// Path that receives the updates pushed by Telegram.
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
    /// Path polled by the external scheduler.
    #[serde(default = "default_tracking_path")]
    pub tracking_path: String,
}

/// Settings of the Google Sheets backend.
///
/// # Description
///
/// - [SheetsSettings::credentials]: JSON document of the service account. It is
///   usually copied verbatim from the key file, so the private key carries escaped
///   newlines. Use `export BUSBOT__SHEETS__CREDENTIALS='{...}'`.
/// - [SheetsSettings::spreadsheet_id]: ID of the spreadsheet that holds the
///   `Users` and `Seats` sheets.
#[derive(Debug, Deserialize)]
pub struct SheetsSettings {
    pub credentials: SecretString,
    pub spreadsheet_id: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct TrackingSettings {
    /// Buses departing within this many minutes get a tracking notice.
    pub window_minutes: i64,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        TrackingSettings { window_minutes: 60 }
    }
}

fn default_webhook_path() -> String {
    "/webhook".to_owned()
}

fn default_tracking_path() -> String {
    "/tracking".to_owned()
}

fn default_api_base_url() -> String {
    "https://sheets.googleapis.com/v4".to_owned()
}

fn default_request_timeout() -> u64 {
    30
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Build the full path of the configuration directory.
        let base_path = std::env::current_dir()
            .map_err(|e| ConfigError::Message(format!("Failed to read the current dir: {e}")))?;
        let cfg_dir = base_path.join(CONF_DIR);

        let settings = Config::builder()
            // The file is optional: a deployment might provide everything using the environment.
            .add_source(File::from(cfg_dir.join("base")).required(false))
            .add_source(Environment::with_prefix("busbot").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
