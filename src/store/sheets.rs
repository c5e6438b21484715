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

//! Google Sheets implementation of the [TabularStore].
//!
//! # Description
//!
//! Each operation authorises a new session before talking to the Sheets API: the credentials are parsed,
//! a signed assertion is exchanged for an access token, and the token is used for a single request. Tokens
//! are not cached, so the client behaves the same whether the process lives for one request or for days.

use super::{CellUpdate, ServiceAccountKey, TabularStore};
use crate::{configuration::SheetsSettings, errors::StoreError};
use chrono::Utc;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Values are stored as sent. Cells fed by users must never be parsed as formulas or numbers.
const VALUE_INPUT_OPTION: &str = "RAW";

/// Client of the Google Sheets v4 API.
pub struct SheetsClient {
    http: Client,
    credentials: SecretString,
    spreadsheet_id: String,
    api_base_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct AppendBody {
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateBody {
    value_input_option: &'static str,
    data: Vec<BatchUpdateRange>,
}

#[derive(Debug, Serialize)]
struct BatchUpdateRange {
    range: String,
    values: Vec<Vec<String>>,
}

impl SheetsClient {
    /// Build a new client from the global settings.
    ///
    /// # Description
    ///
    /// The credentials are not checked here, each operation does it before sending anything to the
    /// network.
    pub fn new(settings: &SheetsSettings) -> Result<Self, StoreError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| StoreError::Unexpected(e.to_string()))?;

        Ok(SheetsClient {
            http,
            credentials: SecretString::from(settings.credentials.expose_secret().to_owned()),
            spreadsheet_id: settings.spreadsheet_id.clone(),
            api_base_url: settings.api_base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Get an access token for the service account.
    async fn authorize(&self) -> Result<String, StoreError> {
        let key = ServiceAccountKey::parse(self.credentials.expose_secret())?;
        let assertion = key.assertion(SHEETS_SCOPE, Utc::now())?;

        let response = self
            .http
            .post(&key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| StoreError::Unexpected(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("The token endpoint rejected the service account ({status}): {body}");
            return Err(match status {
                StatusCode::FORBIDDEN => StoreError::Permission(body),
                StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => StoreError::Auth(body),
                _ => StoreError::Unexpected(format!("{status}: {body}")),
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Unexpected(e.to_string()))?;

        Ok(token.access_token)
    }

    fn values_url(&self, suffix: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values{}",
            self.api_base_url, self.spreadsheet_id, suffix
        )
    }
}

/// Turn an unsuccessful response of the Sheets API into a [StoreError].
async fn check_response(response: Response) -> Result<Response, StoreError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    error!("Request to the Sheets API failed ({status}): {body}");

    Err(match status {
        StatusCode::UNAUTHORIZED => StoreError::Auth(body),
        StatusCode::FORBIDDEN => StoreError::Permission(body),
        _ => StoreError::Unexpected(format!("{status}: {body}")),
    })
}

impl TabularStore for SheetsClient {
    #[instrument(name = "Sheets read", skip(self))]
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let token = self.authorize().await?;

        let response = self
            .http
            .get(self.values_url(&format!("/{range}")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StoreError::Unexpected(e.to_string()))?;

        let values: ValueRange = check_response(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Unexpected(e.to_string()))?;

        debug!("Read {} rows", values.values.len());

        Ok(values.values)
    }

    #[instrument(name = "Sheets append", skip(self, values))]
    async fn append_row(&self, range: &str, values: Vec<String>) -> Result<(), StoreError> {
        let token = self.authorize().await?;

        let response = self
            .http
            .post(self.values_url(&format!("/{range}:append")))
            .query(&[
                ("valueInputOption", VALUE_INPUT_OPTION),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .bearer_auth(token)
            .json(&AppendBody {
                values: vec![values],
            })
            .send()
            .await
            .map_err(|e| StoreError::Unexpected(e.to_string()))?;

        check_response(response).await?;

        Ok(())
    }

    #[instrument(name = "Sheets batch update", skip(self, updates), fields(cells = updates.len()))]
    async fn batch_update(&self, updates: Vec<CellUpdate>) -> Result<(), StoreError> {
        let token = self.authorize().await?;

        let body = BatchUpdateBody {
            value_input_option: VALUE_INPUT_OPTION,
            data: updates
                .into_iter()
                .map(|u| BatchUpdateRange {
                    range: u.range,
                    values: vec![vec![u.value]],
                })
                .collect(),
        };

        let response = self
            .http
            .post(self.values_url(":batchUpdate"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Unexpected(e.to_string()))?;

        check_response(response).await?;

        Ok(())
    }
}
