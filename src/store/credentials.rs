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

//! Service account credentials of the spreadsheet backend.

use crate::errors::StoreError;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Lifetime of the signed assertions, Google doesn't accept more than one hour.
const ASSERTION_TTL_SECS: i64 = 3600;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Subset of the fields of a Google service account key file.
#[derive(Debug, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: SecretString,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_owned()
}

impl ServiceAccountKey {
    /// Parse the JSON blob of the service account.
    ///
    /// # Description
    ///
    /// Key files copied into environment variables usually end up with the newlines of the PEM block
    /// escaped as `\n`. Those are restored so the key can be loaded later on.
    ///
    /// Any problem with the blob is reported as [StoreError::Unavailable]. No request is sent to the
    /// store at this point.
    pub fn parse(blob: &str) -> Result<Self, StoreError> {
        if blob.trim().is_empty() {
            return Err(StoreError::Unavailable(
                "CRITICAL: the service account key is not set".to_owned(),
            ));
        }

        let raw: ServiceAccountKey = serde_json::from_str(blob).map_err(|e| {
            StoreError::Unavailable(format!("the service account key is not valid JSON: {e}"))
        })?;

        if raw.client_email.is_empty() || raw.private_key.expose_secret().is_empty() {
            return Err(StoreError::Unavailable(
                "the service account key lacks the client email or the private key".to_owned(),
            ));
        }

        let private_key = SecretString::from(raw.private_key.expose_secret().replace("\\n", "\n"));

        Ok(ServiceAccountKey {
            private_key,
            ..raw
        })
    }

    /// Build a signed JWT that is exchanged for an access token.
    pub fn assertion(&self, scope: &str, now: DateTime<Utc>) -> Result<String, StoreError> {
        let key = EncodingKey::from_rsa_pem(self.private_key.expose_secret().as_bytes())
            .map_err(|e| StoreError::Unavailable(format!("the private key is malformed: {e}")))?;

        let claims = AssertionClaims {
            iss: &self.client_email,
            scope,
            aud: &self.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_TTL_SECS,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| StoreError::Unavailable(format!("failed to sign the assertion: {e}")))
    }
}
