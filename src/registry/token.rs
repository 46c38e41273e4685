// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Registry authorization token issuance

use crate::constants::OPERATOR_NAME;
use crate::error::{RefresherError, Result};
use crate::registry::Credentials;
use async_trait::async_trait;
use aws_sdk_ecr::error::DisplayErrorContext;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, instrument};

/// Exchanges an access key pair for a short-lived registry token
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Returns the raw token: base64 of `username:password`
    async fn issue(&self, credentials: &Credentials) -> Result<String>;
}

/// Issues tokens through ECR's GetAuthorizationToken
#[derive(Debug, Clone)]
pub struct EcrTokenIssuer {
    region: String,
}

impl EcrTokenIssuer {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }
}

#[async_trait]
impl TokenIssuer for EcrTokenIssuer {
    #[instrument(skip(self, credentials), fields(region = %self.region))]
    async fn issue(&self, credentials: &Credentials) -> Result<String> {
        let static_credentials = aws_credential_types::Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            None,
            None,
            OPERATOR_NAME,
        );

        // A fresh client per call, so rotated credentials are always picked up
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(self.region.clone()))
            .credentials_provider(static_credentials)
            .load()
            .await;
        let ecr = aws_sdk_ecr::Client::new(&sdk_config);

        let output = ecr
            .get_authorization_token()
            .send()
            .await
            .map_err(|e| RefresherError::TokenIssuanceFailed(DisplayErrorContext(&e).to_string()))?;

        let token = output
            .authorization_data()
            .first()
            .and_then(|data| data.authorization_token())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                RefresherError::TokenIssuanceFailed(
                    "GetAuthorizationToken returned no token".to_string(),
                )
            })?;

        debug!("Obtained ECR authorization token");
        Ok(token.to_string())
    }
}

/// Decode a registry token and split it on the first colon into `(username, password)`
pub fn split_token(token: &str) -> Result<(String, String)> {
    let decoded = STANDARD
        .decode(token.trim())
        .map_err(|e| RefresherError::TokenIssuanceFailed(format!("token is not base64: {}", e)))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|e| RefresherError::TokenIssuanceFailed(format!("token is not UTF-8: {}", e)))?;

    let (username, password) = decoded.split_once(':').ok_or_else(|| {
        RefresherError::TokenIssuanceFailed("token has no username:password separator".to_string())
    })?;

    Ok((username.to_string(), password.to_string()))
}
