// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resolution of the upstream AWS access key pair

use crate::config::Config;
use crate::constants::credentials::{ACCESS_KEY_ID, SECRET_ACCESS_KEY};
use crate::error::{RefresherError, Result};
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// An AWS access key pair. Held in memory for one bundle build only.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves credentials from the controller's environment, falling back to a secret
/// in a configured namespace.
#[derive(Clone)]
pub struct CredentialResolver {
    client: Client,
    secret_name: String,
    secret_namespace: String,
    env: EnvLookup,
}

impl CredentialResolver {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            secret_name: config.credentials_secret_name.clone(),
            secret_namespace: config.credentials_secret_namespace.clone(),
            env: Arc::new(|key| std::env::var(key).ok()),
        }
    }

    /// Replace the environment lookup
    pub fn with_env<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(env);
        self
    }

    /// `namespace/name` of the fallback secret
    pub fn source_ref(&self) -> String {
        format!("{}/{}", self.secret_namespace, self.secret_name)
    }

    /// Resolve both halves of the key pair, or fail. Never partially succeeds.
    #[instrument(skip(self))]
    pub async fn resolve(&self) -> Result<Credentials> {
        let access_key = (self.env)(ACCESS_KEY_ID).filter(|v| !v.is_empty());
        let secret_key = (self.env)(SECRET_ACCESS_KEY).filter(|v| !v.is_empty());

        if let (Some(access_key_id), Some(secret_access_key)) = (access_key, secret_key) {
            debug!("Using AWS credentials from environment");
            return Ok(Credentials {
                access_key_id,
                secret_access_key,
            });
        }

        debug!("AWS credentials not in environment, reading {}", self.source_ref());
        self.resolve_from_secret().await
    }

    async fn resolve_from_secret(&self) -> Result<Credentials> {
        let unavailable = |reason: String| RefresherError::CredentialsUnavailable {
            source_ref: self.source_ref(),
            reason,
        };

        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), &self.secret_namespace);
        let secret = secrets
            .get(&self.secret_name)
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let field = |key: &str| -> Result<String> {
            let value = secret
                .data
                .as_ref()
                .and_then(|d| d.get(key))
                .map(|b| String::from_utf8(b.0.clone()))
                .transpose()
                .map_err(|e| unavailable(format!("field {} is not valid UTF-8: {}", key, e)))?
                .unwrap_or_default();
            Ok(value)
        };

        let access_key_id = field(ACCESS_KEY_ID)?;
        let secret_access_key = field(SECRET_ACCESS_KEY)?;

        if access_key_id.is_empty() || secret_access_key.is_empty() {
            return Err(unavailable("secret is missing AWS credentials".to_string()));
        }

        Ok(Credentials {
            access_key_id,
            secret_access_key,
        })
    }
}
