// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::defaults;
use crate::kubernetes::BindingPolicy;
use anyhow::{bail, Context, Result};
use std::env;
use std::time::Duration;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Registry host the pull credential document is keyed by
    pub registry: String,
    pub aws_region: String,
    /// Secret holding the access key pair when it is not in the environment
    pub credentials_secret_name: String,
    pub credentials_secret_namespace: String,
    /// Timer interval, also used as the timer's initial delay
    pub refresh_interval: Duration,
    pub binding_policy: BindingPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            registry: defaults::REGISTRY.to_string(),
            aws_region: defaults::AWS_REGION.to_string(),
            credentials_secret_name: defaults::CREDENTIALS_SECRET_NAME.to_string(),
            credentials_secret_namespace: defaults::CREDENTIALS_SECRET_NAMESPACE.to_string(),
            refresh_interval: Duration::from_secs(defaults::REFRESH_INTERVAL_SECS),
            binding_policy: BindingPolicy::Overwrite,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = Config::default();
        let refresh_interval = match lookup("REFRESH_INTERVAL_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("REFRESH_INTERVAL_SECS is not a number: {raw}"))?;
                if secs == 0 {
                    bail!("REFRESH_INTERVAL_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => base.refresh_interval,
        };
        let binding_policy = match lookup("SERVICE_ACCOUNT_BINDING") {
            Some(raw) => raw
                .parse()
                .context("SERVICE_ACCOUNT_BINDING must be 'overwrite' or 'merge'")?,
            None => base.binding_policy,
        };

        Ok(Config {
            registry: lookup("REGISTRY").unwrap_or(base.registry),
            aws_region: lookup("AWS_REGION").unwrap_or(base.aws_region),
            credentials_secret_name: lookup("AWS_CREDENTIALS_SECRET_NAME")
                .unwrap_or(base.credentials_secret_name),
            credentials_secret_namespace: lookup("AWS_CREDENTIALS_SECRET_NAMESPACE")
                .unwrap_or(base.credentials_secret_namespace),
            refresh_interval,
            binding_policy,
        })
    }
}
