// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Informational checks logged once at startup. They never change reconciliation.

use crate::config::Config;
use crate::registry::CredentialResolver;
use crate::types::ECRPullSecret;
use kube::{api::ListParams, Api, Client};
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupReport {
    pub credentials_ok: bool,
    /// Number of existing ECRPullSecret resources, if they could be listed
    pub resource_count: Option<usize>,
}

pub async fn run_startup_diagnostics(
    client: &Client,
    resolver: &CredentialResolver,
    config: &Config,
) -> StartupReport {
    info!("AWS credentials source: {}", resolver.source_ref());
    info!("AWS region: {}", config.aws_region);
    info!("ECR registry: {}", config.registry);
    info!(
        "Refresh interval: {}s, service account binding: {:?}",
        config.refresh_interval.as_secs(),
        config.binding_policy
    );

    let credentials_ok = match resolver.resolve().await {
        Ok(credentials) => {
            let prefix: String = credentials.access_key_id.chars().take(10).collect();
            info!("AWS credentials loaded successfully (access key: {}...)", prefix);
            true
        }
        Err(e) => {
            error!("Failed to load AWS credentials: {}", e);
            error!("Refreshes will fail until credentials are available");
            false
        }
    };

    let resources: Api<ECRPullSecret> = Api::all(client.clone());
    let resource_count = match resources.list(&ListParams::default()).await {
        Ok(list) => {
            let count = list.items.len();
            if count == 0 {
                warn!("No ECRPullSecret resources found, operator is idle");
                warn!("Create an ECRPullSecret resource to start managing pull secrets");
            } else {
                info!("Found {} ECRPullSecret resource(s) to manage", count);
            }
            Some(count)
        }
        Err(e) => {
            error!("Failed to list ECRPullSecret resources: {}", e);
            None
        }
    };

    StartupReport {
        credentials_ok,
        resource_count,
    }
}
