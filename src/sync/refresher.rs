// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Central coordinator for propagating pull secrets into target namespaces.

use crate::config::Config;
use crate::error::{RefresherError, Result};
use crate::kubernetes::{bind_pull_secret, ensure_pull_secret, SecretSync};
use crate::registry::BundleBuilder;
use crate::types::RefreshTarget;
use kube::Client;
use tracing::{error, info, instrument, warn};

/// Outcome of one namespace within a reconciliation pass
#[derive(Debug)]
pub struct NamespaceOutcome {
    pub namespace: String,
    pub result: Result<SecretSync>,
    /// Whether the default service account references the pull secret
    pub bound: bool,
}

impl NamespaceOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs reconciliation passes: mint a bundle, sync the secret, bind the service account,
/// for every target namespace in order.
#[derive(Clone)]
pub struct Refresher {
    client: Client,
    bundles: BundleBuilder,
    config: Config,
}

impl Refresher {
    pub fn new(client: Client, bundles: BundleBuilder, config: Config) -> Self {
        Self {
            client,
            bundles,
            config,
        }
    }

    /// One pass over every namespace of `target`. Never fails as a whole: a failing
    /// namespace is logged and recorded, and the next one is processed.
    #[instrument(skip(self, target), fields(secret = %target.secret_name))]
    pub async fn reconcile(&self, target: &RefreshTarget) -> Vec<NamespaceOutcome> {
        info!("Target namespaces: {}", target.namespaces.join(", "));

        let mut outcomes = Vec::with_capacity(target.namespaces.len());
        for namespace in &target.namespaces {
            info!("Processing namespace: {}", namespace);
            let outcome = self.reconcile_namespace(namespace, &target.secret_name).await;
            if let Err(e) = &outcome.result {
                error!("Failed to process namespace {}: {}", namespace, e);
            }
            outcomes.push(outcome);
        }

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        info!(
            "Pass complete: {} namespace(s) synced, {} failed",
            outcomes.len() - failed,
            failed
        );
        outcomes
    }

    async fn reconcile_namespace(&self, namespace: &str, secret_name: &str) -> NamespaceOutcome {
        let result = self.sync_secret(namespace, secret_name).await;

        let bound = match &result {
            Ok(_) => self.bind(namespace, secret_name).await,
            Err(_) => false,
        };

        NamespaceOutcome {
            namespace: namespace.to_string(),
            result,
            bound,
        }
    }

    /// Bundle building happens per namespace so each secret gets a token issued just
    /// before it is written.
    async fn sync_secret(&self, namespace: &str, secret_name: &str) -> Result<SecretSync> {
        let document = self.bundles.build_bundle(&self.config.registry).await?;
        ensure_pull_secret(&self.client, namespace, secret_name, &document).await
    }

    /// Binding failures are warnings only; the account may be missing or managed elsewhere
    async fn bind(&self, namespace: &str, secret_name: &str) -> bool {
        match bind_pull_secret(&self.client, namespace, secret_name, self.config.binding_policy).await {
            Ok(()) => true,
            Err(e @ RefresherError::BindingFailed { .. }) => {
                warn!("{}", e);
                false
            }
            Err(e) => {
                warn!("Failed to patch default service account in {}: {}", namespace, e);
                false
            }
        }
    }
}
