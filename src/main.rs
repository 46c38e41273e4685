// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use std::sync::Arc;
use tracing::{info, warn};

use ecr_credential_refresher::config::Config;
use ecr_credential_refresher::diagnostics::run_startup_diagnostics;
use ecr_credential_refresher::kubernetes::wait_for_crd;
use ecr_credential_refresher::reconcilers::EcrPullSecretReconciler;
use ecr_credential_refresher::registry::{BundleBuilder, CredentialResolver, EcrTokenIssuer};
use ecr_credential_refresher::sync::Refresher;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting ECR credential refresher");

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: registry={}, region={}",
        config.registry, config.aws_region
    );

    // Create Kubernetes client, in-cluster or from the local kubeconfig
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    info!("Waiting for ECRPullSecret CRD to become available...");
    wait_for_crd(&client).await?;

    let resolver = CredentialResolver::new(client.clone(), &config);
    let bundles = BundleBuilder::new(
        resolver.clone(),
        Arc::new(EcrTokenIssuer::new(config.aws_region.clone())),
    );

    run_startup_diagnostics(&client, &resolver, &config).await;

    let refresher = Refresher::new(client.clone(), bundles, config.clone());
    let reconciler = EcrPullSecretReconciler::new(client, refresher, &config);

    info!("Starting reconciler...");
    reconciler.run().await?;

    // This should never be reached as the reconciler runs forever
    warn!("Reconciler stopped unexpectedly");
    Ok(())
}
