// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ECRPullSecret reconciler - maps create, update, resume, timer and delete onto refresh passes.

use crate::config::Config;
use crate::constants::{defaults, ERROR_REQUEUE_SECS, FINALIZER};
use crate::error::{RefresherError, Result};
use crate::reconcilers::triggers::{Decision, Trigger, TriggerLedger};
use crate::sync::{NamespaceOutcome, Refresher};
use crate::types::ECRPullSecret;
use futures::StreamExt;
use k8s_openapi::chrono::{DateTime, Utc};
use kube::{
    runtime::{
        controller::Action,
        finalizer::{finalizer, Event as Finalizer},
        Controller,
    },
    Api, Client, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

pub struct EcrPullSecretReconciler {
    client: Client,
    refresher: Refresher,
    ledger: TriggerLedger,
    started_at: DateTime<Utc>,
}

impl EcrPullSecretReconciler {
    pub fn new(client: Client, refresher: Refresher, config: &Config) -> Self {
        Self {
            client,
            refresher,
            ledger: TriggerLedger::new(config.refresh_interval),
            started_at: Utc::now(),
        }
    }

    /// Run the controller. kube-runtime never reconciles the same object concurrently,
    /// so passes for one resource are serialized.
    pub async fn run(self) -> anyhow::Result<()> {
        let resources: Api<ECRPullSecret> = Api::all(self.client.clone());
        let context = Arc::new(self);

        Controller::new(resources, WatcherConfig::default())
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled ECRPullSecret: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }

    /// Handle a wake-up for a live resource. Create, update, resume and timer all run
    /// the same pass; other wake-ups only reschedule.
    #[instrument(skip(self, resource), fields(resource = %resource.name_any()))]
    pub async fn apply(&self, resource: &ECRPullSecret, now: Instant) -> Result<Action> {
        let existed_before_start = resource
            .creation_timestamp()
            .is_some_and(|t| t.0 < self.started_at);

        let decision = self.ledger.decide(
            &resource_key(resource),
            resource.metadata.generation,
            existed_before_start,
            now,
        );

        match decision {
            Decision::Wait(next) => {
                debug!("Nothing to do, next refresh in {}s", next.as_secs());
                Ok(Action::requeue(next))
            }
            Decision::Run(trigger, next) => {
                self.run_pass(resource, trigger).await;
                Ok(Action::requeue(next))
            }
        }
    }

    async fn run_pass(&self, resource: &ECRPullSecret, trigger: Trigger) -> Vec<NamespaceOutcome> {
        let name = resource.name_any();
        let target = match resource.refresh_target() {
            Ok(target) => target,
            Err(e) => {
                error!("Skipping {} pass for ECRPullSecret '{}': {}", trigger, name, e);
                return Vec::new();
            }
        };

        match trigger {
            Trigger::Create | Trigger::Update => {
                info!("Reconciling ECR secret '{}' for CR '{}'", target.secret_name, name)
            }
            Trigger::Resume => info!(
                "Resuming ECRPullSecret CR '{}' for namespaces: {}",
                name,
                target.namespaces.join(", ")
            ),
            Trigger::Timer => info!(
                "Timer triggered, refreshing ECR secret '{}' for CR '{}'",
                target.secret_name, name
            ),
        }

        self.refresher.reconcile(&target).await
    }

    /// Deletion leaves propagated secrets in place; they need manual cleanup.
    #[instrument(skip(self, resource), fields(resource = %resource.name_any()))]
    pub async fn cleanup(&self, resource: &ECRPullSecret) -> Result<Action> {
        self.ledger.forget(&resource_key(resource));

        let secret_name = resource
            .spec
            .secret_name
            .clone()
            .unwrap_or_else(|| defaults::SECRET_NAME.to_string());
        let namespaces = resource
            .spec
            .namespaces
            .clone()
            .unwrap_or_else(|| vec![defaults::NAMESPACE.to_string()]);

        info!("ECRPullSecret CR '{}' deleted", resource.name_any());
        info!(
            "Secrets '{}' in namespaces [{}] are NOT automatically removed",
            secret_name,
            namespaces.join(", ")
        );
        info!(
            "Manual cleanup: kubectl delete secret {} -n <namespace>",
            secret_name
        );

        Ok(Action::await_change())
    }
}

fn resource_key(resource: &ECRPullSecret) -> String {
    resource.uid().unwrap_or_else(|| resource.name_any())
}

async fn reconcile(
    resource: Arc<ECRPullSecret>,
    ctx: Arc<EcrPullSecretReconciler>,
) -> Result<Action> {
    let resources: Api<ECRPullSecret> = Api::all(ctx.client.clone());

    finalizer(&resources, FINALIZER, resource, |event| async {
        match event {
            Finalizer::Apply(resource) => ctx.apply(&resource, Instant::now()).await,
            Finalizer::Cleanup(resource) => ctx.cleanup(&resource).await,
        }
    })
    .await
    .map_err(|e| RefresherError::FinalizerError(Box::new(e)))
}

fn error_policy(
    _resource: Arc<ECRPullSecret>,
    error: &RefresherError,
    _ctx: Arc<EcrPullSecretReconciler>,
) -> Action {
    error!("Reconciliation error: {}", error);
    Action::requeue(Duration::from_secs(ERROR_REQUEUE_SECS))
}
