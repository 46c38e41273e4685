// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Binding the pull secret to the namespace's default service account

use crate::constants::DEFAULT_SERVICE_ACCOUNT;
use crate::error::{RefresherError, Result};
use k8s_openapi::api::core::v1::{LocalObjectReference, ServiceAccount};
use kube::{
    api::{Patch, PatchParams},
    Api, Client,
};
use std::str::FromStr;
use tracing::{debug, info, instrument};

/// How the pull secret reference is written into the service account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingPolicy {
    /// The reference list becomes exactly `[secretName]`, dropping any other entries
    #[default]
    Overwrite,
    /// `secretName` is appended when missing; other entries are kept
    Merge,
}

impl FromStr for BindingPolicy {
    type Err = RefresherError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(BindingPolicy::Overwrite),
            "merge" => Ok(BindingPolicy::Merge),
            other => Err(RefresherError::InvalidConfig(format!(
                "unknown service account binding policy '{}'",
                other
            ))),
        }
    }
}

impl BindingPolicy {
    /// The pull secret reference list after binding `secret_name`
    pub fn apply(
        &self,
        current: Option<&[LocalObjectReference]>,
        secret_name: &str,
    ) -> Vec<LocalObjectReference> {
        let reference = LocalObjectReference {
            name: secret_name.to_string(),
        };
        match self {
            BindingPolicy::Overwrite => vec![reference],
            BindingPolicy::Merge => {
                let mut refs = current.map(<[_]>::to_vec).unwrap_or_default();
                if !refs.iter().any(|r| r.name == secret_name) {
                    refs.push(reference);
                }
                refs
            }
        }
    }
}

/// Point the default service account of `namespace` at `secret_name`.
#[instrument(skip(client))]
pub async fn bind_pull_secret(
    client: &Client,
    namespace: &str,
    secret_name: &str,
    policy: BindingPolicy,
) -> Result<()> {
    let binding_failed = |e: kube::Error| RefresherError::BindingFailed {
        namespace: namespace.to_string(),
        reason: e.to_string(),
    };

    let accounts: Api<ServiceAccount> = Api::namespaced(client.clone(), namespace);
    let account = accounts
        .get(DEFAULT_SERVICE_ACCOUNT)
        .await
        .map_err(binding_failed)?;

    let refs = policy.apply(account.image_pull_secrets.as_deref(), secret_name);
    if account.image_pull_secrets.as_deref() == Some(refs.as_slice()) {
        debug!("Service account {}/{} already bound", namespace, DEFAULT_SERVICE_ACCOUNT);
        return Ok(());
    }

    // A JSON merge patch replaces the whole list
    let patch = serde_json::json!({ "imagePullSecrets": refs });
    accounts
        .patch(
            DEFAULT_SERVICE_ACCOUNT,
            &PatchParams::default(),
            &Patch::Merge(&patch),
        )
        .await
        .map_err(binding_failed)?;

    info!("Patched {} service account in {}", DEFAULT_SERVICE_ACCOUNT, namespace);
    Ok(())
}
