// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pull secret create-or-replace

use crate::constants::{pull_secret, OPERATOR_NAME};
use crate::error::{RefresherError, Result};
use crate::registry::PullCredentialDocument;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client,
};
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// What the synchronizer did to the pull secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSync {
    Created,
    Updated,
}

/// Ensure `namespace/name` holds `document`, creating the secret or replacing the existing one.
///
/// Read-then-write: the replace carries the resource version that was read, so a
/// concurrent writer makes this call fail with a conflict rather than clobber it.
#[instrument(skip(client, document))]
pub async fn ensure_pull_secret(
    client: &Client,
    namespace: &str,
    name: &str,
    document: &PullCredentialDocument,
) -> Result<SecretSync> {
    let sync_failed = |reason: String| RefresherError::SecretSyncFailed {
        namespace: namespace.to_string(),
        name: name.to_string(),
        reason,
    };

    let payload = document.to_json()?;
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);

    match secrets.get(name).await {
        Ok(existing) => {
            let replacement = replacement_secret(existing, payload);
            secrets
                .replace(name, &PostParams::default(), &replacement)
                .await
                .map_err(|e| match e {
                    kube::Error::Api(err) if err.code == 409 => {
                        sync_failed(format!("conflicting write, retrying on next refresh: {}", err.message))
                    }
                    e => sync_failed(e.to_string()),
                })?;
            info!("Updated secret {} in {}", name, namespace);
            Ok(SecretSync::Updated)
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            secrets
                .create(&PostParams::default(), &new_secret(namespace, name, payload))
                .await
                .map_err(|e| sync_failed(e.to_string()))?;
            info!("Created secret {} in {}", name, namespace);
            Ok(SecretSync::Created)
        }
        Err(e) => Err(sync_failed(e.to_string())),
    }
}

fn pull_secret_data(payload: Vec<u8>) -> BTreeMap<String, ByteString> {
    BTreeMap::from([(pull_secret::DATA_KEY.to_string(), ByteString(payload))])
}

/// A brand new pull secret
fn new_secret(namespace: &str, name: &str, payload: Vec<u8>) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(BTreeMap::from([(
                pull_secret::MANAGED_BY_LABEL.to_string(),
                OPERATOR_NAME.to_string(),
            )])),
            ..Default::default()
        },
        type_: Some(pull_secret::TYPE.to_string()),
        data: Some(pull_secret_data(payload)),
        ..Default::default()
    }
}

/// The existing secret with its type and data replaced; metadata, including the
/// resource version, is kept as read
fn replacement_secret(existing: Secret, payload: Vec<u8>) -> Secret {
    Secret {
        type_: Some(pull_secret::TYPE.to_string()),
        data: Some(pull_secret_data(payload)),
        string_data: None,
        ..existing
    }
}
