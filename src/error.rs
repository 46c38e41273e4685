// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::runtime::finalizer;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefresherError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("AWS credentials unavailable from {source_ref}: {reason}")]
    CredentialsUnavailable { source_ref: String, reason: String },

    #[error("Registry token issuance failed: {0}")]
    TokenIssuanceFailed(String),

    #[error("Failed to sync secret {namespace}/{name}: {reason}")]
    SecretSyncFailed {
        namespace: String,
        name: String,
        reason: String,
    },

    #[error("Failed to bind pull secret in namespace {namespace}: {reason}")]
    BindingFailed { namespace: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid ECRPullSecret spec: {0}")]
    InvalidSpec(String),

    #[error("Invalid pull credential document: {0}")]
    InvalidDocument(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Finalizer error: {0}")]
    FinalizerError(#[source] Box<finalizer::Error<RefresherError>>),
}

pub type Result<T> = std::result::Result<T, RefresherError>;
