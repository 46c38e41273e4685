// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The operator name, used as field manager and managed-by label value
pub const OPERATOR_NAME: &str = "ecr-credential-refresher";

/// Finalizer that routes resource deletion through the delete handler
pub const FINALIZER: &str = "alchemy.com/ecr-credential-refresher";

/// Coordinates of the ECRPullSecret custom resource
pub mod crd {
    pub const GROUP: &str = "alchemy.com";
    pub const VERSION: &str = "v1alpha1";
    pub const KIND: &str = "ECRPullSecret";
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}

/// Defaults applied when the resource spec or the environment leaves a value out
pub mod defaults {
    pub const SECRET_NAME: &str = "aws-registry-209202477790";
    pub const NAMESPACE: &str = "default";
    pub const REGISTRY: &str = "209202477790.dkr.ecr.us-east-1.amazonaws.com";
    pub const AWS_REGION: &str = "us-east-1";
    pub const CREDENTIALS_SECRET_NAME: &str = "ecr-credential-refresher";
    pub const CREDENTIALS_SECRET_NAMESPACE: &str = "default";
    /// Six hours
    pub const REFRESH_INTERVAL_SECS: u64 = 6 * 3600;
}

/// Names of the access key pair, both as environment variables and as fields of the
/// fallback credentials secret
pub mod credentials {
    pub const ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
    pub const SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
}

/// Shape of the produced pull secret
pub mod pull_secret {
    pub const TYPE: &str = "kubernetes.io/dockerconfigjson";
    pub const DATA_KEY: &str = ".dockerconfigjson";
    /// The registry never checks this, the document format just requires one
    pub const PLACEHOLDER_EMAIL: &str = "none@no@email.local";
    pub const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";
}

/// Service account that receives the pull secret reference in every target namespace
pub const DEFAULT_SERVICE_ACCOUNT: &str = "default";

/// Requeue delay after a failed reconcile
pub const ERROR_REQUEUE_SECS: u64 = 60;
