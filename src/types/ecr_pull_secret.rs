// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::defaults;
use crate::error::{RefresherError, Result};
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Declares which namespaces receive the registry pull secret, and under what name
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(
    group = "alchemy.com",
    version = "v1alpha1",
    kind = "ECRPullSecret",
    plural = "ecrpullsecrets",
    shortname = "ecrps"
)]
#[serde(rename_all = "camelCase")]
pub struct ECRPullSecretSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<Vec<String>>,
}

/// A validated resource spec with all defaults applied.
///
/// Built fresh from the current resource state on every trigger; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTarget {
    pub secret_name: String,
    pub namespaces: Vec<String>,
}

impl RefreshTarget {
    pub fn from_spec(spec: &ECRPullSecretSpec) -> Result<Self> {
        let secret_name = match &spec.secret_name {
            Some(name) if name.trim().is_empty() => {
                return Err(RefresherError::InvalidSpec(
                    "secretName must not be empty".to_string(),
                ))
            }
            Some(name) => name.clone(),
            None => defaults::SECRET_NAME.to_string(),
        };

        let namespaces = match &spec.namespaces {
            Some(list) if list.is_empty() => {
                return Err(RefresherError::InvalidSpec(
                    "namespaces must list at least one namespace".to_string(),
                ))
            }
            Some(list) => {
                let mut unique: Vec<String> = Vec::with_capacity(list.len());
                for ns in list {
                    if ns.trim().is_empty() {
                        return Err(RefresherError::InvalidSpec(
                            "namespaces must not contain empty entries".to_string(),
                        ));
                    }
                    if !unique.contains(ns) {
                        unique.push(ns.clone());
                    }
                }
                unique
            }
            None => vec![defaults::NAMESPACE.to_string()],
        };

        Ok(RefreshTarget {
            secret_name,
            namespaces,
        })
    }
}

impl ECRPullSecret {
    /// Parse this resource's spec into a refresh target
    pub fn refresh_target(&self) -> Result<RefreshTarget> {
        RefreshTarget::from_spec(&self.spec)
    }
}
