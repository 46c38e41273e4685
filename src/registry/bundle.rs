// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pull credential document (`.dockerconfigjson`) assembly

use crate::constants::pull_secret::PLACEHOLDER_EMAIL;
use crate::error::{RefresherError, Result};
use crate::registry::{split_token, CredentialResolver, TokenIssuer};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RegistryAuth {
    pub username: String,
    pub password: String,
    pub auth: String,
    pub email: String,
}

/// The registry pull credential document stored in the pull secret
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PullCredentialDocument {
    pub auths: BTreeMap<String, RegistryAuth>,
}

impl PullCredentialDocument {
    /// Build a document with a single entry for `registry` from a raw registry token
    pub fn from_token(registry: &str, token: &str) -> Result<Self> {
        let (username, password) = split_token(token)?;
        let entry = RegistryAuth {
            username,
            password,
            auth: token.to_string(),
            email: PLACEHOLDER_EMAIL.to_string(),
        };

        Ok(Self {
            auths: BTreeMap::from([(registry.to_string(), entry)]),
        })
    }

    /// Canonical JSON bytes; identical input always yields identical bytes
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Base64 text form of the JSON document
    pub fn encoded(&self) -> Result<String> {
        Ok(STANDARD.encode(self.to_json()?))
    }

    /// Parse the base64 text form back into a document
    pub fn decode(encoded: &str) -> Result<Self> {
        let bytes = STANDARD.decode(encoded).map_err(|e| {
            RefresherError::InvalidDocument(format!("not base64: {}", e))
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Mints pull credential documents: resolve credentials, issue a token, assemble.
#[derive(Clone)]
pub struct BundleBuilder {
    resolver: CredentialResolver,
    issuer: Arc<dyn TokenIssuer>,
}

impl BundleBuilder {
    pub fn new(resolver: CredentialResolver, issuer: Arc<dyn TokenIssuer>) -> Self {
        Self { resolver, issuer }
    }

    /// Build a fresh document for `registry`. Credentials and token are never reused.
    #[instrument(skip(self))]
    pub async fn build_bundle(&self, registry: &str) -> Result<PullCredentialDocument> {
        let credentials = self.resolver.resolve().await?;
        let token = self.issuer.issue(&credentials).await?;
        PullCredentialDocument::from_token(registry, &token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::constants::credentials::{ACCESS_KEY_ID, SECRET_ACCESS_KEY};
    use crate::test_utils::{env_with, registry_token, FakeTokenIssuer, MockService};

    const REGISTRY: &str = "123456789012.dkr.ecr.us-east-1.amazonaws.com";

    fn builder(issuer: FakeTokenIssuer) -> BundleBuilder {
        let resolver = CredentialResolver::new(MockService::new().into_client(), &Config::default())
            .with_env(env_with(&[(ACCESS_KEY_ID, "AKIA"), (SECRET_ACCESS_KEY, "secret")]));
        BundleBuilder::new(resolver, Arc::new(issuer))
    }

    #[tokio::test]
    async fn test_build_bundle_round_trip() {
        let token = registry_token("AWS", "pass");
        let doc = builder(FakeTokenIssuer::returning(&token))
            .build_bundle(REGISTRY)
            .await
            .unwrap();

        let decoded: serde_json::Value =
            serde_json::from_slice(&STANDARD.decode(doc.encoded().unwrap()).unwrap()).unwrap();

        assert_eq!(
            decoded,
            serde_json::json!({
                "auths": {
                    REGISTRY: {
                        "username": "AWS",
                        "password": "pass",
                        "auth": token,
                        "email": "none@no@email.local"
                    }
                }
            })
        );
        assert_eq!(PullCredentialDocument::decode(&doc.encoded().unwrap()).unwrap(), doc);
    }

    #[tokio::test]
    async fn test_build_bundle_is_deterministic() {
        let issuer = FakeTokenIssuer::returning(&registry_token("AWS", "pass"));
        let builder = builder(issuer.clone());

        let first = builder.build_bundle(REGISTRY).await.unwrap();
        let second = builder.build_bundle(REGISTRY).await.unwrap();

        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
        assert_eq!(issuer.calls(), 2);
    }

    #[tokio::test]
    async fn test_build_bundle_rejects_token_without_separator() {
        let token = STANDARD.encode("AWSpass");
        let err = builder(FakeTokenIssuer::returning(&token))
            .build_bundle(REGISTRY)
            .await
            .unwrap_err();

        assert!(matches!(err, RefresherError::TokenIssuanceFailed(_)));
    }

    #[tokio::test]
    async fn test_build_bundle_propagates_issuer_failure() {
        let err = builder(FakeTokenIssuer::failing())
            .build_bundle(REGISTRY)
            .await
            .unwrap_err();

        assert!(matches!(err, RefresherError::TokenIssuanceFailed(_)));
    }

    #[test]
    fn test_document_has_single_registry_entry() {
        let doc = PullCredentialDocument::from_token(REGISTRY, &registry_token("u", "p")).unwrap();
        assert_eq!(doc.auths.len(), 1);
        assert!(doc.auths.contains_key(REGISTRY));
    }
}
