// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Prints the ECRPullSecret CustomResourceDefinition as YAML.

use ecr_credential_refresher::types::ECRPullSecret;
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&ECRPullSecret::crd())?);
    Ok(())
}
