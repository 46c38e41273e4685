// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resource types watched by the operator.

pub mod ecr_pull_secret;

pub use ecr_pull_secret::{ECRPullSecret, ECRPullSecretSpec, RefreshTarget};
