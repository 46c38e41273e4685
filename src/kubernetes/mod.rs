// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for CRD discovery, pull secret sync and service account binding.

pub mod crd;
pub mod pull_secret;
pub mod service_account;

pub use crd::wait_for_crd;
pub use pull_secret::{ensure_pull_secret, SecretSync};
pub use service_account::{bind_pull_secret, BindingPolicy};
