// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Reconciliation passes over the target namespaces.

pub mod refresher;

pub use refresher::{NamespaceOutcome, Refresher};
