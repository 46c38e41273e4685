// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes reconcilers that react to watch events.

pub mod ecr_pull_secret;
pub mod triggers;

pub use ecr_pull_secret::EcrPullSecretReconciler;
pub use triggers::{Decision, TimerSchedule, Trigger, TriggerLedger};
