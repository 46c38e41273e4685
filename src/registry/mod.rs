// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Upstream credentials, registry tokens and pull credential documents.

pub mod bundle;
pub mod credentials;
pub mod token;

pub use bundle::{BundleBuilder, PullCredentialDocument, RegistryAuth};
pub use credentials::{CredentialResolver, Credentials};
pub use token::{split_token, EcrTokenIssuer, TokenIssuer};
