//! Account authorization module
//!
//! Decides whether a principal may act on an account or location by
//! resolving the scopes of its role and permission grants and walking the
//! account hierarchy. All state is read from an
//! [`AccountDirectoryPluginClient`](account_authz_sdk::AccountDirectoryPluginClient)
//! on every call; nothing is cached.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;

pub use config::AccountAuthzConfig;
pub use domain::{AccountAuthzLocalClient, Service};
