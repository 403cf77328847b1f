#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Account authorization SDK
//!
//! This crate provides the public API for the `account_authz` module:
//!
//! - [`AccountAuthzClient`] - Public API trait for controllers
//! - [`AccountDirectoryPluginClient`] - Directory (store) trait for implementations
//! - [`AccountInfo`], [`LocationInfo`], [`AccountSelector`], [`CheckOptions`] - Models
//! - [`AccountAuthzError`] - Error types
//! - [`pep`] - Enforcement helpers ([`AccountEnforcer`])
//!
//! ## Usage
//!
//! ```ignore
//! use account_authz_sdk::{AccountEnforcer, AccountSelector};
//! use riskdesk_security::Permission;
//!
//! let enforcer = AccountEnforcer::new(authz);
//!
//! // Controller gate: Forbidden maps to HTTP 403.
//! let account = enforcer
//!     .require_account(&ctx, Permission::LocationEdit, &AccountSelector::from_query(query))
//!     .await?;
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod pep;
pub mod plugin_api;

pub use api::AccountAuthzClient;
pub use error::AccountAuthzError;
pub use models::{AccountInfo, AccountSelector, AnchorPolicy, CheckOptions, LocationInfo};
pub use pep::{AccountEnforcer, EnforcerError};
pub use plugin_api::AccountDirectoryPluginClient;
