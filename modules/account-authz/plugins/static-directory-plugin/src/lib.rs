#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static account directory plugin
//!
//! Serves accounts, locations, roles and user grants from configuration. Used
//! by tests and the operator CLI in place of the database-backed directory.
//!
//! ## Configuration
//!
//! ```yaml
//! accounts:
//!   - { id: 7, name: "Acme Holdings" }
//!   - { id: 8, name: "Acme West", parent_account_id: 7 }
//! locations:
//!   - { id: 42, account_id: 8, name: "Warehouse" }
//! roles:
//!   - name: account-admin
//!     permissions: [manage-users, location-edit]
//! users:
//!   - id: 1
//!     account_id: 8
//!     roles:
//!       - role: account-admin
//!         scopes: [{ scope_type: account, scope_id: 7 }]
//!     permissions:
//!       - permission: claims
//!         scopes: [{ scope_type: location, scope_id: 42 }]
//! ```

pub mod config;
pub mod domain;

pub use config::StaticDirectoryPluginConfig;
pub use domain::Service;
