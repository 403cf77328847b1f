#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Security primitives shared by every RiskDesk module.
//!
//! - [`SecurityContext`] - the principal a request acts on behalf of
//! - [`Permission`] - closed set of capability names
//! - [`Scope`], [`ScopeSet`] - `(account|location, id)` anchors a grant applies to
//! - [`Grant`] - role or direct permission assignment carrying scopes

pub mod access_scope;
pub mod context;
pub mod grant;
pub mod permission;

pub use access_scope::{Scope, ScopeSet, ScopeType};
pub use context::SecurityContext;
pub use grant::{Grant, PermissionGrant, RoleGrant};
pub use permission::{Permission, UnknownPermission};

/// Account identifier.
pub type AccountId = i64;

/// Location identifier.
pub type LocationId = i64;

/// User identifier.
pub type UserId = i64;
