//! Public API trait for account authorization.

use std::collections::BTreeSet;

use async_trait::async_trait;
use riskdesk_security::{AccountId, LocationId, Permission, ScopeSet, SecurityContext};

use crate::error::AccountAuthzError;
use crate::models::{AccountInfo, AccountSelector, CheckOptions, LocationInfo};

/// Public API of the account authorization module.
///
/// A denial is always `Ok(false)` / `Ok(None)`. `Err` is reserved for missing
/// target records and store failures, which callers must keep apart from
/// "not authorized".
#[async_trait]
pub trait AccountAuthzClient: Send + Sync {
    /// Every scope on which the principal holds `permission`, directly or
    /// through a role.
    ///
    /// # Errors
    ///
    /// - `DirectoryUnavailable` if grants cannot be read
    async fn resolve_scopes(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
    ) -> Result<ScopeSet, AccountAuthzError>;

    /// Whether the principal holds `permission` anywhere, regardless of scope.
    ///
    /// # Errors
    ///
    /// - `DirectoryUnavailable` if grants cannot be read
    async fn has_permission(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
    ) -> Result<bool, AccountAuthzError>;

    /// Whether the principal holds at least one of `permissions` anywhere.
    ///
    /// # Errors
    ///
    /// - `DirectoryUnavailable` if grants cannot be read
    async fn has_any_permission(
        &self,
        ctx: &SecurityContext,
        permissions: &[Permission],
    ) -> Result<bool, AccountAuthzError>;

    /// Whether the principal holds `permission` on `account_id`.
    ///
    /// With `include_descendants` the grant may sit on the account itself or
    /// on any ancestor (the target is a descendant of the anchor). Without it
    /// only a grant on the account itself counts.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if an ancestor walk starts at an unknown account
    /// - `HierarchyCycle` in strict mode on a malformed hierarchy
    /// - `DirectoryUnavailable` if the store cannot be read
    async fn has_account_permission(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        account_id: AccountId,
        include_descendants: bool,
        options: &CheckOptions,
    ) -> Result<bool, AccountAuthzError>;

    /// Whether the principal holds `permission` on `account_id` or on any
    /// account below it.
    ///
    /// This walks downward from the target and answers "does the principal
    /// manage something inside this subtree", the reverse of the ancestor walk.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if `account_id` is unknown
    /// - `HierarchyCycle` in strict mode on a malformed hierarchy
    /// - `DirectoryUnavailable` if the store cannot be read
    async fn has_permission_in_subtree(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        account_id: AccountId,
        options: &CheckOptions,
    ) -> Result<bool, AccountAuthzError>;

    /// Whether the principal holds `permission` on a location, either through
    /// a location scope or through a scope on the location's account.
    ///
    /// # Errors
    ///
    /// - `LocationNotFound` if `location_id` is unknown
    /// - `DirectoryUnavailable` if the store cannot be read
    async fn has_location_permission(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        location_id: LocationId,
        options: &CheckOptions,
    ) -> Result<bool, AccountAuthzError>;

    /// Authorize and load the account a request operates on.
    ///
    /// Returns the selected account when the principal holds `permission` on
    /// it or an ancestor, or failing that on at least one of its locations.
    /// Returns `None` when unauthorized.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if the selected account is unknown
    /// - `HierarchyCycle` in strict mode on a malformed hierarchy
    /// - `DirectoryUnavailable` if the store cannot be read
    async fn authorized_account(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        selector: &AccountSelector,
        options: &CheckOptions,
    ) -> Result<Option<AccountInfo>, AccountAuthzError>;

    /// Every location the principal holds `permission` on: directly scoped
    /// locations plus all locations of scoped accounts and their descendants.
    ///
    /// # Errors
    ///
    /// - `HierarchyCycle` in strict mode on a malformed hierarchy
    /// - `DirectoryUnavailable` if the store cannot be read
    async fn authorized_location_ids(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        options: &CheckOptions,
    ) -> Result<BTreeSet<LocationId>, AccountAuthzError>;

    /// The locations of `account_id` the principal may see under `permission`.
    ///
    /// All of them when the permission is held on the account or an ancestor,
    /// otherwise only the location-scoped ones.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if `account_id` is unknown
    /// - `HierarchyCycle` in strict mode on a malformed hierarchy
    /// - `DirectoryUnavailable` if the store cannot be read
    async fn visible_locations(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        account_id: AccountId,
        options: &CheckOptions,
    ) -> Result<Vec<LocationInfo>, AccountAuthzError>;
}
