//! Directory plugin API: the read-only store authorization runs against.

use async_trait::async_trait;
use riskdesk_security::{AccountId, Grant, LocationId, UserId};

use crate::error::AccountAuthzError;
use crate::models::{AccountInfo, LocationInfo};

/// Read access to accounts, locations and user grants.
///
/// Implementations return deactivated records as well; anchor policies are
/// applied by the caller. Lookups that find nothing return `Ok(None)` or an
/// empty list, never an error.
#[async_trait]
pub trait AccountDirectoryPluginClient: Send + Sync {
    /// Look up one account by id.
    ///
    /// # Errors
    ///
    /// - `DirectoryUnavailable` if the store cannot be read
    async fn get_account(&self, id: AccountId) -> Result<Option<AccountInfo>, AccountAuthzError>;

    /// Direct children of an account (one level down).
    ///
    /// # Errors
    ///
    /// - `DirectoryUnavailable` if the store cannot be read
    async fn get_child_accounts(
        &self,
        id: AccountId,
    ) -> Result<Vec<AccountInfo>, AccountAuthzError>;

    /// Look up one location by id.
    ///
    /// # Errors
    ///
    /// - `DirectoryUnavailable` if the store cannot be read
    async fn get_location(
        &self,
        id: LocationId,
    ) -> Result<Option<LocationInfo>, AccountAuthzError>;

    /// Locations whose id is in `ids`, optionally restricted to one owning account.
    ///
    /// Unknown ids are skipped.
    ///
    /// # Errors
    ///
    /// - `DirectoryUnavailable` if the store cannot be read
    async fn find_locations(
        &self,
        ids: &[LocationId],
        account_id: Option<AccountId>,
    ) -> Result<Vec<LocationInfo>, AccountAuthzError>;

    /// Every location owned by any of `account_ids`.
    ///
    /// # Errors
    ///
    /// - `DirectoryUnavailable` if the store cannot be read
    async fn get_locations_for_accounts(
        &self,
        account_ids: &[AccountId],
    ) -> Result<Vec<LocationInfo>, AccountAuthzError>;

    /// Every role and direct permission grant held by a user.
    ///
    /// An unknown user has no grants.
    ///
    /// # Errors
    ///
    /// - `DirectoryUnavailable` if the store cannot be read
    async fn get_grants(&self, user_id: UserId) -> Result<Vec<Grant>, AccountAuthzError>;
}
