//! Client implementation for the static directory plugin.
//!
//! Implements `AccountDirectoryPluginClient` over the in-memory maps.

use std::collections::HashSet;

use account_authz_sdk::{
    AccountAuthzError, AccountDirectoryPluginClient, AccountInfo, LocationInfo,
};
use async_trait::async_trait;
use riskdesk_security::{AccountId, Grant, LocationId, UserId};

use super::service::Service;

#[async_trait]
impl AccountDirectoryPluginClient for Service {
    async fn get_account(&self, id: AccountId) -> Result<Option<AccountInfo>, AccountAuthzError> {
        Ok(self.accounts.get(&id).cloned())
    }

    async fn get_child_accounts(
        &self,
        id: AccountId,
    ) -> Result<Vec<AccountInfo>, AccountAuthzError> {
        Ok(self
            .accounts
            .values()
            .filter(|a| a.parent_account_id == Some(id))
            .cloned()
            .collect())
    }

    async fn get_location(
        &self,
        id: LocationId,
    ) -> Result<Option<LocationInfo>, AccountAuthzError> {
        Ok(self.locations.get(&id).cloned())
    }

    async fn find_locations(
        &self,
        ids: &[LocationId],
        account_id: Option<AccountId>,
    ) -> Result<Vec<LocationInfo>, AccountAuthzError> {
        let mut seen = HashSet::new();
        Ok(ids
            .iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| self.locations.get(id))
            .filter(|l| account_id.is_none_or(|a| l.account_id == a))
            .cloned()
            .collect())
    }

    async fn get_locations_for_accounts(
        &self,
        account_ids: &[AccountId],
    ) -> Result<Vec<LocationInfo>, AccountAuthzError> {
        let wanted: HashSet<AccountId> = account_ids.iter().copied().collect();
        Ok(self
            .locations
            .values()
            .filter(|l| wanted.contains(&l.account_id))
            .cloned()
            .collect())
    }

    async fn get_grants(&self, user_id: UserId) -> Result<Vec<Grant>, AccountAuthzError> {
        Ok(self.grants.get(&user_id).cloned().unwrap_or_default())
    }
}
