//! Local (in-process) client for account authorization.

use std::collections::BTreeSet;
use std::sync::Arc;

use account_authz_sdk::{
    AccountAuthzClient, AccountAuthzError, AccountInfo, AccountSelector, CheckOptions,
    LocationInfo,
};
use async_trait::async_trait;
use riskdesk_security::{AccountId, LocationId, Permission, ScopeSet, SecurityContext};

use super::{DomainError, Service};

/// Local client wrapping the service.
pub struct AccountAuthzLocalClient {
    svc: Arc<Service>,
}

impl AccountAuthzLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> AccountAuthzError {
    match &e {
        DomainError::AccountNotFound(_) | DomainError::LocationNotFound(_) => {
            tracing::debug!(operation = op, error = %e, "account_authz lookup missed");
        }
        _ => tracing::error!(operation = op, error = ?e, "account_authz call failed"),
    }
    e.into()
}

#[async_trait]
impl AccountAuthzClient for AccountAuthzLocalClient {
    async fn resolve_scopes(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
    ) -> Result<ScopeSet, AccountAuthzError> {
        self.svc
            .resolve_scopes(ctx, permission)
            .await
            .map_err(|e| log_and_convert("resolve_scopes", e))
    }

    async fn has_permission(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
    ) -> Result<bool, AccountAuthzError> {
        self.svc
            .has_permission(ctx, permission)
            .await
            .map_err(|e| log_and_convert("has_permission", e))
    }

    async fn has_any_permission(
        &self,
        ctx: &SecurityContext,
        permissions: &[Permission],
    ) -> Result<bool, AccountAuthzError> {
        self.svc
            .has_any_permission(ctx, permissions)
            .await
            .map_err(|e| log_and_convert("has_any_permission", e))
    }

    async fn has_account_permission(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        account_id: AccountId,
        include_descendants: bool,
        options: &CheckOptions,
    ) -> Result<bool, AccountAuthzError> {
        self.svc
            .has_account_permission(ctx, permission, account_id, include_descendants, options)
            .await
            .map_err(|e| log_and_convert("has_account_permission", e))
    }

    async fn has_permission_in_subtree(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        account_id: AccountId,
        options: &CheckOptions,
    ) -> Result<bool, AccountAuthzError> {
        self.svc
            .has_permission_in_subtree(ctx, permission, account_id, options)
            .await
            .map_err(|e| log_and_convert("has_permission_in_subtree", e))
    }

    async fn has_location_permission(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        location_id: LocationId,
        options: &CheckOptions,
    ) -> Result<bool, AccountAuthzError> {
        self.svc
            .has_location_permission(ctx, permission, location_id, options)
            .await
            .map_err(|e| log_and_convert("has_location_permission", e))
    }

    async fn authorized_account(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        selector: &AccountSelector,
        options: &CheckOptions,
    ) -> Result<Option<AccountInfo>, AccountAuthzError> {
        self.svc
            .authorized_account(ctx, permission, selector, options)
            .await
            .map_err(|e| log_and_convert("authorized_account", e))
    }

    async fn authorized_location_ids(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        options: &CheckOptions,
    ) -> Result<BTreeSet<LocationId>, AccountAuthzError> {
        self.svc
            .authorized_location_ids(ctx, permission, options)
            .await
            .map_err(|e| log_and_convert("authorized_location_ids", e))
    }

    async fn visible_locations(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        account_id: AccountId,
        options: &CheckOptions,
    ) -> Result<Vec<LocationInfo>, AccountAuthzError> {
        self.svc
            .visible_locations(ctx, permission, account_id, options)
            .await
            .map_err(|e| log_and_convert("visible_locations", e))
    }
}
