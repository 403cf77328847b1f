//! Policy enforcement object.
//!
//! [`AccountEnforcer`] wraps an [`AccountAuthzClient`] and converts its
//! `false` / `None` decisions into [`EnforcerError::Forbidden`], so a handler
//! gate is a single `?`. Missing records surface as
//! [`EnforcerError::NotFound`], never as `Forbidden`.

use std::sync::Arc;

use riskdesk_security::{LocationId, Permission, SecurityContext};

use crate::api::AccountAuthzClient;
use crate::error::AccountAuthzError;
use crate::models::{AccountInfo, AccountSelector, CheckOptions};

/// Error from the enforcement flow.
#[derive(Debug, thiserror::Error)]
pub enum EnforcerError {
    /// The principal lacks the permission for the target.
    #[error("permission '{permission}' denied")]
    Forbidden { permission: Permission },

    /// The target account or location does not exist.
    #[error("not found: {0}")]
    NotFound(AccountAuthzError),

    /// The authorization check itself failed.
    #[error("authorization evaluation failed: {0}")]
    EvaluationFailed(AccountAuthzError),
}

impl From<AccountAuthzError> for EnforcerError {
    fn from(e: AccountAuthzError) -> Self {
        if e.is_not_found() {
            Self::NotFound(e)
        } else {
            Self::EvaluationFailed(e)
        }
    }
}

impl EnforcerError {
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }
}

/// Gate for request handlers.
///
/// Constructed once during service init; cloneable and cheap to pass around
/// (`Arc` inside).
///
/// # Example
///
/// ```ignore
/// let enforcer = AccountEnforcer::new(authz.clone());
///
/// let account = enforcer
///     .require_account(&ctx, Permission::ManageUsers, &AccountSelector::from_query(query))
///     .await?;
/// ```
#[derive(Clone)]
pub struct AccountEnforcer {
    authz: Arc<dyn AccountAuthzClient>,
    options: CheckOptions,
}

impl AccountEnforcer {
    pub fn new(authz: Arc<dyn AccountAuthzClient>) -> Self {
        Self {
            authz,
            options: CheckOptions::default(),
        }
    }

    /// Use these anchor-policy overrides for every check this enforcer runs.
    #[must_use]
    pub fn with_options(mut self, options: CheckOptions) -> Self {
        self.options = options;
        self
    }

    /// The underlying client, for checks that do not gate a request.
    #[must_use]
    pub fn client(&self) -> &Arc<dyn AccountAuthzClient> {
        &self.authz
    }

    /// Authorize and load the account a request operates on.
    ///
    /// # Errors
    ///
    /// - [`EnforcerError::Forbidden`] if the principal is not authorized
    /// - [`EnforcerError::NotFound`] if the selected account does not exist
    /// - [`EnforcerError::EvaluationFailed`] if the check fails
    pub async fn require_account(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        selector: &AccountSelector,
    ) -> Result<AccountInfo, EnforcerError> {
        self.authz
            .authorized_account(ctx, permission, selector, &self.options)
            .await?
            .ok_or_else(|| deny(ctx, permission))
    }

    /// Require `permission` on one location.
    ///
    /// # Errors
    ///
    /// - [`EnforcerError::Forbidden`] if the principal is not authorized
    /// - [`EnforcerError::NotFound`] if the location does not exist
    /// - [`EnforcerError::EvaluationFailed`] if the check fails
    pub async fn require_location(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        location_id: LocationId,
    ) -> Result<(), EnforcerError> {
        if self
            .authz
            .has_location_permission(ctx, permission, location_id, &self.options)
            .await?
        {
            Ok(())
        } else {
            Err(deny(ctx, permission))
        }
    }

    /// Require `permission` anywhere (route-level gate).
    ///
    /// # Errors
    ///
    /// - [`EnforcerError::Forbidden`] if the principal holds it nowhere
    /// - [`EnforcerError::EvaluationFailed`] if the check fails
    pub async fn require_permission(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
    ) -> Result<(), EnforcerError> {
        if self.authz.has_permission(ctx, permission).await? {
            Ok(())
        } else {
            Err(deny(ctx, permission))
        }
    }
}

fn deny(ctx: &SecurityContext, permission: Permission) -> EnforcerError {
    tracing::debug!(
        subject_id = ctx.subject_id(),
        permission = %permission,
        "request denied"
    );
    EnforcerError::Forbidden { permission }
}

impl std::fmt::Debug for AccountEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountEnforcer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::collections::BTreeSet;

    use async_trait::async_trait;
    use riskdesk_security::{AccountId, ScopeSet};

    use super::*;
    use crate::models::LocationInfo;

    /// Answers every check with a fixed decision.
    struct FixedMock {
        allow: bool,
    }

    fn account(id: AccountId) -> AccountInfo {
        AccountInfo {
            id,
            parent_account_id: None,
            name: format!("account-{id}"),
            deactivated: false,
        }
    }

    #[async_trait]
    impl AccountAuthzClient for FixedMock {
        async fn resolve_scopes(
            &self,
            _ctx: &SecurityContext,
            _permission: Permission,
        ) -> Result<ScopeSet, AccountAuthzError> {
            Ok(ScopeSet::new())
        }

        async fn has_permission(
            &self,
            _ctx: &SecurityContext,
            _permission: Permission,
        ) -> Result<bool, AccountAuthzError> {
            Ok(self.allow)
        }

        async fn has_any_permission(
            &self,
            _ctx: &SecurityContext,
            _permissions: &[Permission],
        ) -> Result<bool, AccountAuthzError> {
            Ok(self.allow)
        }

        async fn has_account_permission(
            &self,
            _ctx: &SecurityContext,
            _permission: Permission,
            _account_id: AccountId,
            _include_descendants: bool,
            _options: &CheckOptions,
        ) -> Result<bool, AccountAuthzError> {
            Ok(self.allow)
        }

        async fn has_permission_in_subtree(
            &self,
            _ctx: &SecurityContext,
            _permission: Permission,
            _account_id: AccountId,
            _options: &CheckOptions,
        ) -> Result<bool, AccountAuthzError> {
            Ok(self.allow)
        }

        async fn has_location_permission(
            &self,
            _ctx: &SecurityContext,
            _permission: Permission,
            location_id: LocationId,
            _options: &CheckOptions,
        ) -> Result<bool, AccountAuthzError> {
            if location_id < 0 {
                return Err(AccountAuthzError::LocationNotFound { location_id });
            }
            Ok(self.allow)
        }

        async fn authorized_account(
            &self,
            ctx: &SecurityContext,
            _permission: Permission,
            selector: &AccountSelector,
            _options: &CheckOptions,
        ) -> Result<Option<AccountInfo>, AccountAuthzError> {
            Ok(self.allow.then(|| account(selector.resolve(ctx))))
        }

        async fn authorized_location_ids(
            &self,
            _ctx: &SecurityContext,
            _permission: Permission,
            _options: &CheckOptions,
        ) -> Result<BTreeSet<LocationId>, AccountAuthzError> {
            Ok(BTreeSet::new())
        }

        async fn visible_locations(
            &self,
            _ctx: &SecurityContext,
            _permission: Permission,
            _account_id: AccountId,
            _options: &CheckOptions,
        ) -> Result<Vec<LocationInfo>, AccountAuthzError> {
            Ok(Vec::new())
        }
    }

    /// Fails every account lookup.
    struct UnavailableMock;

    #[async_trait]
    impl AccountAuthzClient for UnavailableMock {
        async fn resolve_scopes(
            &self,
            _ctx: &SecurityContext,
            _permission: Permission,
        ) -> Result<ScopeSet, AccountAuthzError> {
            Err(AccountAuthzError::DirectoryUnavailable("down".to_owned()))
        }

        async fn has_permission(
            &self,
            _ctx: &SecurityContext,
            _permission: Permission,
        ) -> Result<bool, AccountAuthzError> {
            Err(AccountAuthzError::DirectoryUnavailable("down".to_owned()))
        }

        async fn has_any_permission(
            &self,
            _ctx: &SecurityContext,
            _permissions: &[Permission],
        ) -> Result<bool, AccountAuthzError> {
            Err(AccountAuthzError::DirectoryUnavailable("down".to_owned()))
        }

        async fn has_account_permission(
            &self,
            _ctx: &SecurityContext,
            _permission: Permission,
            _account_id: AccountId,
            _include_descendants: bool,
            _options: &CheckOptions,
        ) -> Result<bool, AccountAuthzError> {
            Err(AccountAuthzError::DirectoryUnavailable("down".to_owned()))
        }

        async fn has_permission_in_subtree(
            &self,
            _ctx: &SecurityContext,
            _permission: Permission,
            _account_id: AccountId,
            _options: &CheckOptions,
        ) -> Result<bool, AccountAuthzError> {
            Err(AccountAuthzError::DirectoryUnavailable("down".to_owned()))
        }

        async fn has_location_permission(
            &self,
            _ctx: &SecurityContext,
            _permission: Permission,
            _location_id: LocationId,
            _options: &CheckOptions,
        ) -> Result<bool, AccountAuthzError> {
            Err(AccountAuthzError::DirectoryUnavailable("down".to_owned()))
        }

        async fn authorized_account(
            &self,
            _ctx: &SecurityContext,
            _permission: Permission,
            selector: &AccountSelector,
            _options: &CheckOptions,
        ) -> Result<Option<AccountInfo>, AccountAuthzError> {
            match selector {
                AccountSelector::Explicit(id) => {
                    Err(AccountAuthzError::AccountNotFound { account_id: *id })
                }
                _ => Err(AccountAuthzError::DirectoryUnavailable("down".to_owned())),
            }
        }

        async fn authorized_location_ids(
            &self,
            _ctx: &SecurityContext,
            _permission: Permission,
            _options: &CheckOptions,
        ) -> Result<BTreeSet<LocationId>, AccountAuthzError> {
            Err(AccountAuthzError::DirectoryUnavailable("down".to_owned()))
        }

        async fn visible_locations(
            &self,
            _ctx: &SecurityContext,
            _permission: Permission,
            _account_id: AccountId,
            _options: &CheckOptions,
        ) -> Result<Vec<LocationInfo>, AccountAuthzError> {
            Err(AccountAuthzError::DirectoryUnavailable("down".to_owned()))
        }
    }

    fn test_ctx() -> SecurityContext {
        SecurityContext::builder()
            .subject_id(5)
            .subject_account_id(10)
            .build()
    }

    fn enforcer(mock: impl AccountAuthzClient + 'static) -> AccountEnforcer {
        AccountEnforcer::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn require_account_returns_selected_account() {
        let e = enforcer(FixedMock { allow: true });
        let account = e
            .require_account(&test_ctx(), Permission::ManageUsers, &AccountSelector::Own)
            .await
            .unwrap();
        assert_eq!(account.id, 10);
    }

    #[tokio::test]
    async fn require_account_denial_is_forbidden() {
        let e = enforcer(FixedMock { allow: false });
        let err = e
            .require_account(
                &test_ctx(),
                Permission::ManageUsers,
                &AccountSelector::Explicit(3),
            )
            .await
            .unwrap_err();

        assert!(err.is_forbidden());
        assert!(matches!(
            err,
            EnforcerError::Forbidden {
                permission: Permission::ManageUsers
            }
        ));
    }

    #[tokio::test]
    async fn missing_account_is_not_found_not_forbidden() {
        let e = enforcer(UnavailableMock);
        let err = e
            .require_account(
                &test_ctx(),
                Permission::ManageUsers,
                &AccountSelector::Explicit(3),
            )
            .await
            .unwrap_err();

        assert!(!err.is_forbidden());
        assert!(matches!(
            err,
            EnforcerError::NotFound(AccountAuthzError::AccountNotFound { account_id: 3 })
        ));
    }

    #[tokio::test]
    async fn store_failure_is_evaluation_failure() {
        let e = enforcer(UnavailableMock);
        let err = e
            .require_permission(&test_ctx(), Permission::Forum)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EnforcerError::EvaluationFailed(AccountAuthzError::DirectoryUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn require_location_maps_each_outcome() {
        let allow = enforcer(FixedMock { allow: true });
        assert!(
            allow
                .require_location(&test_ctx(), Permission::LocationEdit, 42)
                .await
                .is_ok()
        );

        let deny = enforcer(FixedMock { allow: false });
        let err = deny
            .require_location(&test_ctx(), Permission::LocationEdit, 42)
            .await
            .unwrap_err();
        assert!(err.is_forbidden());

        let err = allow
            .require_location(&test_ctx(), Permission::LocationEdit, -1)
            .await
            .unwrap_err();
        assert!(matches!(err, EnforcerError::NotFound(_)));
    }

    #[test]
    fn forbidden_message_names_permission() {
        let err = EnforcerError::Forbidden {
            permission: Permission::LocationCreate,
        };
        assert_eq!(err.to_string(), "permission 'location-create' denied");
    }
}
