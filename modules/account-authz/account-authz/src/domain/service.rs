//! Domain service for account authorization.

use std::collections::BTreeSet;
use std::sync::Arc;

use account_authz_sdk::{
    AccountDirectoryPluginClient, AccountInfo, AccountSelector, CheckOptions, LocationInfo,
};
use riskdesk_security::{
    AccountId, Grant, LocationId, Permission, ScopeSet, SecurityContext,
};
use tracing::debug;

use super::error::DomainError;
use super::hierarchy::Hierarchy;
use crate::config::AccountAuthzConfig;

/// Account authorization service.
///
/// Every check starts from the principal's grants, read fresh from the
/// directory, and answers with a plain decision. Only missing targets and
/// store failures are errors.
pub struct Service {
    directory: Arc<dyn AccountDirectoryPluginClient>,
    config: AccountAuthzConfig,
}

impl Service {
    #[must_use]
    pub fn new(directory: Arc<dyn AccountDirectoryPluginClient>, config: AccountAuthzConfig) -> Self {
        Self { directory, config }
    }

    #[must_use]
    pub fn config(&self) -> &AccountAuthzConfig {
        &self.config
    }

    fn hierarchy(&self) -> Hierarchy<'_> {
        Hierarchy::new(self.directory.as_ref(), &self.config)
    }

    async fn grants(&self, ctx: &SecurityContext) -> Result<Vec<Grant>, DomainError> {
        Ok(self.directory.get_grants(ctx.subject_id()).await?)
    }

    /// Union of the scopes of every grant that confers `permission`.
    ///
    /// # Errors
    ///
    /// Fails only if the directory cannot be read.
    #[tracing::instrument(skip_all, fields(subject_id = ctx.subject_id(), permission = %permission))]
    pub async fn resolve_scopes(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
    ) -> Result<ScopeSet, DomainError> {
        let scopes: ScopeSet = self
            .grants(ctx)
            .await?
            .iter()
            .filter(|g| g.grants(permission))
            .flat_map(|g| g.scopes().iter().copied())
            .collect();
        debug!(scope_count = scopes.len(), "scopes resolved");
        Ok(scopes)
    }

    /// Whether any grant confers `permission`, in any scope.
    ///
    /// # Errors
    ///
    /// Fails only if the directory cannot be read.
    pub async fn has_permission(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
    ) -> Result<bool, DomainError> {
        self.has_any_permission(ctx, &[permission]).await
    }

    /// Whether any grant confers at least one of `permissions`.
    ///
    /// # Errors
    ///
    /// Fails only if the directory cannot be read.
    pub async fn has_any_permission(
        &self,
        ctx: &SecurityContext,
        permissions: &[Permission],
    ) -> Result<bool, DomainError> {
        let grants = self.grants(ctx).await?;
        Ok(permissions
            .iter()
            .any(|p| grants.iter().any(|g| g.grants(*p))))
    }

    /// Account permission check.
    ///
    /// `include_descendants = true` walks from the target up to its root;
    /// `false` only accepts a grant on the target itself.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if the principal holds account scopes and the
    ///   target does not exist, in either mode
    /// - `MalformedHierarchy` in strict mode
    /// - `DirectoryUnavailable` on store failure
    #[tracing::instrument(
        skip_all,
        fields(
            subject_id = ctx.subject_id(),
            permission = %permission,
            account_id = account_id,
            include_descendants = include_descendants
        )
    )]
    pub async fn has_account_permission(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        account_id: AccountId,
        include_descendants: bool,
        options: &CheckOptions,
    ) -> Result<bool, DomainError> {
        let account_ids = self.resolve_scopes(ctx, permission).await?.account_ids();
        if account_ids.is_empty() {
            return Ok(false);
        }
        let policy = self.config.account_policy(options);

        // The target must exist in both modes, even when its id is scoped.
        let hierarchy = self.hierarchy();
        let target = hierarchy.load(account_id).await?;
        if !include_descendants {
            return Ok(account_ids.contains(&target.id) && policy.admits(target.deactivated));
        }

        Ok(hierarchy
            .find_ancestor_anchor(&target, &account_ids, policy)
            .await?
            .is_some())
    }

    /// Whether `permission` is held on the target or anywhere below it.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if the target does not exist
    /// - `MalformedHierarchy` in strict mode
    /// - `DirectoryUnavailable` on store failure
    #[tracing::instrument(
        skip_all,
        fields(subject_id = ctx.subject_id(), permission = %permission, account_id = account_id)
    )]
    pub async fn has_permission_in_subtree(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        account_id: AccountId,
        options: &CheckOptions,
    ) -> Result<bool, DomainError> {
        let account_ids = self.resolve_scopes(ctx, permission).await?.account_ids();
        if account_ids.is_empty() {
            return Ok(false);
        }

        let hierarchy = self.hierarchy();
        let target = hierarchy.load(account_id).await?;
        Ok(hierarchy
            .find_descendant_anchor(&target, &account_ids, self.config.account_policy(options))
            .await?
            .is_some())
    }

    /// Location permission check: a location scope on the location, or an
    /// account scope on the account that owns it.
    ///
    /// # Errors
    ///
    /// - `LocationNotFound` if the location does not exist
    /// - `DirectoryUnavailable` on store failure
    #[tracing::instrument(
        skip_all,
        fields(subject_id = ctx.subject_id(), permission = %permission, location_id = location_id)
    )]
    pub async fn has_location_permission(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        location_id: LocationId,
        options: &CheckOptions,
    ) -> Result<bool, DomainError> {
        let scopes = self.resolve_scopes(ctx, permission).await?;
        if scopes.is_empty() {
            return Ok(false);
        }

        let location = self
            .directory
            .get_location(location_id)
            .await?
            .ok_or(DomainError::LocationNotFound(location_id))?;
        if !self.config.location_policy(options).admits(location.deactivated) {
            debug!("location deactivated, not an anchor");
            return Ok(false);
        }
        if scopes.location_ids().contains(&location.id) {
            return Ok(true);
        }
        if !scopes.account_ids().contains(&location.account_id) {
            return Ok(false);
        }

        let policy = self.config.account_policy(options);
        if policy.admits(true) {
            return Ok(true);
        }
        Ok(self
            .directory
            .get_account(location.account_id)
            .await?
            .is_some_and(|a| policy.admits(a.deactivated)))
    }

    /// Authorize and load the account a request operates on.
    ///
    /// Order matters and is fixed: no scopes at all short-circuits to
    /// `None`; then the ancestor walk over account scopes; only if that fails,
    /// the existence of a scoped location inside the target account. The
    /// returned account is always the target, never the matched ancestor.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if the target account has to be loaded and does not exist
    /// - `MalformedHierarchy` in strict mode
    /// - `DirectoryUnavailable` on store failure
    #[tracing::instrument(
        skip_all,
        fields(subject_id = ctx.subject_id(), permission = %permission, account_id)
    )]
    pub async fn authorized_account(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        selector: &AccountSelector,
        options: &CheckOptions,
    ) -> Result<Option<AccountInfo>, DomainError> {
        let account_id = selector.resolve(ctx);
        tracing::Span::current().record("account_id", account_id);

        let scopes = self.resolve_scopes(ctx, permission).await?;
        let hierarchy = self.hierarchy();

        let account_ids = scopes.account_ids();
        let target = if account_ids.is_empty() {
            None
        } else {
            let account = hierarchy.load(account_id).await?;
            if hierarchy
                .find_ancestor_anchor(&account, &account_ids, self.config.account_policy(options))
                .await?
                .is_some()
            {
                return Ok(Some(account));
            }
            Some(account)
        };

        let location_ids: Vec<LocationId> = scopes.location_ids().into_iter().collect();
        if location_ids.is_empty() {
            debug!("no account or location anchor");
            return Ok(None);
        }
        let policy = self.config.location_policy(options);
        let anchored = self
            .directory
            .find_locations(&location_ids, Some(account_id))
            .await?
            .iter()
            .any(|l| l.account_id == account_id && policy.admits(l.deactivated));
        if !anchored {
            debug!("no account or location anchor");
            return Ok(None);
        }

        match target {
            Some(account) => Ok(Some(account)),
            None => hierarchy.load(account_id).await.map(Some),
        }
    }

    /// Directly scoped locations plus every location of a scoped account or
    /// any of its descendants.
    ///
    /// # Errors
    ///
    /// - `MalformedHierarchy` in strict mode
    /// - `DirectoryUnavailable` on store failure
    #[tracing::instrument(skip_all, fields(subject_id = ctx.subject_id(), permission = %permission))]
    pub async fn authorized_location_ids(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        options: &CheckOptions,
    ) -> Result<BTreeSet<LocationId>, DomainError> {
        let scopes = self.resolve_scopes(ctx, permission).await?;
        let location_policy = self.config.location_policy(options);
        let mut result = BTreeSet::new();

        let location_ids: Vec<LocationId> = scopes.location_ids().into_iter().collect();
        if !location_ids.is_empty() {
            result.extend(
                self.directory
                    .find_locations(&location_ids, None)
                    .await?
                    .into_iter()
                    .filter(|l| location_policy.admits(l.deactivated))
                    .map(|l| l.id),
            );
        }

        let account_policy = self.config.account_policy(options);
        let mut roots = Vec::new();
        for id in scopes.account_ids() {
            match self.directory.get_account(id).await? {
                Some(account) if account_policy.admits(account.deactivated) => roots.push(id),
                Some(_) => debug!(account_id = id, "deactivated account scope skipped"),
                None => debug!(account_id = id, "stale account scope skipped"),
            }
        }
        if !roots.is_empty() {
            let accounts: Vec<AccountId> = self
                .hierarchy()
                .subtree_ids(&roots)
                .await?
                .into_iter()
                .collect();
            result.extend(
                self.directory
                    .get_locations_for_accounts(&accounts)
                    .await?
                    .into_iter()
                    .filter(|l| location_policy.admits(l.deactivated))
                    .map(|l| l.id),
            );
        }

        debug!(location_count = result.len(), "authorized locations resolved");
        Ok(result)
    }

    /// Locations of one account visible under `permission`.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if the account does not exist
    /// - `MalformedHierarchy` in strict mode
    /// - `DirectoryUnavailable` on store failure
    #[tracing::instrument(
        skip_all,
        fields(subject_id = ctx.subject_id(), permission = %permission, account_id = account_id)
    )]
    pub async fn visible_locations(
        &self,
        ctx: &SecurityContext,
        permission: Permission,
        account_id: AccountId,
        options: &CheckOptions,
    ) -> Result<Vec<LocationInfo>, DomainError> {
        let scopes = self.resolve_scopes(ctx, permission).await?;
        let hierarchy = self.hierarchy();
        let account = hierarchy.load(account_id).await?;
        let location_policy = self.config.location_policy(options);

        let account_ids = scopes.account_ids();
        let whole_account = !account_ids.is_empty()
            && hierarchy
                .find_ancestor_anchor(&account, &account_ids, self.config.account_policy(options))
                .await?
                .is_some();

        let locations = if whole_account {
            self.directory
                .get_locations_for_accounts(&[account_id])
                .await?
        } else {
            let location_ids: Vec<LocationId> = scopes.location_ids().into_iter().collect();
            if location_ids.is_empty() {
                return Ok(Vec::new());
            }
            self.directory
                .find_locations(&location_ids, Some(account_id))
                .await?
        };

        Ok(locations
            .into_iter()
            .filter(|l| l.account_id == account_id && location_policy.admits(l.deactivated))
            .collect())
    }
}
