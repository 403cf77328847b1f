//! Service implementation for the static directory plugin.

use std::collections::{BTreeMap, HashMap};

use account_authz_sdk::{AccountInfo, LocationInfo};
use riskdesk_security::{AccountId, Grant, LocationId, Permission, UserId};
use tracing::debug;

use crate::config::StaticDirectoryPluginConfig;

/// In-memory directory built once from configuration.
///
/// Maps are ordered so that child and location listings come back sorted
/// by id.
#[derive(Debug, Default)]
pub struct Service {
    pub(super) accounts: BTreeMap<AccountId, AccountInfo>,
    pub(super) locations: BTreeMap<LocationId, LocationInfo>,
    pub(super) grants: HashMap<UserId, Vec<Grant>>,
    home_accounts: HashMap<UserId, AccountId>,
}

impl Service {
    /// Build the directory from plugin configuration.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate account, location or user id, or on a role grant that
    /// names a role the configuration does not define.
    pub fn from_config(cfg: &StaticDirectoryPluginConfig) -> anyhow::Result<Self> {
        let mut accounts = BTreeMap::new();
        for account in &cfg.accounts {
            anyhow::ensure!(
                accounts.insert(account.id, account.clone()).is_none(),
                "duplicate account id {}",
                account.id
            );
        }

        let mut locations = BTreeMap::new();
        for location in &cfg.locations {
            anyhow::ensure!(
                locations.insert(location.id, location.clone()).is_none(),
                "duplicate location id {}",
                location.id
            );
        }

        let roles: HashMap<&str, &[Permission]> = cfg
            .roles
            .iter()
            .map(|r| (r.name.as_str(), r.permissions.as_slice()))
            .collect();

        let mut grants: HashMap<UserId, Vec<Grant>> = HashMap::new();
        let mut home_accounts = HashMap::new();
        for user in &cfg.users {
            anyhow::ensure!(
                home_accounts.insert(user.id, user.account_id).is_none(),
                "duplicate user id {}",
                user.id
            );
            let user_grants = grants.entry(user.id).or_default();
            for assignment in &user.roles {
                let Some(permissions) = roles.get(assignment.role.as_str()) else {
                    anyhow::bail!(
                        "user {} is granted undefined role '{}'",
                        user.id,
                        assignment.role
                    );
                };
                user_grants.push(Grant::role(
                    assignment.role.clone(),
                    permissions.iter().copied(),
                    assignment.scopes.clone(),
                ));
            }
            user_grants.extend(
                user.permissions
                    .iter()
                    .map(|p| Grant::direct(p.permission, p.scopes.clone())),
            );
        }

        debug!(
            accounts = accounts.len(),
            locations = locations.len(),
            users = grants.len(),
            "static directory loaded"
        );

        Ok(Self {
            accounts,
            locations,
            grants,
            home_accounts,
        })
    }

    /// The configured home account of a user.
    #[must_use]
    pub fn home_account(&self, user_id: UserId) -> Option<AccountId> {
        self.home_accounts.get(&user_id).copied()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn builds_role_grants_from_definitions() {
        let cfg = StaticDirectoryPluginConfig::from_yaml_str(
            r"
roles:
  - name: claims-clerk
    permissions: [claims, certificates]
users:
  - id: 5
    account_id: 3
    roles:
      - role: claims-clerk
        scopes: [{ scope_type: account, scope_id: 3 }]
",
        )
        .unwrap();

        let service = Service::from_config(&cfg).unwrap();
        let grants = &service.grants[&5];
        assert_eq!(grants.len(), 1);
        assert!(grants[0].grants(Permission::Certificates));
        assert!(!grants[0].grants(Permission::Contracts));
        assert_eq!(service.home_account(5), Some(3));
        assert_eq!(service.home_account(6), None);
    }

    #[test]
    fn undefined_role_is_rejected() {
        let cfg = StaticDirectoryPluginConfig::from_yaml_str(
            r"
users:
  - id: 5
    account_id: 3
    roles:
      - role: ghost
        scopes: []
",
        )
        .unwrap();

        let err = Service::from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("undefined role 'ghost'"));
    }

    #[test]
    fn duplicate_user_is_rejected() {
        let cfg = StaticDirectoryPluginConfig::from_yaml_str(
            r"
users:
  - { id: 4, account_id: 1 }
  - { id: 4, account_id: 2 }
",
        )
        .unwrap();

        let err = Service::from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("duplicate user id 4"));
    }

    #[test]
    fn duplicate_account_is_rejected() {
        let cfg = StaticDirectoryPluginConfig::from_yaml_str(
            r"
accounts:
  - { id: 1, name: a }
  - { id: 1, name: b }
",
        )
        .unwrap();

        let err = Service::from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("duplicate account id 1"));
    }
}
