//! Role and permission grants.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::access_scope::Scope;
use crate::permission::Permission;

/// A role assigned to a principal for one or more scopes.
///
/// The role's permission bundle is carried inline so a grant can answer
/// "does this apply to permission X" without another lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    /// Role name, e.g. `"account-admin"`.
    pub role: String,
    /// Every permission the role implies.
    pub permissions: BTreeSet<Permission>,
    pub scopes: Vec<Scope>,
}

/// A single permission assigned directly to a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub permission: Permission,
    pub scopes: Vec<Scope>,
}

/// Anything that gives a principal a permission somewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Grant {
    Role(RoleGrant),
    Direct(PermissionGrant),
}

impl Grant {
    #[must_use]
    pub fn role(
        role: impl Into<String>,
        permissions: impl IntoIterator<Item = Permission>,
        scopes: Vec<Scope>,
    ) -> Self {
        Self::Role(RoleGrant {
            role: role.into(),
            permissions: permissions.into_iter().collect(),
            scopes,
        })
    }

    #[must_use]
    pub fn direct(permission: Permission, scopes: Vec<Scope>) -> Self {
        Self::Direct(PermissionGrant { permission, scopes })
    }

    /// Whether this grant confers `permission`.
    #[must_use]
    pub fn grants(&self, permission: Permission) -> bool {
        match self {
            Self::Role(g) => g.permissions.contains(&permission),
            Self::Direct(g) => g.permission == permission,
        }
    }

    /// The scopes this grant applies to.
    #[must_use]
    pub fn scopes(&self) -> &[Scope] {
        match self {
            Self::Role(g) => &g.scopes,
            Self::Direct(g) => &g.scopes,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn role_grant_covers_bundled_permissions_only() {
        let g = Grant::role(
            "account-admin",
            [Permission::ManageUsers, Permission::LocationEdit],
            vec![Scope::account(7)],
        );

        assert!(g.grants(Permission::ManageUsers));
        assert!(g.grants(Permission::LocationEdit));
        assert!(!g.grants(Permission::ManageAccounts));
        assert_eq!(g.scopes(), &[Scope::account(7)]);
    }

    #[test]
    fn direct_grant_covers_its_permission_only() {
        let g = Grant::direct(Permission::Claims, vec![Scope::location(42)]);

        assert!(g.grants(Permission::Claims));
        assert!(!g.grants(Permission::Certificates));
        assert_eq!(g.scopes(), &[Scope::location(42)]);
    }

    #[test]
    fn tagged_serialization() {
        let g = Grant::direct(Permission::Forum, vec![Scope::account(1)]);
        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(json["kind"], "direct");
        assert_eq!(json["permission"], "forum");

        let back: Grant = serde_json::from_value(json).unwrap();
        assert_eq!(back, g);
    }
}
