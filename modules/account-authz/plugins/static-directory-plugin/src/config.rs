//! Configuration for the static directory plugin.

use std::path::Path;

use account_authz_sdk::{AccountInfo, LocationInfo};
use anyhow::Context;
use figment::Figment;
use figment::providers::{Format, Yaml};
use riskdesk_security::{AccountId, Permission, Scope, UserId};
use serde::Deserialize;

/// Plugin configuration: the whole directory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticDirectoryPluginConfig {
    pub accounts: Vec<AccountInfo>,
    pub locations: Vec<LocationInfo>,
    /// Named permission bundles that user role grants refer to.
    pub roles: Vec<RoleConfig>,
    pub users: Vec<UserConfig>,
}

impl StaticDirectoryPluginConfig {
    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// Fails if the document does not match the schema.
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        Figment::from(Yaml::string(yaml))
            .extract()
            .context("invalid static directory configuration")
    }

    /// Read and parse a YAML file.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or does not match the schema.
    pub fn from_yaml_file(path: &Path) -> anyhow::Result<Self> {
        anyhow::ensure!(
            path.is_file(),
            "directory file {} does not exist",
            path.display()
        );
        Figment::from(Yaml::file(path))
            .extract()
            .with_context(|| format!("invalid static directory file {}", path.display()))
    }
}

/// A named role and the permissions it implies.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleConfig {
    pub name: String,
    pub permissions: Vec<Permission>,
}

/// A user and everything granted to them.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub id: UserId,
    /// Home account, used when a request names no account.
    pub account_id: AccountId,
    #[serde(default)]
    pub roles: Vec<RoleAssignment>,
    #[serde(default)]
    pub permissions: Vec<PermissionAssignment>,
}

/// A role granted for a set of scopes.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleAssignment {
    pub role: String,
    pub scopes: Vec<Scope>,
}

/// A single permission granted for a set of scopes.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermissionAssignment {
    pub permission: Permission,
    pub scopes: Vec<Scope>,
}
