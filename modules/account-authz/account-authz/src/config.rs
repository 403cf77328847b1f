//! Configuration for the account authorization module.

use std::path::Path;

use account_authz_sdk::{AnchorPolicy, CheckOptions};
use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Environment variable prefix for overrides, e.g. `RISKDESK_AUTHZ_STRICT_HIERARCHY=true`.
pub const ENV_PREFIX: &str = "RISKDESK_AUTHZ_";

/// Configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccountAuthzConfig {
    /// Maximum number of hierarchy levels a walk visits before it gives up.
    pub max_hierarchy_depth: usize,

    /// Fail with `HierarchyCycle` on a malformed hierarchy instead of
    /// treating it as "no match".
    pub strict_hierarchy: bool,

    /// Whether deactivated accounts can anchor account-scoped grants.
    pub deactivated_accounts: AnchorPolicy,

    /// Whether deactivated locations can anchor location-scoped grants.
    pub deactivated_locations: AnchorPolicy,
}

impl Default for AccountAuthzConfig {
    fn default() -> Self {
        Self {
            max_hierarchy_depth: 64,
            strict_hierarchy: false,
            deactivated_accounts: AnchorPolicy::Include,
            deactivated_locations: AnchorPolicy::Exclude,
        }
    }
}

impl AccountAuthzConfig {
    /// Load defaults, then the optional YAML file, then `RISKDESK_AUTHZ_*`
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Fails if `path` does not exist or any layer does not match the schema.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            anyhow::ensure!(
                path.is_file(),
                "authz config file {} does not exist",
                path.display()
            );
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .context("invalid account authz configuration")
    }

    /// Parse a YAML document on top of the defaults. No environment layer.
    ///
    /// # Errors
    ///
    /// Fails if the document does not match the schema.
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Yaml::string(yaml))
            .extract()
            .context("invalid account authz configuration")
    }

    /// Effective account anchor policy for one call.
    #[must_use]
    pub fn account_policy(&self, options: &CheckOptions) -> AnchorPolicy {
        options
            .deactivated_accounts
            .unwrap_or(self.deactivated_accounts)
    }

    /// Effective location anchor policy for one call.
    #[must_use]
    pub fn location_policy(&self, options: &CheckOptions) -> AnchorPolicy {
        options
            .deactivated_locations
            .unwrap_or(self.deactivated_locations)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn yaml_overrides_defaults() {
        let cfg = AccountAuthzConfig::from_yaml_str(
            "max_hierarchy_depth: 8\nstrict_hierarchy: true\ndeactivated_locations: include\n",
        )
        .unwrap();

        assert_eq!(cfg.max_hierarchy_depth, 8);
        assert!(cfg.strict_hierarchy);
        assert_eq!(cfg.deactivated_accounts, AnchorPolicy::Include);
        assert_eq!(cfg.deactivated_locations, AnchorPolicy::Include);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = AccountAuthzConfig::from_yaml_str("max_depth: 3\n").unwrap_err();
        assert!(err.to_string().contains("invalid account authz configuration"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("authz.yaml");
        std::fs::write(&path, "max_hierarchy_depth: 5\n").unwrap();

        let cfg = AccountAuthzConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.max_hierarchy_depth, 5);
    }

    #[test]
    fn load_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AccountAuthzConfig::load(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn call_options_override_configured_policy() {
        let cfg = AccountAuthzConfig::default();
        let options = CheckOptions::new()
            .deactivated_accounts(AnchorPolicy::Exclude)
            .deactivated_locations(AnchorPolicy::Include);

        assert_eq!(cfg.account_policy(&CheckOptions::default()), AnchorPolicy::Include);
        assert_eq!(cfg.account_policy(&options), AnchorPolicy::Exclude);
        assert_eq!(cfg.location_policy(&CheckOptions::default()), AnchorPolicy::Exclude);
        assert_eq!(cfg.location_policy(&options), AnchorPolicy::Include);
    }
}
