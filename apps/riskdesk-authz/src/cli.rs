use std::path::PathBuf;

use account_authz_sdk::{AnchorPolicy, CheckOptions};
use clap::{Args, Parser, Subcommand, ValueEnum};
use riskdesk_security::{AccountId, LocationId, Permission, UserId};

#[derive(Parser, Debug)]
#[command(
    name = "riskdesk-authz",
    version,
    about = "Answer account and location authorization questions against a directory file"
)]
pub struct Cli {
    /// Directory YAML (accounts, locations, roles, users).
    #[arg(long, short = 'd')]
    pub directory: PathBuf,

    /// Authorization config YAML. `RISKDESK_AUTHZ_*` variables override it.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// User to evaluate.
    #[arg(long, short = 'u')]
    pub user: UserId,

    #[command(flatten)]
    pub policy: PolicyArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Default)]
pub struct PolicyArgs {
    /// Whether deactivated accounts anchor grants (default: from config).
    #[arg(long, value_enum, global = true)]
    pub deactivated_accounts: Option<PolicyArg>,

    /// Whether deactivated locations anchor grants (default: from config).
    #[arg(long, value_enum, global = true)]
    pub deactivated_locations: Option<PolicyArg>,
}

impl PolicyArgs {
    #[must_use]
    pub fn to_options(&self) -> CheckOptions {
        CheckOptions {
            deactivated_accounts: self.deactivated_accounts.map(Into::into),
            deactivated_locations: self.deactivated_locations.map(Into::into),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyArg {
    Include,
    Exclude,
}

impl From<PolicyArg> for AnchorPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Include => Self::Include,
            PolicyArg::Exclude => Self::Exclude,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the scopes the user holds a permission in.
    Scopes {
        #[arg(long, short = 'p')]
        permission: Permission,
    },

    /// Check a permission on an account or any of its ancestors.
    Account {
        #[arg(long, short = 'p')]
        permission: Permission,
        #[arg(long)]
        account_id: AccountId,
        /// Only accept a grant on the account itself.
        #[arg(long)]
        exact: bool,
    },

    /// Check a permission on an account or any of its descendants.
    Subtree {
        #[arg(long, short = 'p')]
        permission: Permission,
        #[arg(long)]
        account_id: AccountId,
    },

    /// Check a permission on a location.
    Location {
        #[arg(long, short = 'p')]
        permission: Permission,
        #[arg(long)]
        location_id: LocationId,
    },

    /// Authorize and load the account a request would operate on.
    Authorize {
        #[arg(long, short = 'p')]
        permission: Permission,
        /// Explicit target account.
        #[arg(long, conflicts_with = "query")]
        account_id: Option<AccountId>,
        /// Raw request query string, e.g. `accountId=7&page=2`.
        #[arg(long)]
        query: Option<String>,
    },

    /// List authorized locations, optionally within one account.
    Locations {
        #[arg(long, short = 'p')]
        permission: Permission,
        #[arg(long)]
        account_id: Option<AccountId>,
    },
}
