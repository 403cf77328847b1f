//! Domain models for the account authorization API.

use riskdesk_security::{AccountId, LocationId, SecurityContext};
use serde::{Deserialize, Serialize};

/// An account (tenant) record as seen by authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: AccountId,
    /// Parent account, `None` for a root of the account forest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_account_id: Option<AccountId>,
    pub name: String,
    /// Soft-deleted accounts keep their place in the hierarchy.
    #[serde(default)]
    pub deactivated: bool,
}

/// A location record. Every location belongs to exactly one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub id: LocationId,
    pub account_id: AccountId,
    pub name: String,
    #[serde(default)]
    pub deactivated: bool,
}

/// Whether deactivated (soft-deleted) records can act as authorization anchors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPolicy {
    /// Deactivated records anchor grants exactly like live ones.
    Include,
    /// Deactivated records never satisfy a check (default).
    #[default]
    Exclude,
}

impl AnchorPolicy {
    /// Whether a record with the given deactivation flag may anchor a grant.
    #[must_use]
    pub fn admits(self, deactivated: bool) -> bool {
        match self {
            Self::Include => true,
            Self::Exclude => !deactivated,
        }
    }
}

/// Per-call overrides of the configured anchor policies.
///
/// Fields left as `None` fall back to the module configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deactivated_accounts: Option<AnchorPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deactivated_locations: Option<AnchorPolicy>,
}

impl CheckOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn deactivated_accounts(mut self, policy: AnchorPolicy) -> Self {
        self.deactivated_accounts = Some(policy);
        self
    }

    #[must_use]
    pub fn deactivated_locations(mut self, policy: AnchorPolicy) -> Self {
        self.deactivated_locations = Some(policy);
        self
    }
}

/// How the target account of a request is chosen.
///
/// Resolution order mirrors the controllers: an explicit id wins, then the
/// request's `accountId` query parameter, then the principal's home account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountSelector {
    /// An id supplied by the caller (e.g. the owning account of a loaded record).
    Explicit(AccountId),
    /// The `accountId` query parameter of the inbound request, if it had one.
    Query(Option<AccountId>),
    /// The principal's own account.
    Own,
}

#[derive(Deserialize)]
struct AccountIdQuery {
    #[serde(rename = "accountId")]
    account_id: Option<String>,
}

impl AccountSelector {
    /// Build a selector from a raw URL query string (without the leading `?`).
    ///
    /// A missing, empty, zero or non-numeric `accountId` counts as absent, as
    /// does a query string that cannot be decoded at all.
    #[must_use]
    pub fn from_query(raw: &str) -> Self {
        let account_id = serde_urlencoded::from_str::<AccountIdQuery>(raw)
            .ok()
            .and_then(|q| q.account_id)
            .and_then(|v| v.trim().parse::<AccountId>().ok())
            .filter(|id| *id != 0);
        Self::Query(account_id)
    }

    /// The account id this selector designates for `ctx`.
    #[must_use]
    pub fn resolve(&self, ctx: &SecurityContext) -> AccountId {
        match *self {
            Self::Explicit(id) | Self::Query(Some(id)) => id,
            Self::Query(None) | Self::Own => ctx.subject_account_id(),
        }
    }
}
