use serde::{Deserialize, Serialize};

use crate::{AccountId, UserId};

/// `SecurityContext` identifies the principal a request acts for.
///
/// Built by the authentication layer and passed explicitly into every
/// authorization call. It carries identity only: grants and scopes are read
/// from the directory on each check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityContext {
    /// The authenticated user.
    subject_id: UserId,
    /// Subject type classification (e.g., "user", "impersonated").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subject_type: Option<String>,
    /// The account the user belongs to. Used as the default tenant context
    /// when a request names no account.
    subject_account_id: AccountId,
}

impl SecurityContext {
    #[must_use]
    pub fn builder() -> SecurityContextBuilder {
        SecurityContextBuilder::default()
    }

    #[must_use]
    pub fn subject_id(&self) -> UserId {
        self.subject_id
    }

    #[must_use]
    pub fn subject_type(&self) -> Option<&str> {
        self.subject_type.as_deref()
    }

    /// The principal's home account.
    #[must_use]
    pub fn subject_account_id(&self) -> AccountId {
        self.subject_account_id
    }
}

#[derive(Default)]
pub struct SecurityContextBuilder {
    subject_id: Option<UserId>,
    subject_type: Option<String>,
    subject_account_id: Option<AccountId>,
}

impl SecurityContextBuilder {
    #[must_use]
    pub fn subject_id(mut self, subject_id: UserId) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    #[must_use]
    pub fn subject_type(mut self, subject_type: &str) -> Self {
        self.subject_type = Some(subject_type.to_owned());
        self
    }

    #[must_use]
    pub fn subject_account_id(mut self, account_id: AccountId) -> Self {
        self.subject_account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn build(self) -> SecurityContext {
        SecurityContext {
            subject_id: self.subject_id.unwrap_or_default(),
            subject_type: self.subject_type,
            subject_account_id: self.subject_account_id.unwrap_or_default(),
        }
    }
}
