//! Domain errors for account authorization.

use account_authz_sdk::AccountAuthzError;
use riskdesk_security::{AccountId, LocationId};

/// Internal domain errors.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    #[error("location {0} not found")]
    LocationNotFound(LocationId),

    #[error("malformed account hierarchy at account {account_id}: {reason}")]
    MalformedHierarchy {
        account_id: AccountId,
        reason: &'static str,
    },

    #[error("directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AccountAuthzError> for DomainError {
    fn from(e: AccountAuthzError) -> Self {
        match e {
            AccountAuthzError::AccountNotFound { account_id } => Self::AccountNotFound(account_id),
            AccountAuthzError::LocationNotFound { location_id } => {
                Self::LocationNotFound(location_id)
            }
            AccountAuthzError::HierarchyCycle { account_id } => Self::MalformedHierarchy {
                account_id,
                reason: "reported by directory",
            },
            AccountAuthzError::DirectoryUnavailable(msg) => Self::DirectoryUnavailable(msg),
            AccountAuthzError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<DomainError> for AccountAuthzError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::AccountNotFound(account_id) => Self::AccountNotFound { account_id },
            DomainError::LocationNotFound(location_id) => Self::LocationNotFound { location_id },
            DomainError::MalformedHierarchy { account_id, .. } => {
                Self::HierarchyCycle { account_id }
            }
            DomainError::DirectoryUnavailable(msg) => Self::DirectoryUnavailable(msg),
            DomainError::Internal(msg) => Self::Internal(msg),
        }
    }
}
