//! Error types for the account authorization API.

use riskdesk_security::{AccountId, LocationId};
use thiserror::Error;

/// Errors that can occur when using the account authorization API.
///
/// These represent lookup and infrastructure failures only. Access denial is
/// expressed as `false` / `None` from the check itself, not as an error
/// variant.
#[derive(Debug, Error)]
pub enum AccountAuthzError {
    /// The target account does not exist.
    #[error("account {account_id} not found")]
    AccountNotFound { account_id: AccountId },

    /// The target location does not exist.
    #[error("location {location_id} not found")]
    LocationNotFound { location_id: LocationId },

    /// The account hierarchy above or below the given account loops back on
    /// itself or exceeds the configured depth. Only raised in strict mode.
    #[error("malformed account hierarchy at account {account_id}")]
    HierarchyCycle { account_id: AccountId },

    /// The directory backing store could not be read.
    #[error("directory unavailable: {0}")]
    DirectoryUnavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AccountAuthzError {
    /// Whether this error means the addressed record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound { .. } | Self::LocationNotFound { .. }
        )
    }
}
