//! Enforcement helpers for request handlers.
//!
//! - [`AccountEnforcer`] - turns authorization decisions into `Result`s a
//!   handler can `?` on
//! - [`EnforcerError`] - `Forbidden` (HTTP 403), `NotFound` (HTTP 404) or a
//!   failed evaluation

pub mod enforcer;

pub use enforcer::{AccountEnforcer, EnforcerError};
