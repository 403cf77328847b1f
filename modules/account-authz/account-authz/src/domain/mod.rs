//! Domain layer for account authorization.

pub mod error;
mod hierarchy;
pub mod local_client;
pub mod service;

pub use error::DomainError;
pub use local_client::AccountAuthzLocalClient;
pub use service::Service;
