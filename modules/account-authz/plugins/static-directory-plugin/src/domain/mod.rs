//! Domain layer for the static directory plugin.

mod client;
pub mod service;

pub use service::Service;
