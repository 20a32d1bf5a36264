pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod secrets;
pub mod store;

#[cfg(feature = "audit-log")]
pub mod audit;

#[cfg(feature = "keyring-store")]
pub mod keyring;
