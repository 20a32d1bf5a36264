//! One module per subcommand. Each exposes `execute` (CLI wiring) and, where
//! there is logic worth testing, a `run` that works against `&dyn SecretsApi`.

pub mod audit_cmd;
pub mod auth;
pub mod clients;
pub mod completions;
pub mod config_cmd;
pub mod create;
pub mod delete;
pub mod get;
pub mod health;
pub mod list;
pub mod stats;
pub mod version;
pub mod watch;
