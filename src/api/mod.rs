//! Client for the secrets server's REST API.
//!
//! [`SecretsApi`] is the seam between commands and the network: commands
//! only ever talk to a `&dyn SecretsApi`, and [`HttpApi`] is the real
//! implementation over HTTP with bearer-token auth.

#[cfg(test)]
pub(crate) mod fake;
pub mod http;
pub mod types;

pub use http::{normalize_server_url, ClientOptions, HttpApi};
pub use types::{
    ClientKey, ClientStatus, CreateEnrollment, CreateSecret, EnrollmentCode, Health,
    SecretDetail,
};

use crate::errors::Result;
use crate::secrets::SecretRecord;

/// Operations the console performs against the server.
pub trait SecretsApi {
    /// `GET /v1/secrets`
    fn list_secrets(&self) -> Result<Vec<SecretRecord>>;

    /// `GET /v1/secrets/{key}`
    fn get_secret(&self, key: &str) -> Result<SecretDetail>;

    /// `POST /v1/secrets`
    fn create_secret(&self, req: &CreateSecret<'_>) -> Result<SecretRecord>;

    /// `DELETE /v1/secrets/{key}`
    fn delete_secret(&self, key: &str) -> Result<()>;

    /// `GET /v1/clients`
    fn list_clients(&self) -> Result<Vec<ClientKey>>;

    /// `GET /v1/enrollments`
    fn list_enrollments(&self) -> Result<Vec<EnrollmentCode>>;

    /// `POST /v1/enrollments`
    fn create_enrollment(&self, req: &CreateEnrollment<'_>) -> Result<EnrollmentCode>;

    /// `POST /v1/clients/{id}/disable`
    fn disable_client(&self, id: &str) -> Result<ClientKey>;

    /// `GET /v1/clients/{id}/permissions`: keys the client may decrypt.
    fn get_permissions(&self, id: &str) -> Result<Vec<String>>;

    /// `PUT /v1/clients/{id}/permissions`: replaces the whole set.
    fn set_permissions(&self, id: &str, keys: &[String]) -> Result<Vec<String>>;

    /// `GET /v1/health` (unauthenticated).
    fn health(&self) -> Result<Health>;
}
