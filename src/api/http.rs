//! Blocking HTTP implementation of [`SecretsApi`] on top of `ureq`.

use std::thread;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use ureq::Agent;
use zeroize::Zeroizing;

use super::types::{
    ClientKey, ClientList, CreateEnrollment, CreateSecret, EnrollmentCode, EnrollmentList,
    Health, Permissions, SecretDetail, SecretList,
};
use super::SecretsApi;
use crate::errors::{ConsoleError, Result};
use crate::secrets::SecretRecord;

/// Base delay before the first retry; doubles on every attempt.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

/// Transport tuning, usually taken from `Settings`.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    /// Retries for idempotent reads. Writes are never retried.
    pub max_retries: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_retries: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// REST client for one server, optionally authenticated.
pub struct HttpApi {
    agent: Agent,
    base_url: String,
    token: Option<Zeroizing<String>>,
    max_retries: u32,
}

impl HttpApi {
    /// Build a client for `server_url`. Requests that need auth fail with
    /// `NotLoggedIn` when `token` is `None`.
    pub fn new(
        server_url: &str,
        token: Option<Zeroizing<String>>,
        options: &ClientOptions,
    ) -> Result<Self> {
        let base_url = normalize_server_url(server_url)?;

        let config = Agent::config_builder()
            .timeout_global(Some(options.timeout))
            .http_status_as_error(false)
            .build();

        Ok(Self {
            agent: Agent::new_with_config(config),
            base_url,
            token,
            max_retries: options.max_retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let body = self.request(Method::Get, path, None::<&()>, what, true)?;
        decode(&body)
    }

    fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: &B,
        what: &str,
    ) -> Result<T> {
        let body = self.request(method, path, Some(payload), what, true)?;
        decode(&body)
    }

    /// Send one request (plus retries for GET) and return the 2xx body text.
    fn request<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&B>,
        what: &str,
        authenticated: bool,
    ) -> Result<String> {
        let url = format!("{}{path}", self.base_url);
        let bearer = if authenticated {
            let token = self.token.as_ref().ok_or(ConsoleError::NotLoggedIn)?;
            Some(Zeroizing::new(format!("Bearer {}", token.as_str())))
        } else {
            None
        };

        let retries = if method == Method::Get {
            self.max_retries
        } else {
            0
        };

        let mut attempt = 0;
        loop {
            tracing::debug!(method = method.as_str(), %url, attempt, "api request");

            match self.send_once(method, &url, payload, bearer.as_deref()) {
                Ok((status, body)) if (200..300).contains(&status) => return Ok(body),
                Ok((status, body)) => {
                    tracing::debug!(status, %url, "api error response");
                    if attempt < retries && is_retryable(status) {
                        backoff(attempt);
                        attempt += 1;
                        continue;
                    }
                    return Err(map_status(status, &body, what));
                }
                Err(e) => {
                    tracing::warn!(%url, error = %e, "api transport failure");
                    if attempt < retries {
                        backoff(attempt);
                        attempt += 1;
                        continue;
                    }
                    return Err(ConsoleError::Network(e.to_string()));
                }
            }
        }
    }

    fn send_once<B: Serialize>(
        &self,
        method: Method,
        url: &str,
        payload: Option<&B>,
        bearer: Option<&String>,
    ) -> std::result::Result<(u16, String), ureq::Error> {
        let user_agent = concat!("sealdesk/", env!("CARGO_PKG_VERSION"));

        let mut response = match method {
            Method::Get | Method::Delete => {
                let mut req = if method == Method::Get {
                    self.agent.get(url)
                } else {
                    self.agent.delete(url)
                };
                req = req.header("User-Agent", user_agent);
                if let Some(b) = bearer {
                    req = req.header("Authorization", b.as_str());
                }
                req.call()?
            }
            Method::Post | Method::Put => {
                let mut req = if method == Method::Post {
                    self.agent.post(url)
                } else {
                    self.agent.put(url)
                };
                req = req.header("User-Agent", user_agent);
                if let Some(b) = bearer {
                    req = req.header("Authorization", b.as_str());
                }
                match payload {
                    Some(p) => req.send_json(p)?,
                    None => req.send_empty()?,
                }
            }
        };

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        Ok((status, body))
    }
}

impl SecretsApi for HttpApi {
    fn list_secrets(&self) -> Result<Vec<SecretRecord>> {
        let list: SecretList = self.get_json("/v1/secrets", "secrets")?;
        Ok(list.secrets)
    }

    fn get_secret(&self, key: &str) -> Result<SecretDetail> {
        let path = format!("/v1/secrets/{}", urlencoding::encode(key));
        self.get_json(&path, &format!("Secret '{key}'"))
    }

    fn create_secret(&self, req: &CreateSecret<'_>) -> Result<SecretRecord> {
        self.send_json(Method::Post, "/v1/secrets", req, "secrets")
    }

    fn delete_secret(&self, key: &str) -> Result<()> {
        let path = format!("/v1/secrets/{}", urlencoding::encode(key));
        self.request(Method::Delete, &path, None::<&()>, &format!("Secret '{key}'"), true)?;
        Ok(())
    }

    fn list_clients(&self) -> Result<Vec<ClientKey>> {
        let list: ClientList = self.get_json("/v1/clients", "clients")?;
        Ok(list.clients)
    }

    fn list_enrollments(&self) -> Result<Vec<EnrollmentCode>> {
        let list: EnrollmentList = self.get_json("/v1/enrollments", "enrollments")?;
        Ok(list.enrollments)
    }

    fn create_enrollment(&self, req: &CreateEnrollment<'_>) -> Result<EnrollmentCode> {
        self.send_json(Method::Post, "/v1/enrollments", req, "enrollments")
    }

    fn disable_client(&self, id: &str) -> Result<ClientKey> {
        let path = format!("/v1/clients/{}/disable", urlencoding::encode(id));
        let body = self.request(Method::Post, &path, None::<&()>, &format!("Client '{id}'"), true)?;
        decode(&body)
    }

    fn get_permissions(&self, id: &str) -> Result<Vec<String>> {
        let path = format!("/v1/clients/{}/permissions", urlencoding::encode(id));
        let perms: Permissions = self.get_json(&path, &format!("Client '{id}'"))?;
        Ok(perms.secrets)
    }

    fn set_permissions(&self, id: &str, keys: &[String]) -> Result<Vec<String>> {
        let path = format!("/v1/clients/{}/permissions", urlencoding::encode(id));
        let body = Permissions {
            secrets: keys.to_vec(),
        };
        let perms: Permissions =
            self.send_json(Method::Put, &path, &body, &format!("Client '{id}'"))?;
        Ok(perms.secrets)
    }

    fn health(&self) -> Result<Health> {
        let body = self.request(Method::Get, "/v1/health", None::<&()>, "health endpoint", false)?;
        decode(&body)
    }
}

/// Validate and canonicalize a server base URL (no trailing slash).
pub fn normalize_server_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty());

    if has_host {
        Ok(trimmed.to_string())
    } else {
        Err(ConsoleError::InvalidServerUrl(raw.to_string()))
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| ConsoleError::SerializationError(format!("unexpected server response: {e}")))
}

/// Map a non-2xx response to an error, preferring the server's own message.
fn map_status(status: u16, body: &str, what: &str) -> ConsoleError {
    let message = error_message(body).unwrap_or_else(|| format!("HTTP {status}"));
    match status {
        401 | 403 => ConsoleError::Unauthorized(message),
        404 => ConsoleError::NotFound(what.to_string()),
        _ => ConsoleError::Api { status, message },
    }
}

/// Pull a message out of `{"error": "..."}`, `{"error": {"message": "..."}}`,
/// or `{"message": "..."}`.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let msg = match value.get("error") {
        Some(serde_json::Value::String(s)) => s.as_str(),
        Some(obj) => obj.get("message")?.as_str()?,
        None => value.get("message")?.as_str()?,
    };
    Some(msg.to_string())
}

fn is_retryable(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

fn backoff(attempt: u32) {
    let delay = RETRY_BASE_DELAY.saturating_mul(2u32.saturating_pow(attempt));
    thread::sleep(delay);
}
