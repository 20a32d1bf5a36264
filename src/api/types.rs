//! Request and response bodies for the secrets server API.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::secrets::SecretRecord;

/// A secret including its decrypted value (`GET /v1/secrets/{key}`).
#[derive(Debug, Clone, Deserialize)]
pub struct SecretDetail {
    #[serde(flatten)]
    pub record: SecretRecord,
    pub value: String,
}

/// Body of `POST /v1/secrets`.
#[derive(Debug, Serialize)]
pub struct CreateSecret<'a> {
    pub key: &'a str,
    pub value: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_seconds: Option<u64>,
}

/// Lifecycle of a client key or enrollment code, displayed as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientStatus {
    #[serde(alias = "active", alias = "ACTIVE")]
    Active,
    #[serde(alias = "retired", alias = "RETIRED")]
    Retired,
    #[serde(alias = "disabled", alias = "DISABLED")]
    Disabled,
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClientStatus::Active => "Active",
            ClientStatus::Retired => "Retired",
            ClientStatus::Disabled => "Disabled",
        })
    }
}

/// A device authorized to decrypt specific secrets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientKey {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ClientStatus,
    /// Base64-encoded public key.
    #[serde(default)]
    pub public_key: Option<String>,
    pub created_at: i64,
    #[serde(default)]
    pub last_seen_at: Option<i64>,
}

/// A one-time code a new client uses to enroll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentCode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ClientStatus,
    /// Only returned once, when the code is created.
    #[serde(default)]
    pub code: Option<String>,
    pub created_at: i64,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

/// Body of `POST /v1/enrollments`.
#[derive(Debug, Serialize)]
pub struct CreateEnrollment<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

/// `GET /v1/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub uptime_seconds: Option<u64>,
}

impl Health {
    pub fn is_ok(&self) -> bool {
        matches!(self.status.to_lowercase().as_str(), "ok" | "healthy" | "up")
    }
}

// --- Envelopes ---

#[derive(Deserialize)]
pub(crate) struct SecretList {
    pub secrets: Vec<SecretRecord>,
}

#[derive(Deserialize)]
pub(crate) struct ClientList {
    pub clients: Vec<ClientKey>,
}

#[derive(Deserialize)]
pub(crate) struct EnrollmentList {
    pub enrollments: Vec<EnrollmentCode>,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct Permissions {
    pub secrets: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_list_parses_optional_expiry() {
        let json = r#"{"secrets":[
            {"key":"db-pass","version":2,"created_at":10,"updated_at":20},
            {"key":"api-key","version":1,"created_at":10,"updated_at":10,"expires_at":99}
        ]}"#;
        let list: SecretList = serde_json::from_str(json).unwrap();
        assert_eq!(list.secrets.len(), 2);
        assert_eq!(list.secrets[0].expires_at, None);
        assert_eq!(list.secrets[1].expires_at, Some(99));
    }

    #[test]
    fn secret_detail_flattens_record() {
        let json = r#"{"key":"k","version":4,"created_at":1,"updated_at":2,"value":"s3cret"}"#;
        let detail: SecretDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.record.key, "k");
        assert_eq!(detail.record.version, 4);
        assert_eq!(detail.value, "s3cret");
    }

    #[test]
    fn client_status_accepts_any_case() {
        let s: ClientStatus = serde_json::from_str("\"Retired\"").unwrap();
        assert_eq!(s, ClientStatus::Retired);
        let s: ClientStatus = serde_json::from_str("\"disabled\"").unwrap();
        assert_eq!(s, ClientStatus::Disabled);
        assert!(serde_json::from_str::<ClientStatus>("\"gone\"").is_err());
    }

    #[test]
    fn create_secret_omits_missing_ttl() {
        let body = CreateSecret {
            key: "k",
            value: "v",
            ttl_seconds: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"key":"k","value":"v"}"#);
    }

    #[test]
    fn health_status_words() {
        let h = Health {
            status: "OK".into(),
            version: None,
            uptime_seconds: None,
        };
        assert!(h.is_ok());
        let h = Health {
            status: "sealed".into(),
            ..h
        };
        assert!(!h.is_ok());
    }
}
