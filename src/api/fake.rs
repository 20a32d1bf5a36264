//! In-memory `SecretsApi` for command tests.

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::types::{
    ClientKey, ClientStatus, CreateEnrollment, CreateSecret, EnrollmentCode, Health,
    SecretDetail,
};
use super::SecretsApi;
use crate::errors::{ConsoleError, Result};
use crate::secrets::SecretRecord;

pub(crate) const NOW: i64 = 1_700_000_000;

#[derive(Default)]
pub(crate) struct FakeApi {
    pub secrets: RefCell<BTreeMap<String, (SecretRecord, String)>>,
    pub clients: RefCell<Vec<ClientKey>>,
    pub enrollments: RefCell<Vec<EnrollmentCode>>,
    pub permissions: RefCell<BTreeMap<String, Vec<String>>>,
    pub reject_token: bool,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(self, key: &str, value: &str, expires_at: Option<i64>) -> Self {
        self.secrets.borrow_mut().insert(
            key.to_string(),
            (
                SecretRecord {
                    key: key.to_string(),
                    version: 1,
                    created_at: NOW - 86_400,
                    updated_at: NOW - 3_600,
                    expires_at,
                },
                value.to_string(),
            ),
        );
        self
    }

    pub fn with_client(self, id: &str, status: ClientStatus) -> Self {
        self.clients.borrow_mut().push(ClientKey {
            id: id.to_string(),
            name: format!("{id}-device"),
            description: None,
            status,
            public_key: None,
            created_at: NOW,
            last_seen_at: None,
        });
        self
    }

    fn check_token(&self) -> Result<()> {
        if self.reject_token {
            Err(ConsoleError::Unauthorized("invalid token".into()))
        } else {
            Ok(())
        }
    }
}

impl SecretsApi for FakeApi {
    fn list_secrets(&self) -> Result<Vec<SecretRecord>> {
        self.check_token()?;
        Ok(self
            .secrets
            .borrow()
            .values()
            .map(|(r, _)| r.clone())
            .collect())
    }

    fn get_secret(&self, key: &str) -> Result<SecretDetail> {
        self.check_token()?;
        self.secrets
            .borrow()
            .get(key)
            .map(|(record, value)| SecretDetail {
                record: record.clone(),
                value: value.clone(),
            })
            .ok_or_else(|| ConsoleError::NotFound(format!("Secret '{key}'")))
    }

    fn create_secret(&self, req: &CreateSecret<'_>) -> Result<SecretRecord> {
        self.check_token()?;
        let mut secrets = self.secrets.borrow_mut();
        let version = secrets.get(req.key).map_or(1, |(r, _)| r.version + 1);
        let ttl = req.ttl_seconds.map(|t| i64::try_from(t).unwrap_or(i64::MAX));
        let record = SecretRecord {
            key: req.key.to_string(),
            version,
            created_at: NOW,
            updated_at: NOW,
            expires_at: ttl.map(|t| NOW + t),
        };
        secrets.insert(req.key.to_string(), (record.clone(), req.value.to_string()));
        Ok(record)
    }

    fn delete_secret(&self, key: &str) -> Result<()> {
        self.check_token()?;
        self.secrets
            .borrow_mut()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| ConsoleError::NotFound(format!("Secret '{key}'")))
    }

    fn list_clients(&self) -> Result<Vec<ClientKey>> {
        self.check_token()?;
        Ok(self.clients.borrow().clone())
    }

    fn list_enrollments(&self) -> Result<Vec<EnrollmentCode>> {
        self.check_token()?;
        Ok(self.enrollments.borrow().clone())
    }

    fn create_enrollment(&self, req: &CreateEnrollment<'_>) -> Result<EnrollmentCode> {
        self.check_token()?;
        let mut enrollments = self.enrollments.borrow_mut();
        let code = EnrollmentCode {
            id: format!("enr-{}", enrollments.len() + 1),
            name: req.name.to_string(),
            description: req.description.map(str::to_string),
            status: ClientStatus::Active,
            code: Some("ABCD-EFGH".into()),
            created_at: NOW,
            expires_at: Some(NOW + 86_400),
        };
        enrollments.push(code.clone());
        Ok(code)
    }

    fn disable_client(&self, id: &str) -> Result<ClientKey> {
        self.check_token()?;
        let mut clients = self.clients.borrow_mut();
        let client = clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ConsoleError::NotFound(format!("Client '{id}'")))?;
        client.status = ClientStatus::Disabled;
        Ok(client.clone())
    }

    fn get_permissions(&self, id: &str) -> Result<Vec<String>> {
        self.check_token()?;
        Ok(self
            .permissions
            .borrow()
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    fn set_permissions(&self, id: &str, keys: &[String]) -> Result<Vec<String>> {
        self.check_token()?;
        self.permissions
            .borrow_mut()
            .insert(id.to_string(), keys.to_vec());
        Ok(keys.to_vec())
    }

    fn health(&self) -> Result<Health> {
        Ok(Health {
            status: "ok".into(),
            version: Some("1.4.2".into()),
            uptime_seconds: Some(90_061),
        })
    }
}
