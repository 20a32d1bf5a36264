//! `sealdesk clients`: enrolled devices, enrollment codes, and the secrets
//! each client is allowed to decrypt.

use std::collections::BTreeSet;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use console::style;
use sha2::{Digest, Sha256};

use crate::api::{ClientKey, ClientStatus, CreateEnrollment, EnrollmentCode, SecretsApi};
use crate::cli::output;
use crate::cli::{confirm, validate_secret_key, Cli, ClientAction, Session};
use crate::errors::{ConsoleError, Result};

/// Bytes of the SHA-256 digest shown in a fingerprint.
const FINGERPRINT_BYTES: usize = 8;

/// Dispatch a `clients` subcommand.
pub fn execute(cli: &Cli, action: &ClientAction) -> Result<()> {
    let session = Session::load(cli)?;
    let api = session.connect(cli)?;

    match action {
        ClientAction::List => execute_list(&api),
        ClientAction::Codes => execute_codes(&api),
        ClientAction::Enroll { name, description } => {
            let code = run_enroll(&api, name, description.as_deref())?;
            session.audit(cli, "enroll", None, Some(name.as_str()));
            print_enrollment(&code);
            Ok(())
        }
        ClientAction::Disable { id, force } => {
            if !*force && !confirm(&format!("Disable client '{id}'? It will lose all access."))? {
                output::info("Cancelled.");
                return Ok(());
            }
            let client = api.disable_client(id)?;
            session.audit(cli, "disable-client", None, Some(id.as_str()));
            output::success(&format!("Client '{}' is now {}", client.name, client.status));
            Ok(())
        }
        ClientAction::Permissions { id, grant, revoke } => {
            let changed = !grant.is_empty() || !revoke.is_empty();
            let keys = run_permissions(&api, id, grant, revoke)?;
            if changed {
                let details = format!("{id}: +{} -{}", grant.len(), revoke.len());
                session.audit(cli, "permissions", None, Some(details.as_str()));
            }
            print_permissions(id, &keys);
            Ok(())
        }
    }
}

fn execute_list(api: &dyn SecretsApi) -> Result<()> {
    let clients = api.list_clients()?;
    if clients.is_empty() {
        output::info("No clients enrolled.");
        output::tip("Run `sealdesk clients enroll --name <NAME>` to create an enrollment code.");
        return Ok(());
    }

    println!("{}", output::clients_table(&clients));
    print_counts(&clients);
    Ok(())
}

fn execute_codes(api: &dyn SecretsApi) -> Result<()> {
    let codes = api.list_enrollments()?;
    if codes.is_empty() {
        output::info("No enrollment codes.");
        return Ok(());
    }

    println!("{}", output::enrollments_table(&codes));
    Ok(())
}

/// Create an enrollment code.
pub fn run_enroll(
    api: &dyn SecretsApi,
    name: &str,
    description: Option<&str>,
) -> Result<EnrollmentCode> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ConsoleError::CommandFailed("client name cannot be empty".into()));
    }

    api.create_enrollment(&CreateEnrollment { name, description })
}

/// Apply grants and revocations to a client's permission set and return the
/// resulting keys, sorted. With nothing to change only reads the set.
pub fn run_permissions(
    api: &dyn SecretsApi,
    id: &str,
    grant: &[String],
    revoke: &[String],
) -> Result<Vec<String>> {
    for key in grant.iter().chain(revoke) {
        validate_secret_key(key)?;
    }

    let current = api.get_permissions(id)?;
    if grant.is_empty() && revoke.is_empty() {
        let mut keys = current;
        keys.sort();
        keys.dedup();
        return Ok(keys);
    }

    let mut set: BTreeSet<String> = current.into_iter().collect();
    set.extend(grant.iter().cloned());
    for key in revoke {
        set.remove(key);
    }

    let keys: Vec<String> = set.into_iter().collect();
    tracing::debug!(client = id, count = keys.len(), "updating permissions");
    let mut saved = api.set_permissions(id, &keys)?;
    saved.sort();
    Ok(saved)
}

/// Short SHA-256 fingerprint of a base64 public key, e.g. `3f:a0:...`.
///
/// `None` when the key is not valid base64.
pub fn fingerprint(public_key: &str) -> Option<String> {
    let raw = STANDARD.decode(public_key.trim()).ok()?;
    let digest = Sha256::digest(&raw);
    let hex: Vec<String> = digest
        .iter()
        .take(FINGERPRINT_BYTES)
        .map(|b| format!("{b:02x}"))
        .collect();
    Some(hex.join(":"))
}

fn print_enrollment(code: &EnrollmentCode) {
    output::success(&format!("Enrollment code created for '{}'", code.name));
    match &code.code {
        Some(c) => {
            println!();
            println!("    {}", style(c).bold().cyan());
            println!();
            output::warning("This code is shown only once. Hand it to the client now.");
        }
        None => output::warning("The server did not return a code."),
    }
}

fn print_permissions(id: &str, keys: &[String]) {
    if keys.is_empty() {
        output::info(&format!("Client '{id}' cannot decrypt any secrets."));
        return;
    }

    output::info(&format!("Client '{id}' can decrypt {} secret(s):", keys.len()));
    for key in keys {
        println!("  {key}");
    }
}

fn print_counts(clients: &[ClientKey]) {
    let active = clients
        .iter()
        .filter(|c| c.status == ClientStatus::Active)
        .count();
    output::tip(&format!("{active} of {} client(s) active", clients.len()));
}
