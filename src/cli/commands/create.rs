//! `sealdesk create`: store a secret (a new key or a new version).

use rand::distr::Alphanumeric;
use rand::Rng;
use zeroize::Zeroizing;

use crate::api::{CreateSecret, SecretsApi};
use crate::cli::output;
use crate::cli::{parse_duration_secs, read_secret_value, validate_secret_key, Cli, Session};
use crate::errors::{ConsoleError, Result};
use crate::secrets::SecretRecord;

/// Longest value `--generate` will produce.
const MAX_GENERATED_LEN: usize = 4_096;

/// Execute the `create` command.
pub fn execute(
    cli: &Cli,
    key: &str,
    value: Option<&str>,
    ttl: Option<&str>,
    generate: Option<usize>,
) -> Result<()> {
    validate_secret_key(key)?;
    let ttl_seconds = ttl.map(parse_ttl).transpose()?;

    // Determine the secret value from one of four sources.
    let secret_value = match generate {
        Some(len) => generate_value(len)?,
        None => read_secret_value(&format!("Enter value for {key}"), value)?,
    };

    let session = Session::load(cli)?;
    let api = session.connect(cli)?;
    let record = run(&api, key, &secret_value, ttl_seconds)?;

    let detail = ttl.map(|t| format!("ttl {t}"));
    session.audit(cli, "create", Some(key), detail.as_deref());

    output::success(&format!("Secret '{key}' stored (version {})", record.version));
    if generate.is_some() {
        output::tip(&format!("Run `sealdesk get {key}` to read the generated value."));
    }

    Ok(())
}

/// Send the create request.
pub fn run(
    api: &dyn SecretsApi,
    key: &str,
    value: &str,
    ttl_seconds: Option<u64>,
) -> Result<SecretRecord> {
    if value.is_empty() {
        return Err(ConsoleError::CommandFailed("secret value cannot be empty".into()));
    }

    api.create_secret(&CreateSecret {
        key,
        value,
        ttl_seconds,
    })
}

/// Parse a `--ttl` value like "30d" into seconds.
pub fn parse_ttl(ttl: &str) -> Result<u64> {
    let secs = parse_duration_secs(ttl)?;
    u64::try_from(secs).map_err(|_| ConsoleError::InvalidDuration(ttl.to_string()))
}

/// Random alphanumeric value of `len` characters.
pub fn generate_value(len: usize) -> Result<Zeroizing<String>> {
    if len == 0 || len > MAX_GENERATED_LEN {
        return Err(ConsoleError::CommandFailed(format!(
            "--generate length must be between 1 and {MAX_GENERATED_LEN}"
        )));
    }

    let value: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect();
    Ok(Zeroizing::new(value))
}
