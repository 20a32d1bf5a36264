//! Search filtering over display records.

use super::record::SecretDisplayRecord;

/// Keep records whose key contains `query`, ignoring case.
///
/// A blank or whitespace-only query keeps everything. Otherwise the query is
/// matched as given, surrounding spaces included. Only the key is matched;
/// status, dates, and version never participate. Order is preserved.
pub fn filter(records: &[SecretDisplayRecord], query: &str) -> Vec<SecretDisplayRecord> {
    if query.trim().is_empty() {
        return records.to_vec();
    }

    let needle = query.to_lowercase();

    records
        .iter()
        .filter(|r| r.key.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
