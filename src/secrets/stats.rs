//! Status counts over display records.

use super::record::{SecretDisplayRecord, SecretStats};
use super::status::SecretStatus;

/// Count records by status in a single pass.
pub fn aggregate(records: &[SecretDisplayRecord]) -> SecretStats {
    records
        .iter()
        .fold(SecretStats::default(), |mut stats, record| {
            stats.total += 1;
            match record.status {
                SecretStatus::Expiring => stats.expiring += 1,
                SecretStatus::Expired => stats.expired += 1,
                SecretStatus::Active => {}
            }
            stats
        })
}
