//! Types stored in the record database.

use std::time::Duration;

use crate::pipeline::Decision;

/// Persisted state of one installed filter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRecord {
    pub id: String,
    /// Checksum of the last successfully installed content.
    pub last_checksum: String,
    pub title: Option<String>,
    /// Rules in the last compiled artifact.
    pub filters_count: u64,
    pub homepage: Option<String>,
    /// Update interval declared by the list (`! Expires:`).
    pub expires: Option<Duration>,
    /// Unix seconds of the last successful install. Set by the database on upsert.
    pub updated_at: i64,
}

impl UpdateRecord {
    /// Record for an `Updated` decision; None for every other outcome.
    pub fn from_decision(id: &str, decision: &Decision) -> Option<Self> {
        match decision {
            Decision::Updated {
                metadata,
                checksum,
                filters_count,
                ..
            } => Some(UpdateRecord {
                id: id.to_string(),
                last_checksum: checksum.clone(),
                title: metadata.title.clone(),
                filters_count: *filters_count as u64,
                homepage: metadata.homepage.clone(),
                expires: metadata.expires,
                updated_at: 0,
            }),
            _ => None,
        }
    }

    /// True once `expires` has passed since `updated_at`. Lists without an
    /// `Expires` header are always due.
    pub fn is_due(&self, now: i64) -> bool {
        match self.expires {
            Some(expires) => {
                let secs = i64::try_from(expires.as_secs()).unwrap_or(i64::MAX);
                now.saturating_sub(self.updated_at) >= secs
            }
            None => true,
        }
    }
}
