//! Task contract between a scheduler and the update pipeline.

use serde::{Deserialize, Serialize};

use crate::pipeline::Decision;
use crate::store;

/// Input of one update cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTask {
    /// Filter list id; also the store key of the compiled artifact.
    pub id: String,
    /// Store key of the staged raw download.
    pub staged_key: String,
    /// Checksum recorded at the last successful install, if any.
    pub external_checksum: Option<String>,
    /// Reject lists that carry neither a checksum nor a license.
    pub require_license: bool,
}

impl UpdateTask {
    /// Task for `id` with the staged download at its default key.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            staged_key: store::staged_key(&id),
            id,
            external_checksum: None,
            require_license: true,
        }
    }

    pub fn external_checksum(mut self, checksum: Option<String>) -> Self {
        self.external_checksum = checksum;
        self
    }

    pub fn require_license(mut self, require: bool) -> Self {
        self.require_license = require;
        self
    }
}

/// What the scheduler sees of a finished cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum TaskOutcome {
    Success {
        title: Option<String>,
        filters_count: Option<usize>,
        already_up_to_date: bool,
        computed_checksum: Option<String>,
    },
    Failure {
        reason: String,
        retryable: bool,
    },
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success { .. })
    }
}

impl From<&Decision> for TaskOutcome {
    fn from(decision: &Decision) -> Self {
        match decision {
            Decision::Rejected => TaskOutcome::Success {
                title: None,
                filters_count: None,
                already_up_to_date: false,
                computed_checksum: None,
            },
            Decision::AlreadyUpToDate { title } => TaskOutcome::Success {
                title: title.clone(),
                filters_count: None,
                already_up_to_date: true,
                computed_checksum: None,
            },
            Decision::Updated {
                metadata,
                checksum,
                filters_count,
                ..
            } => TaskOutcome::Success {
                title: metadata.title.clone(),
                filters_count: Some(*filters_count),
                already_up_to_date: false,
                computed_checksum: Some(checksum.clone()),
            },
            Decision::Failed(e) => TaskOutcome::Failure {
                reason: e.to_string(),
                retryable: e.is_retryable(),
            },
        }
    }
}

impl From<Decision> for TaskOutcome {
    fn from(decision: Decision) -> Self {
        TaskOutcome::from(&decision)
    }
}
