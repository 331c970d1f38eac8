//! Classify pipeline errors into retry policy error kinds.

use crate::pipeline::PipelineError;
use crate::retry::policy::ErrorKind;

pub fn classify(e: &PipelineError) -> ErrorKind {
    if e.is_retryable() {
        ErrorKind::Transient
    } else {
        ErrorKind::Permanent
    }
}
