//! Update decision: reject, fail, skip as up to date, or install.

use crate::checksum::ChecksumMarker;
use crate::metadata;
use crate::pipeline::PipelineError;

/// Outcome of checking a staged list before any persistence happens.
#[derive(Debug)]
pub enum Verdict {
    /// No checksum and no license while a license is required. Not an error.
    Rejected,
    /// Declared checksum does not match the content.
    Failed(PipelineError),
    /// Content checksum equals the one recorded for the installed list.
    AlreadyUpToDate { title: Option<String> },
    /// Content is valid and new; compile and persist it.
    NeedsUpdate,
}

/// Rules are checked in order; the first that applies wins.
///
/// `external_checksum` is the checksum recorded at the last successful
/// install of this list, or None if it was never installed.
pub fn decide(
    text: &str,
    marker: &ChecksumMarker,
    external_checksum: Option<&str>,
    require_license: bool,
) -> Verdict {
    if marker.declared.is_none() && require_license && !metadata::has_license(text) {
        return Verdict::Rejected;
    }

    if let Some(declared) = &marker.declared {
        if !marker.validate() {
            return Verdict::Failed(PipelineError::IntegrityFailure {
                declared: declared.clone(),
                computed: marker.computed.clone(),
            });
        }
    }

    if external_checksum.is_some_and(|c| marker.validate_against(c)) {
        return Verdict::AlreadyUpToDate {
            title: metadata::extract_title(text),
        };
    }

    Verdict::NeedsUpdate
}
