//! One update cycle for one filter list.
//!
//! `UpdatePipeline::run_update_cycle` loads the staged download, checks its
//! checksum and license markers, and compiles and stores it when it is new.
//! Collaborators are injected; the pipeline keeps no state between cycles.
//! Callers must not run two cycles for the same list id at once.

mod error;

pub use error::PipelineError;

use crate::checksum::{ChecksumMarker, ContentHasher, Sha256Hasher};
use crate::compiler::RuleCompiler;
use crate::decision::{decide, Verdict};
use crate::metadata::FilterListMetadata;
use crate::persist::PersistenceCoordinator;
use crate::store::{self, ByteStore, StoreError};
use crate::task::UpdateTask;

/// Outcome of one update cycle.
#[derive(Debug)]
pub enum Decision {
    /// Untrusted list (no checksum, no license). Reported as success, not retried.
    Rejected,
    AlreadyUpToDate {
        title: Option<String>,
    },
    Updated {
        artifact: Vec<u8>,
        metadata: FilterListMetadata,
        /// Computed checksum of the installed content; pass it back as the
        /// external checksum of the next cycle.
        checksum: String,
        filters_count: usize,
    },
    Failed(PipelineError),
}

impl Decision {
    pub fn title(&self) -> Option<&str> {
        match self {
            Decision::AlreadyUpToDate { title } => title.as_deref(),
            Decision::Updated { metadata, .. } => metadata.title.as_deref(),
            Decision::Rejected | Decision::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Decision::Failed(_))
    }
}

/// Update pipeline over a byte store `S` and a rule compiler `C`.
pub struct UpdatePipeline<S, C, H = Sha256Hasher> {
    store: S,
    compiler: C,
    hasher: H,
    report_compile_errors: bool,
}

impl<S, C> UpdatePipeline<S, C, Sha256Hasher>
where
    S: ByteStore,
    C: RuleCompiler,
{
    pub fn new(store: S, compiler: C) -> Self {
        Self {
            store,
            compiler,
            hasher: Sha256Hasher,
            report_compile_errors: false,
        }
    }
}

impl<S, C, H> UpdatePipeline<S, C, H>
where
    S: ByteStore,
    C: RuleCompiler,
    H: ContentHasher,
{
    /// Replace the content hasher used for computed checksums.
    pub fn with_hasher<H2: ContentHasher>(self, hasher: H2) -> UpdatePipeline<S, C, H2> {
        UpdatePipeline {
            store: self.store,
            compiler: self.compiler,
            hasher,
            report_compile_errors: self.report_compile_errors,
        }
    }

    /// Fail the cycle on the first malformed rule instead of skipping it.
    pub fn report_compile_errors(mut self, report: bool) -> Self {
        self.report_compile_errors = report;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one update cycle. Never panics on bad input; every failure is
    /// returned as `Decision::Failed`.
    pub fn run_update_cycle(&self, task: &UpdateTask) -> Decision {
        let id = task.id.as_str();
        if !store::is_valid_id(id) {
            tracing::error!(id, "invalid list id");
            return Decision::Failed(StoreError::InvalidKey(task.id.clone()).into());
        }

        let raw = match self.store.load_data(&task.staged_key) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(id, "failed to load staged download: {}", e);
                return Decision::Failed(e.into());
            }
        };
        if raw.is_empty() {
            tracing::error!(id, key = %task.staged_key, "staged download is empty");
            return Decision::Failed(PipelineError::EmptyInput {
                key: task.staged_key.clone(),
            });
        }

        let text = String::from_utf8_lossy(&raw);
        let marker = ChecksumMarker::extract_with(&text, &self.hasher);
        tracing::debug!(
            id,
            external = ?task.external_checksum,
            declared = ?marker.declared,
            computed = %marker.computed,
            "checksums"
        );

        match decide(
            &text,
            &marker,
            task.external_checksum.as_deref(),
            task.require_license,
        ) {
            Verdict::Rejected => {
                tracing::info!(id, "list has neither checksum nor license, rejected");
                Decision::Rejected
            }
            Verdict::Failed(e) => {
                tracing::warn!(id, "{}", e);
                Decision::Failed(e)
            }
            Verdict::AlreadyUpToDate { title } => {
                tracing::info!(id, "list is up to date");
                Decision::AlreadyUpToDate { title }
            }
            Verdict::NeedsUpdate => {
                let coordinator = PersistenceCoordinator::new(
                    &self.store,
                    &self.compiler,
                    self.report_compile_errors,
                );
                match coordinator.persist(id, &task.staged_key, &raw) {
                    Ok(persisted) => {
                        tracing::info!(id, filters = persisted.filters_count, "list updated");
                        Decision::Updated {
                            artifact: persisted.artifact,
                            metadata: FilterListMetadata::extract(&text),
                            checksum: marker.computed,
                            filters_count: persisted.filters_count,
                        }
                    }
                    Err(e) => {
                        tracing::error!(id, "failed to persist list: {}", e);
                        Decision::Failed(e)
                    }
                }
            }
        }
    }
}
