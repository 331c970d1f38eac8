//! Compile a staged list and store the artifact.
//!
//! Order is fixed: compile, save the artifact under the list id, then clear
//! the staged download. Any error stops the sequence with the staged bytes
//! still in place, so the same cycle can simply be run again.

use crate::compiler::RuleCompiler;
use crate::pipeline::PipelineError;
use crate::store::ByteStore;

/// Result of a successful persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persisted {
    pub artifact: Vec<u8>,
    pub filters_count: usize,
}

/// Compiles raw lists and writes the results to a byte store.
pub struct PersistenceCoordinator<'a, S: ?Sized, C: ?Sized> {
    store: &'a S,
    compiler: &'a C,
    report_errors: bool,
}

impl<'a, S, C> PersistenceCoordinator<'a, S, C>
where
    S: ByteStore + ?Sized,
    C: RuleCompiler + ?Sized,
{
    pub fn new(store: &'a S, compiler: &'a C, report_errors: bool) -> Self {
        Self {
            store,
            compiler,
            report_errors,
        }
    }

    /// Compile `raw`, save the artifact under `id`, then clear `staged_key`.
    pub fn persist(&self, id: &str, staged_key: &str, raw: &[u8]) -> Result<Persisted, PipelineError> {
        if raw.is_empty() {
            return Err(PipelineError::EmptyInput {
                key: staged_key.to_string(),
            });
        }

        let compiled = self.compiler.compile(raw, self.report_errors)?;
        let filters_count = self.compiler.rule_count(&compiled);
        let artifact = self.compiler.serialize(&compiled)?;

        self.store.save_data(id, &artifact)?;
        tracing::debug!(id, bytes = artifact.len(), filters_count, "stored compiled artifact");

        self.store.clear_data(staged_key)?;

        Ok(Persisted {
            artifact,
            filters_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::BasicRuleCompiler;
    use crate::store::{staged_key, MemoryByteStore};

    #[test]
    fn persist_stores_artifact_and_clears_staged() {
        let store = MemoryByteStore::new();
        let key = staged_key("list");
        store.save_data(&key, b"||a^\n||b^\n").unwrap();

        let coordinator = PersistenceCoordinator::new(&store, &BasicRuleCompiler, true);
        let out = coordinator.persist("list", &key, b"||a^\n||b^\n").unwrap();

        assert_eq!(out.filters_count, 2);
        assert_eq!(store.load_data("list").unwrap(), out.artifact);
        assert!(!store.contains(&key));
    }

    #[test]
    fn compile_error_keeps_staged_and_old_artifact() {
        let store = MemoryByteStore::new();
        let key = staged_key("list");
        store.save_data("list", b"old artifact").unwrap();
        store.save_data(&key, b"@@\n").unwrap();

        let coordinator = PersistenceCoordinator::new(&store, &BasicRuleCompiler, true);
        let err = coordinator.persist("list", &key, b"@@\n").unwrap_err();

        assert!(matches!(err, PipelineError::Compilation(_)));
        assert_eq!(store.load_data("list").unwrap(), b"old artifact");
        assert!(store.contains(&key));
    }

    #[test]
    fn empty_input_rejected() {
        let store = MemoryByteStore::new();
        let coordinator = PersistenceCoordinator::new(&store, &BasicRuleCompiler, false);
        assert!(matches!(
            coordinator.persist("list", "list.download", b""),
            Err(PipelineError::EmptyInput { .. })
        ));
    }
}
