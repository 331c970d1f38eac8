//! Filter list update pipeline: checksum validation, update decisions and
//! persistence of compiled rule sets.

pub mod config;
pub mod logging;

pub mod checksum;
pub mod compiler;
pub mod decision;
pub mod metadata;
pub mod persist;
pub mod pipeline;
pub mod records;
pub mod retry;
pub mod store;
pub mod task;

pub use pipeline::{Decision, PipelineError, UpdatePipeline};
pub use task::{TaskOutcome, UpdateTask};
