//! CLI command handlers. Each command is in its own file.

mod checksum;
mod install;
mod remove;
mod stage;
mod status;

pub use checksum::run_checksum;
pub use install::{run_install, run_update_all};
pub use remove::run_remove;
pub use stage::run_stage;
pub use status::run_status;
