use listup_core::config;
use listup_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    let cfg = config::load_or_init();
    let log_cfg = cfg
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    if let Err(err) = logging::init_logging(&log_cfg) {
        logging::init_logging_stderr(&log_cfg);
        tracing::warn!("log file unavailable, logging to stderr: {:#}", err);
    }

    let result = match cfg {
        Ok(cfg) => CliCommand::run_from_args(cfg).await,
        Err(err) => Err(err.context("load config")),
    };
    if let Err(err) = result {
        eprintln!("listup error: {:#}", err);
        std::process::exit(1);
    }
}
