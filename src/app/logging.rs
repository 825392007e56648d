//! Logging configuration and initialization

use crate::app::config::AppConfig;
use tracing::{debug, trace};

/// Initialize tracing/logging for the application
///
/// Logs go to stderr so they never mix with surfaced command output.
pub fn init_logging(config: &AppConfig) {
    let log_level = config.log_level();

    let result = tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .with_target(config.verbose >= 2)
        .with_thread_ids(config.verbose >= 3)
        .with_line_number(config.verbose >= 3)
        .try_init();

    if result.is_err() {
        // A subscriber is already installed (tests, embedding hosts)
        return;
    }

    debug!("dirstat-cleanup started with verbosity level: {}", config.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}
