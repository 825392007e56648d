//! Error handling utilities

use crate::error::CleanupError;
use tracing::error;

/// Exit status for a failed invocation.
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<CleanupError>() {
        Some(CleanupError::UnknownAction(_)) | Some(CleanupError::EmptySelection) => 2,
        _ => 1,
    }
}

/// Report a fatal error and exit.
///
/// - `verbose = 0`: the top-level message only
/// - `verbose >= 1`: the full error chain
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);

    eprintln!("Error: {error}");
    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    std::process::exit(exit_code_for(&error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let usage = anyhow::Error::new(CleanupError::UnknownAction("x".into()));
        assert_eq!(exit_code_for(&usage), 2);

        let other = anyhow::anyhow!("disk on fire");
        assert_eq!(exit_code_for(&other), 1);

        let wrapped = anyhow::Error::new(CleanupError::EmptySelection).context("while listing");
        assert_eq!(exit_code_for(&wrapped), 2);
    }
}
