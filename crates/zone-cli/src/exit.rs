//! Process exit codes

use thiserror::Error;

use fczone_core::{ConfigError, ZoneError};

pub const EXIT_OK: i32 = 0;
/// Invalid arguments, rejected validation or an ambiguous alias
pub const EXIT_INVALID: i32 = 2;
/// I/O, parse, remote, authentication or apply failure
pub const EXIT_FAILURE: i32 = 3;

/// Errors raised by the command line layer itself
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    Usage(String),
}

/// Exit code for an error, from the first zoning or CLI error in its chain
pub fn exit_code(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(zone_err) = cause.downcast_ref::<ZoneError>() {
            let invalid = zone_err.is_rejection()
                || matches!(
                    zone_err,
                    ZoneError::Configuration(ConfigError::Settings { .. })
                );
            return if invalid { EXIT_INVALID } else { EXIT_FAILURE };
        }
        if cause.downcast_ref::<CliError>().is_some() {
            return EXIT_INVALID;
        }
    }
    EXIT_FAILURE
}
