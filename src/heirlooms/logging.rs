//! Logging bootstrap for clients.
//!
//! The library only emits through the `log` facade. Clients call
//! [`init_logging`] once and keep the returned handle alive; output goes to
//! stderr so it never mixes with command output (image bytes may be written
//! to stdout). `RUST_LOG` overrides the requested level.

use crate::error::{HeirloomError, Result};
use flexi_logger::{Logger, LoggerHandle};

/// Level used when the client does not ask for anything else.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

pub fn init_logging(level: &str) -> Result<LoggerHandle> {
    let level = normalize_level(level)?;
    Logger::try_with_env_or_str(level)
        .map_err(|e| HeirloomError::Config(format!("invalid log level `{}`: {}", level, e)))?
        .log_to_stderr()
        .start()
        .map_err(|e| HeirloomError::Config(format!("failed to start logger: {}", e)))
}

pub fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(HeirloomError::Config(format!(
            "unsupported log level `{}`; expected trace|debug|info|warn|error|off",
            other
        ))),
    }
}
