use crate::commands::CmdResult;
use crate::error::{HeirloomError, Result};

/// Searching heirlooms is not supported yet. Always fails, so callers never
/// mistake it for an empty result.
pub fn run(_term: &str) -> Result<CmdResult> {
    Err(HeirloomError::NotImplemented("search"))
}
