//! Random identifier allocation.
//!
//! Candidates are drawn uniformly from an inclusive numeric range and
//! offered to a `claim` callback, which must atomically take the id if it is
//! free. Allocation and reservation are therefore a single step. The number
//! of draws is bounded; a saturated range is reported as
//! [`HeirloomError::AllocationExhausted`] instead of looping forever.

use crate::error::{HeirloomError, Result};
use crate::model::HeirloomId;
use log::debug;
use rand::Rng;

pub const DEFAULT_ID_MIN: u64 = 10_000_000_000;
pub const DEFAULT_ID_MAX: u64 = 100_000_000_000;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 64;

#[derive(Debug, Clone)]
pub struct IdAllocator {
    min: u64,
    max: u64,
    max_attempts: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            min: DEFAULT_ID_MIN,
            max: DEFAULT_ID_MAX,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl IdAllocator {
    pub fn new(min: u64, max: u64, max_attempts: u32) -> Result<Self> {
        if min > max {
            return Err(HeirloomError::Config(format!(
                "empty id range: {} > {}",
                min, max
            )));
        }
        if max_attempts == 0 {
            return Err(HeirloomError::Config(
                "max allocation attempts must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            min,
            max,
            max_attempts,
        })
    }

    /// Draw one candidate. It is not checked against anything.
    pub fn candidate(&self) -> HeirloomId {
        HeirloomId::from_number(rand::rng().random_range(self.min..=self.max))
    }

    /// Draw candidates until `claim` accepts one.
    ///
    /// `claim` returns Ok(true) when it took the id, Ok(false) when the id is
    /// already in use. Errors from `claim` abort allocation immediately.
    pub fn allocate<F>(&self, mut claim: F) -> Result<HeirloomId>
    where
        F: FnMut(&HeirloomId) -> Result<bool>,
    {
        for attempt in 1..=self.max_attempts {
            let candidate = self.candidate();
            if claim(&candidate)? {
                return Ok(candidate);
            }
            debug!("id collision on {} (attempt {})", candidate, attempt);
        }
        Err(HeirloomError::AllocationExhausted {
            attempts: self.max_attempts,
        })
    }
}
