//! System clock implementation using standard library time functions.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::clock::{BaseClock, ClockResult};

/// Wall clock backed by `SystemTime`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl BaseClock for SystemClock {
    fn timestamp_ms(&self) -> ClockResult<u64> {
        let elapsed = SystemTime::now().duration_since(UNIX_EPOCH)?;
        Ok(elapsed.as_millis() as u64)
    }
}
