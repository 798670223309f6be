//! Clock abstractions for stamping emitted events.
//!
//! The interceptor stamps suppression events with a timestamp obtained from
//! a clock so hosts and tests can substitute their own time source.

pub mod base;
pub mod system;

pub use base::{BaseClock, ClockResult};
pub use system::SystemClock;
