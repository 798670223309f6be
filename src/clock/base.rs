//! Base clock interface for event timestamps.

/// Result type for clock operations
pub type ClockResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Abstract base trait for clock implementations.
///
/// Provides the timestamp source used when emitting events. Event timestamps
/// are wall-clock based so they remain meaningful across processes.
pub trait BaseClock: Send + Sync + std::fmt::Debug {
    /// Current time in milliseconds since the Unix epoch.
    ///
    /// # Errors
    /// Returns an error if the clock cannot provide the current time.
    fn timestamp_ms(&self) -> ClockResult<u64>;
}
