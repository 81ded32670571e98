// Time Provider Port (for testability)

const NANOS_PER_SEC: f64 = 1.0e9;

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Current wall-clock time in nanoseconds since epoch
    fn now_nanos(&self) -> i64;

    /// Current wall-clock time in fractional seconds since epoch
    fn now_secs(&self) -> f64 {
        nanos_to_secs(self.now_nanos())
    }
}

/// Convert an epoch-nanosecond reading to fractional seconds
pub fn nanos_to_secs(nanos: i64) -> f64 {
    nanos as f64 / NANOS_PER_SEC
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_nanos(&self) -> i64 {
        // None only past year 2262
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Manually driven clock. Each reading advances it by `step` nanoseconds.
    pub struct ManualClock {
        now: AtomicI64,
        step: i64,
    }

    impl ManualClock {
        /// Frozen clock
        pub fn new(start_nanos: i64) -> Self {
            Self::with_step(start_nanos, 0)
        }

        pub fn with_step(start_nanos: i64, step: i64) -> Self {
            Self {
                now: AtomicI64::new(start_nanos),
                step,
            }
        }

        pub fn advance(&self, nanos: i64) {
            self.now.fetch_add(nanos, Ordering::SeqCst);
        }
    }

    impl TimeProvider for ManualClock {
        fn now_nanos(&self) -> i64 {
            self.now.fetch_add(self.step, Ordering::SeqCst)
        }
    }
}
