//! # Studio Testing
//!
//! Testing utilities for reducers built on `studio-core`.
//!
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`mocks::FixedClock`]: deterministic time
//! - [`init_test_tracing`]: opt-in log output while debugging a test
//!
//! ## Example
//!
//! ```ignore
//! use studio_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(BookingReducer::new())
//!     .with_env(test_environment())
//!     .given_state(BookingState::new())
//!     .when_action(BookingAction::SelectService { service_id })
//!     .then_state(|state| assert_eq!(state.step, BookingStep::ChoosingBarber))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use studio_core::environment::Clock;


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Mutex, PoisonError};

    /// Clock for deterministic tests
    ///
    /// Returns the same time until moved with [`FixedClock::set`] or
    /// [`FixedClock::advance`].
    ///
    /// # Example
    ///
    /// ```
    /// use studio_testing::mocks::FixedClock;
    /// use studio_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug)]
    pub struct FixedClock {
        time: Mutex<DateTime<Utc>>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Mutex::new(time),
            }
        }

        /// Move the clock to an absolute time
        pub fn set(&self, time: DateTime<Utc>) {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner) = time;
        }

        /// Move the clock forward
        pub fn advance(&self, by: chrono::Duration) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += by;
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }
}

pub use mocks::FixedClock;

/// Create the default test clock: 2026-03-10 12:00:00 UTC (a Tuesday)
#[must_use]
pub fn test_clock() -> FixedClock {
    FixedClock::new(utc(2026, 3, 10, 12, 0))
}

/// Build a UTC timestamp, falling back to the Unix epoch for impossible dates
#[must_use]
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .map_or(DateTime::<Utc>::UNIX_EPOCH, |naive| Utc.from_utc_datetime(&naive))
}

/// Install a `tracing` subscriber writing to the test harness
///
/// Safe to call from every test; only the first call installs anything.
/// Filtering follows `RUST_LOG`.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
