//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

pub mod clock {
    //! Deterministic clocks for services that read the current time.

    use std::sync::{Arc, Mutex, PoisonError};

    use chrono::{DateTime, Local, Utc};
    use mockable::Clock;

    /// Clock whose instant only moves when told to.
    #[derive(Debug)]
    pub struct FixtureClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl FixtureClock {
        #[must_use]
        pub fn new(now: DateTime<Utc>) -> Self {
            Self {
                now: Mutex::new(now),
            }
        }

        /// Move the clock to `now`.
        pub fn set(&self, now: DateTime<Utc>) {
            *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
        }
    }

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Shared fixed clock for service constructors.
    #[must_use]
    pub fn fixture_clock(now: DateTime<Utc>) -> Arc<dyn Clock> {
        Arc::new(FixtureClock::new(now))
    }
}

pub mod fixtures;
pub mod http;
pub mod in_memory;
