//! Instants at the precision the store keeps.
//!
//! `TIMESTAMPTZ` columns hold microseconds and round anything finer, so every
//! instant the domain persists is truncated first. A value built in memory
//! then equals the one read back.

use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;

/// Sub-second digits retained by the store.
pub const STORED_SUBSEC_DIGITS: u16 = 6;

/// Truncate `at` to microsecond precision.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Timelike, Utc};
/// use tripshare::domain::timestamps::at_storage_precision;
///
/// let at = Utc.timestamp_opt(1_750_000_000, 123_456_789).single().unwrap();
/// assert_eq!(at_storage_precision(at).nanosecond(), 123_456_000);
/// ```
#[must_use]
pub fn at_storage_precision(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(STORED_SUBSEC_DIGITS)
}

/// Current instant from `clock`, truncated to storage precision.
pub fn stored_now(clock: &dyn Clock) -> DateTime<Utc> {
    at_storage_precision(clock.utc())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::{TimeZone, Timelike};
    use rstest::rstest;

    use super::*;
    use crate::test_support::clock::FixtureClock;

    fn instant(nanos: u32) -> DateTime<Utc> {
        Utc.timestamp_opt(1_750_000_000, nanos)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[case(123_456_789, 123_456_000)]
    #[case(123_456_999, 123_456_000)]
    #[case(123_456_000, 123_456_000)]
    #[case(0, 0)]
    fn truncates_below_microseconds(#[case] nanos: u32, #[case] expected: u32) {
        assert_eq!(at_storage_precision(instant(nanos)).nanosecond(), expected);
    }

    #[test]
    fn truncation_never_moves_forward() {
        let at = instant(999_999_999);
        let stored = at_storage_precision(at);
        assert!(stored <= at);
        assert_eq!(stored.timestamp(), at.timestamp());
    }

    #[test]
    fn stored_now_reads_the_clock() {
        let clock = FixtureClock::new(instant(5_000_001));
        assert_eq!(stored_now(&clock), instant(5_000_000));
    }
}
