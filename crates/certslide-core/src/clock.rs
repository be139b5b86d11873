//! Time source abstraction and instant formatting.
//!
//! The sliding engine never reads the system clock itself: the starting
//! instant is passed in by the caller, and everything downstream is a pure
//! function of it. `Clock` exists for the outer edge, so embedders can wire
//! the real clock in production and pin "now" in tests.

use chrono::{DateTime, SecondsFormat, Utc};

/// A source of the current instant.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Formats an instant the way date-valued report attributes are recorded.
///
/// RFC 3339 with whole-second precision and a `Z` offset, so two equal
/// instants always render identically regardless of their sub-second parts.
#[must_use]
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_fixed_clock_returns_pinned_instant() {
        let pinned = Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap();
        let clock = FixedClock(pinned);
        assert_eq!(clock.now(), pinned);
        assert_eq!(clock.now(), pinned);
    }

    #[test]
    fn test_format_instant_is_rfc3339_utc() {
        let instant = Utc.with_ymd_and_hms(2020, 6, 1, 12, 30, 45).unwrap();
        assert_eq!(format_instant(instant), "2020-06-01T12:30:45Z");
    }

    #[test]
    fn test_format_instant_drops_subsecond_precision() {
        let instant = Utc
            .with_ymd_and_hms(2020, 6, 1, 0, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(250))
            .unwrap();
        assert_eq!(format_instant(instant), "2020-06-01T00:00:00Z");
    }
}
