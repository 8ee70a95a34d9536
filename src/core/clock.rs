//! Server-side clock.
//!
//! Transaction dates and times always come from the server, never from the kiosk,
//! so a station cannot backdate a delivery. The clock runs at a fixed UTC offset
//! (the weighing stations' local time) taken from configuration.

use crate::errors::{Error, Result};
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

/// Source of the current local date and time.
pub trait Clock: Send + Sync {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Current local date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Current local time-of-day truncated to whole seconds.
    fn time_of_day(&self) -> NaiveTime {
        let time = self.now().time();
        time.with_nanosecond(0).unwrap_or(time)
    }
}

/// Wall clock at a fixed offset from UTC.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// Creates a clock `utc_offset_hours` hours east of UTC.
    ///
    /// # Errors
    /// Returns a configuration error if the offset is outside ±23 hours.
    pub fn new(utc_offset_hours: i32) -> Result<Self> {
        let offset = utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| Error::Config {
                message: format!("UTC offset out of range: {utc_offset_hours} hours"),
            })?;
        Ok(Self { offset })
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }
}

/// Clock pinned to one instant. Used for tests and replaying past deliveries.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: NaiveDateTime,
}

impl FixedClock {
    /// Creates a clock that always reports `instant`.
    #[must_use]
    pub const fn new(instant: NaiveDateTime) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.instant
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_time_of_day_drops_fractional_seconds() {
        let instant = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_milli_opt(8, 15, 30, 750)
            .unwrap();
        let clock = FixedClock::new(instant);

        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(
            clock.time_of_day(),
            NaiveTime::from_hms_opt(8, 15, 30).unwrap()
        );
    }

    #[test]
    fn test_system_clock_rejects_out_of_range_offset() {
        assert!(SystemClock::new(7).is_ok());
        assert!(SystemClock::new(-11).is_ok());
        assert!(matches!(SystemClock::new(30), Err(Error::Config { .. })));
    }
}
