//! Injectable time source

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Source of "now" for timestamps and current-month filtering
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Today's calendar date in the user's frame of reference
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock; `today` uses the local calendar
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock frozen at one instant (tests, replays)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Midnight UTC on the given date
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let clock = FixedClock::on(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.now().to_rfc3339(), "2024-05-17T00:00:00+00:00");
    }
}
