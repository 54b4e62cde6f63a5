//! Time sources for the pantry core.
//!
//! Everything that needs "now" goes through a [`Clock`] so tests can pin time
//! with a [`ManualClock`].

use crate::error::{ExpiryError, Result};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, Utc};
use std::sync::Mutex;

/// Supplies the current instant.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Result<DateTime<Utc>>;

    /// Current wall-clock time in the user's local timezone.
    fn local_now(&self) -> Result<NaiveDateTime> {
        Ok(self.now()?.with_timezone(&Local).naive_local())
    }

    /// Current local calendar date, the `today` used for bucketing.
    fn today(&self) -> Result<NaiveDate> {
        Ok(self.local_now()?.date())
    }
}

/// The operating system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<DateTime<Utc>> {
        Ok(Utc::now())
    }
}

/// A hand-driven clock.
///
/// Its wall clock is UTC, so `today()` does not depend on the host timezone.
/// A clock can be switched off with [`ManualClock::fail`] to simulate an
/// unavailable time source.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Option<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(Some(now)),
        }
    }

    /// Clock positioned at midnight UTC of `date` plus `hour` hours.
    pub fn at(date: NaiveDate, hour: u32) -> Self {
        let instant = date
            .and_hms_opt(hour.min(23), 0, 0)
            .unwrap_or_default()
            .and_utc();
        Self::new(instant)
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.slot() = Some(now);
    }

    pub fn advance(&self, by: Duration) {
        let mut slot = self.slot();
        if let Some(now) = slot.as_mut() {
            *now += by;
        }
    }

    /// Make every subsequent read fail until [`ManualClock::set`] is called.
    pub fn fail(&self) {
        *self.slot() = None;
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<DateTime<Utc>>> {
        self.now
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Result<DateTime<Utc>> {
        self.slot()
            .ok_or_else(|| ExpiryError::ClockUnavailable("manual clock is stopped".to_string()))
    }

    fn local_now(&self) -> Result<NaiveDateTime> {
        Ok(self.now()?.naive_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_and_reports_utc_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let clock = ManualClock::at(date, 23);
        assert_eq!(clock.today().unwrap(), date);

        clock.advance(Duration::hours(1));
        assert_eq!(clock.today().unwrap(), date.succ_opt().unwrap());
    }

    #[test]
    fn failed_clock_reports_unavailable() {
        let clock = ManualClock::at(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(), 9);
        clock.fail();
        assert!(matches!(clock.now(), Err(ExpiryError::ClockUnavailable(_))));
        assert!(clock.today().is_err());

        clock.set(Utc::now());
        assert!(clock.now().is_ok());
    }
}
