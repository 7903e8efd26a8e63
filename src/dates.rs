use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use std::sync::Mutex;

/// Canonical key for a local calendar day, `YYYY-MM-DD`.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn day_before(date: NaiveDate, offset_days: i64) -> NaiveDate {
    date - Duration::days(offset_days)
}

/// True iff `earlier` is exactly the calendar day before `later`.
///
/// The engine decides streak chaining by reading the ledger at yesterday's
/// key instead of comparing two dates, so this stays a standalone check
/// for callers that already hold both days.
pub fn is_consecutive(earlier: NaiveDate, later: NaiveDate) -> bool {
    earlier + Duration::days(1) == later
}

/// Source of "now" for the engine. Injected so tests can walk through
/// multi-day sequences without real elapsed time.
pub trait Clock: Send + Sync {
    /// The current local calendar day.
    fn today(&self) -> NaiveDate;
    /// The current instant, used for completion timestamps.
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests. Time only moves when `set_today` is called.
#[derive(Debug)]
pub struct ManualClock {
    today: Mutex<NaiveDate>,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    pub fn set_today(&self, today: NaiveDate) {
        *self.today.lock().unwrap() = today;
    }

    pub fn advance_days(&self, days: i64) {
        let mut guard = self.today.lock().unwrap();
        *guard = *guard + Duration::days(days);
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap()
    }

    fn now(&self) -> DateTime<Utc> {
        self.today()
            .and_hms_opt(12, 0, 0)
            .expect("valid time of day")
            .and_utc()
    }
}
