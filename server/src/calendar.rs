//! Time sources and card expiry months.

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::error::StoreError;

/// Source of the current instant. Injected so cart expiry and card expiry
/// can be tested without waiting.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn current_month(&self) -> MonthOfYear {
        let now = self.now();
        MonthOfYear {
            year: now.year(),
            month: now.month(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn advance_minutes(&self, minutes: i64) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += Duration::minutes(minutes);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A calendar month. Field order makes the derived ordering chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthOfYear {
    year: i32,
    month: u32,
}

impl MonthOfYear {
    pub fn new(month: u32, year: i32) -> Result<Self, StoreError> {
        if !(1..=12).contains(&month) {
            return Err(StoreError::InvalidExpirationDate);
        }
        Ok(Self { year, month })
    }

    pub const fn month(self) -> u32 {
        self.month
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub fn is_before(self, other: MonthOfYear) -> bool {
        self < other
    }
}

/// Parses the `MMYYYY` form cards are submitted with.
impl FromStr for MonthOfYear {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StoreError::InvalidExpirationDate);
        }
        let month = s[..2].parse().map_err(|_| StoreError::InvalidExpirationDate)?;
        let year = s[2..].parse().map_err(|_| StoreError::InvalidExpirationDate)?;
        Self::new(month, year)
    }
}

impl fmt::Display for MonthOfYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:04}", self.month, self.year)
    }
}
