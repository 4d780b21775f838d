use anyhow::{ensure, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive time range bounding one aggregation run. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        ensure!(start <= end, "window start {start} is after end {end}");
        Ok(Self { start, end })
    }

    /// Inclusive on both ends.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }

    /// Every calendar date from start to end, inclusive.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end.date_naive();
        let mut next = Some(self.start.date_naive());
        std::iter::from_fn(move || {
            let current = next?;
            if current > end {
                return None;
            }
            next = current.checked_add_signed(Duration::days(1));
            Some(current)
        })
    }
}
