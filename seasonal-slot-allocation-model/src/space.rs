use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::ids::{ReservationUnitId, SpaceId};

/// One contiguous availability window within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// An allocatable physical unit for the round, with its resolved
/// opening-hours calendar. At most one window is kept per date.
#[derive(Debug, Clone)]
pub struct AllocationSpace {
    pub id: SpaceId,
    pub unit: ReservationUnitId,
    pub max_persons: Option<u32>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    available_times: BTreeMap<NaiveDate, TimeRange>,
}

impl AllocationSpace {
    #[must_use]
    pub const fn new(
        id: SpaceId,
        unit: ReservationUnitId,
        max_persons: Option<u32>,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Self {
        Self { id, unit, max_persons, period_start, period_end, available_times: BTreeMap::new() }
    }

    /// Records the availability window for a date. A window already stored
    /// for the same date is replaced, not merged.
    pub fn add_time(&mut self, date: NaiveDate, start: NaiveTime, end: NaiveTime) {
        self.available_times.insert(date, TimeRange { start, end });
    }

    #[must_use]
    pub fn available_time(&self, date: NaiveDate) -> Option<TimeRange> {
        self.available_times.get(&date).copied()
    }

    #[must_use]
    pub const fn available_times(&self) -> &BTreeMap<NaiveDate, TimeRange> {
        &self.available_times
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::AllocationSpace;
    use crate::ids::{ReservationUnitId, SpaceId};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, day).unwrap()
    }

    fn time(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn last_window_per_date_wins() {
        let mut space =
            AllocationSpace::new(SpaceId(1), ReservationUnitId(1), None, date(1), date(7));
        space.add_time(date(2), time(8), time(12));
        space.add_time(date(2), time(14), time(20));

        let window = space.available_time(date(2)).unwrap();
        assert_eq!(window.start, time(14));
        assert_eq!(window.end, time(20));
        assert_eq!(space.available_times().len(), 1);
    }

    #[test]
    fn missing_date_has_no_window() {
        let space = AllocationSpace::new(SpaceId(1), ReservationUnitId(1), None, date(1), date(7));
        assert!(space.available_time(date(3)).is_none());
    }
}
