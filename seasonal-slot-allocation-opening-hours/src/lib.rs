//! Boundary to the external opening-hours calendar service. The engine only
//! needs per-date time spans over a period; transport lives elsewhere.

pub mod error;

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::OpeningHoursError;

/// One span of a resource being open on a single date. A date may carry
/// several spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyHours {
    pub date: NaiveDate,
    pub times: Vec<TimeSpan>,
}

/// Synchronous lookup of opening hours for one resource over a date range,
/// one call per resource. Failures propagate to the caller unchanged; the
/// engine neither retries nor substitutes data.
pub trait OpeningHoursService {
    fn opening_hours(
        &self,
        resource: &str,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<DailyHours>, OpeningHoursError>;
}

/// In-memory service used by tests and local development.
#[derive(Debug, Clone, Default)]
pub struct StaticOpeningHours {
    hours: BTreeMap<String, Vec<DailyHours>>,
}

impl StaticOpeningHours {
    #[must_use]
    pub const fn new() -> Self {
        Self { hours: BTreeMap::new() }
    }

    pub fn add(&mut self, resource: &str, date: NaiveDate, start: NaiveTime, end: NaiveTime) {
        let days = self.hours.entry(resource.to_owned()).or_default();
        let span = TimeSpan { start_time: start, end_time: end };
        match days.iter_mut().find(|day| day.date == date) {
            Some(day) => day.times.push(span),
            None => days.push(DailyHours { date, times: vec![span] }),
        }
    }
}

impl OpeningHoursService for StaticOpeningHours {
    fn opening_hours(
        &self,
        resource: &str,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<DailyHours>, OpeningHoursError> {
        Ok(self
            .hours
            .get(resource)
            .map(|days| {
                days.iter().filter(|day| day.date >= from && day.date <= until).cloned().collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::{OpeningHoursService, StaticOpeningHours};

    #[test]
    fn range_filter_is_inclusive() {
        let mut service = StaticOpeningHours::new();
        let start = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(20, 0, 0).unwrap();
        for day in 1..=5 {
            service.add("hall-1", NaiveDate::from_ymd_opt(2023, 3, day).unwrap(), start, end);
        }

        let days = service
            .opening_hours(
                "hall-1",
                NaiveDate::from_ymd_opt(2023, 3, 2).unwrap(),
                NaiveDate::from_ymd_opt(2023, 3, 4).unwrap(),
            )
            .unwrap();
        assert_eq!(days.len(), 3);
    }

    #[test]
    fn unknown_resource_is_empty_not_an_error() {
        let service = StaticOpeningHours::new();
        let days = service
            .opening_hours(
                "nowhere",
                NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2023, 3, 2).unwrap(),
            )
            .unwrap();
        assert!(days.is_empty());
    }
}
