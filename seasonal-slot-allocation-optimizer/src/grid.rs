use chrono::{Duration, NaiveTime, Timelike};

use crate::error::AllocationError;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Fixed-precision time grid the model is built on. Window starts round up
/// to the next grid step, window ends round down, durations round up, so a
/// solved slot never leaves the availability it came from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TimeGrid {
    step_minutes: i64,
}

impl TimeGrid {
    pub(crate) fn new(precision_minutes: u32) -> Result<Self, AllocationError> {
        let step = i64::from(precision_minutes);
        if step == 0 || MINUTES_PER_DAY % step != 0 {
            return Err(AllocationError::InvalidPrecision(precision_minutes));
        }
        Ok(Self { step_minutes: step })
    }

    pub(crate) const fn units_per_day(&self) -> i64 {
        MINUTES_PER_DAY / self.step_minutes
    }

    pub(crate) fn start_unit(&self, time: NaiveTime) -> i64 {
        let minutes = minute_of_day(time);
        (minutes + self.step_minutes - 1) / self.step_minutes
    }

    pub(crate) fn end_unit(&self, time: NaiveTime) -> i64 {
        minute_of_day(time) / self.step_minutes
    }

    pub(crate) fn duration_units(&self, duration: Duration) -> i64 {
        let minutes = duration.num_minutes().max(0);
        (minutes + self.step_minutes - 1) / self.step_minutes
    }

    pub(crate) fn time_of(&self, unit: i64) -> NaiveTime {
        let seconds = u32::try_from(unit * self.step_minutes * 60).unwrap_or(0);
        NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
            .unwrap_or(NaiveTime::MIN)
    }

    pub(crate) fn duration_of(&self, units: i64) -> Duration {
        Duration::minutes(units * self.step_minutes)
    }
}

fn minute_of_day(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight()) / 60
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveTime};

    use super::TimeGrid;
    use crate::error::AllocationError;

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn starts_round_up_and_ends_round_down() {
        let grid = TimeGrid::new(15).unwrap();
        assert_eq!(grid.start_unit(time(8, 0)), 32);
        assert_eq!(grid.start_unit(time(8, 1)), 33);
        assert_eq!(grid.end_unit(time(20, 0)), 80);
        assert_eq!(grid.end_unit(time(20, 14)), 80);
    }

    #[test]
    fn durations_round_up() {
        let grid = TimeGrid::new(15).unwrap();
        assert_eq!(grid.duration_units(Duration::minutes(60)), 4);
        assert_eq!(grid.duration_units(Duration::minutes(61)), 5);
    }

    #[test]
    fn units_map_back_to_times() {
        let grid = TimeGrid::new(15).unwrap();
        assert_eq!(grid.time_of(37), time(9, 15));
        assert_eq!(grid.duration_of(4), Duration::minutes(60));
    }

    #[test]
    fn precision_must_divide_a_day() {
        assert!(matches!(TimeGrid::new(0), Err(AllocationError::InvalidPrecision(0))));
        assert!(matches!(TimeGrid::new(7), Err(AllocationError::InvalidPrecision(7))));
        assert!(TimeGrid::new(1).is_ok());
        assert!(TimeGrid::new(15).is_ok());
    }
}
