use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::ids::{ApplicationEventId, OccurrenceId, SpaceId};

/// One concrete repetition of a recurring application event, pre-expanded
/// by the recurrence logic of the application store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationOccurrence {
    pub id: OccurrenceId,
    pub first_date: NaiveDate,
    pub begin: NaiveTime,
    pub end: NaiveTime,
}

/// A single applicant's requested recurring slot, normalized for solving.
#[derive(Debug, Clone)]
pub struct AllocationEvent {
    pub id: ApplicationEventId,
    pub occurrences: BTreeMap<OccurrenceId, AllocationOccurrence>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Requested spaces minus the ones the applicant declined.
    pub space_ids: BTreeSet<SpaceId>,
    pub begin: NaiveTime,
    pub end: NaiveTime,
    pub min_duration: Duration,
    /// Falls back to `min_duration` when the application left it unset.
    pub max_duration: Duration,
    pub events_per_week: u32,
    pub num_persons: Option<u32>,
}
