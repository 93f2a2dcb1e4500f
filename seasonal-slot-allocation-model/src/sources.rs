//! Source records handed in by the application store. Recurrence expansion,
//! status workflow and basket scoring all happen there; these shapes only
//! carry the result into the allocation engine.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::event::AllocationOccurrence;
use crate::ids::{ApplicationEventId, ApplicationId, BasketId, OccurrenceId, ReservationUnitId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationUnit {
    pub id: ReservationUnitId,
    /// Resource identifier under which the external calendar service knows
    /// this unit.
    pub hours_resource: String,
    pub max_persons: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    InReview,
    ReviewDone,
    Allocated,
    Handled,
    Declined,
    Cancelled,
    Sent,
}

impl ApplicationStatus {
    /// Declined and cancelled applications never take part in allocation.
    #[must_use]
    pub const fn is_excluded_from_allocation(self) -> bool {
        matches!(self, Self::Declined | Self::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationEvent {
    pub id: ApplicationEventId,
    /// Recurrence-expanded occurrences, keyed by their round-unique id.
    pub occurrences: BTreeMap<OccurrenceId, AllocationOccurrence>,
    pub requested_units: BTreeSet<ReservationUnitId>,
    pub declined_units: BTreeSet<ReservationUnitId>,
    pub begin: NaiveTime,
    pub end: NaiveTime,
    #[serde(with = "crate::duration::minutes")]
    pub min_duration: Duration,
    #[serde(with = "crate::duration::optional_minutes")]
    pub max_duration: Option<Duration>,
    pub events_per_week: u32,
    pub num_persons: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub status: ApplicationStatus,
    pub events: Vec<ApplicationEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundBasket {
    pub id: BasketId,
    pub allocation_percentage: Option<u8>,
    pub order_number: u16,
    /// Objective weight, derived from applicant-priority metadata by the
    /// application store.
    pub score: i64,
}

/// A full application round as the engine receives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRound {
    pub reservation_period_begin: NaiveDate,
    pub reservation_period_end: NaiveDate,
    pub reservation_units: Vec<ReservationUnit>,
    pub applications: Vec<Application>,
    pub baskets: Vec<RoundBasket>,
    /// Which events each named basket holds. An event may appear under
    /// several baskets.
    pub events_by_basket: BTreeMap<BasketId, Vec<ApplicationEventId>>,
}
