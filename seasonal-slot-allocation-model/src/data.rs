use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::basket::{AllocationBasket, BasketKey};
use crate::error::ValidationError;
use crate::ids::{ApplicationEventId, BasketId, OccurrenceId, SpaceId};
use crate::space::AllocationSpace;

/// The solver's complete input: fully resolved spaces and baskets for one
/// application round.
#[derive(Debug, Clone)]
pub struct AllocationData {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub spaces: BTreeMap<SpaceId, AllocationSpace>,
    pub baskets: BTreeMap<BasketKey, AllocationBasket>,
    /// Named baskets the caller wants in the output. Empty means all
    /// allocations are returned.
    pub output_basket_ids: Vec<BasketId>,
}

impl AllocationData {
    /// Rejects dangling references before any solving happens. Events with
    /// an empty acceptable-space set are fine (they simply stay
    /// unallocated); references to spaces or baskets the round does not
    /// know are not.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for basket in self.baskets.values() {
            for event in &basket.events {
                for space_id in &event.space_ids {
                    if !self.spaces.contains_key(space_id) {
                        return Err(ValidationError::UnknownSpace {
                            event: event.id,
                            space: *space_id,
                        });
                    }
                }
            }
        }
        for basket_id in &self.output_basket_ids {
            if !self.baskets.contains_key(&BasketKey::Named(*basket_id)) {
                return Err(ValidationError::UnknownOutputBasket(*basket_id));
            }
        }
        Ok(())
    }
}

/// One solved assignment: an event occurrence bound to a space at a
/// concrete time of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedEvent {
    pub space: SpaceId,
    pub event: ApplicationEventId,
    pub occurrence: OccurrenceId,
    pub basket: BasketKey,
    pub begin: NaiveTime,
    pub end: NaiveTime,
    #[serde(with = "crate::duration::minutes")]
    pub duration: Duration,
}
