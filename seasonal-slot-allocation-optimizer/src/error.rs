use seasonal_slot_allocation_model::error::ValidationError;
use seasonal_slot_allocation_model::ids::{ApplicationEventId, BasketId};
use seasonal_slot_allocation_opening_hours::error::OpeningHoursError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AllocationError {
    #[error("opening hours lookup failed: {0}")]
    OpeningHours(#[from] OpeningHoursError),
    #[error("basket grouping references basket {0} which is not part of the round")]
    UnknownBasket(BasketId),
    #[error("basket {basket} references application event {event} which is not part of the round")]
    UnknownEvent { basket: BasketId, event: ApplicationEventId },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("fallback window {start_hour}:00..{end_hour}:00 is not a valid daily window")]
    InvalidFallbackWindow { start_hour: u32, end_hour: u32 },
    #[error("time grid precision of {0} minutes does not divide a day")]
    InvalidPrecision(u32),
}
