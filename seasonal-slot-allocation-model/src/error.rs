use thiserror::Error;

use crate::ids::{ApplicationEventId, BasketId, SpaceId};

/// Structural problems in an [`AllocationData`](crate::data::AllocationData)
/// that must be rejected before solving.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("application event {event} references space {space} which is not part of the round")]
    UnknownSpace { event: ApplicationEventId, space: SpaceId },
    #[error("output filter references basket {0} which is not part of the round")]
    UnknownOutputBasket(BasketId),
}
