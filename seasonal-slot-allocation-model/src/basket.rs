use core::fmt;

use serde::{Deserialize, Serialize};

use crate::event::AllocationEvent;
use crate::ids::BasketId;

/// Order number reported for the catch-all basket so it sorts after every
/// real basket.
pub const CATCH_ALL_ORDER_NUMBER: u16 = 1000;

/// Objective weight of the catch-all basket.
pub const CATCH_ALL_SCORE: i64 = 1;

/// Lookup key for a basket. `Ord` places `CatchAll` after every named
/// basket, so ordered iteration visits real baskets first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BasketKey {
    Named(BasketId),
    CatchAll,
}

impl fmt::Display for BasketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(id) => write!(f, "{id}"),
            Self::CatchAll => f.write_str("catch-all"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BasketKind {
    Named { id: BasketId, allocation_percentage: Option<u8>, order_number: u16 },
    CatchAll,
}

/// A priority tier of events sharing an objective weight. Besides the named
/// baskets of the round there is always one catch-all basket holding every
/// allocatable event, so events outside any named basket can still be
/// placed, at the lowest priority.
#[derive(Debug, Clone)]
pub struct AllocationBasket {
    pub kind: BasketKind,
    pub events: Vec<AllocationEvent>,
    pub score: i64,
}

impl AllocationBasket {
    #[must_use]
    pub const fn key(&self) -> BasketKey {
        match self.kind {
            BasketKind::Named { id, .. } => BasketKey::Named(id),
            BasketKind::CatchAll => BasketKey::CatchAll,
        }
    }

    #[must_use]
    pub const fn order_number(&self) -> u16 {
        match self.kind {
            BasketKind::Named { order_number, .. } => order_number,
            BasketKind::CatchAll => CATCH_ALL_ORDER_NUMBER,
        }
    }
}
