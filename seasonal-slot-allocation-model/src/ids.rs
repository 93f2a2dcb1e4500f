//! Identifier newtypes. Spaces are keyed separately from the reservation
//! units they are built from even though the numeric values coincide.

use serde::{Deserialize, Serialize};

macro_rules! identifier {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

identifier!(SpaceId);
identifier!(ReservationUnitId);
identifier!(ApplicationId);
identifier!(ApplicationEventId);
identifier!(OccurrenceId);
identifier!(BasketId);
