//! Turns an application round into the solver's normalized input.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use seasonal_slot_allocation_config::FallbackWindowConfig;
use seasonal_slot_allocation_model::basket::{
    AllocationBasket, BasketKey, BasketKind, CATCH_ALL_SCORE,
};
use seasonal_slot_allocation_model::data::AllocationData;
use seasonal_slot_allocation_model::event::AllocationEvent;
use seasonal_slot_allocation_model::ids::{ApplicationEventId, BasketId, SpaceId};
use seasonal_slot_allocation_model::sources::{ApplicationEvent, ApplicationRound, ReservationUnit};
use seasonal_slot_allocation_model::space::AllocationSpace;
use seasonal_slot_allocation_opening_hours::OpeningHoursService;
use tracing::debug;

use crate::error::AllocationError;

/// Builds the complete [`AllocationData`] for a round.
///
/// With a calendar service each reservation unit's opening hours are
/// resolved over the reservation period; a service failure propagates to
/// the caller untouched. Without a service every date of the period gets
/// the fixed fallback window instead (development mode).
pub fn build_allocation_data(
    round: &ApplicationRound,
    hours: Option<&dyn OpeningHoursService>,
    fallback: FallbackWindowConfig,
    output_basket_ids: Vec<BasketId>,
) -> Result<AllocationData, AllocationError> {
    let mut spaces = BTreeMap::new();
    for unit in &round.reservation_units {
        let space = build_space(round, unit, hours, fallback)?;
        spaces.insert(space.id, space);
    }

    let data = AllocationData {
        period_start: round.reservation_period_begin,
        period_end: round.reservation_period_end,
        spaces,
        baskets: build_baskets(round)?,
        output_basket_ids,
    };
    data.validate()?;
    debug!(
        "prepared {} spaces and {} baskets for the period {}..={}",
        data.spaces.len(),
        data.baskets.len(),
        data.period_start,
        data.period_end
    );
    Ok(data)
}

fn build_space(
    round: &ApplicationRound,
    unit: &ReservationUnit,
    hours: Option<&dyn OpeningHoursService>,
    fallback: FallbackWindowConfig,
) -> Result<AllocationSpace, AllocationError> {
    let mut space = AllocationSpace::new(
        SpaceId(unit.id.0),
        unit.id,
        unit.max_persons,
        round.reservation_period_begin,
        round.reservation_period_end,
    );

    match hours {
        Some(service) => {
            let days = service.opening_hours(
                &unit.hours_resource,
                round.reservation_period_begin,
                round.reservation_period_end,
            )?;
            for day in days {
                for span in day.times {
                    space.add_time(day.date, span.start_time, span.end_time);
                }
            }
        }
        None => {
            let window = fallback_window(fallback)?;
            for date in round
                .reservation_period_begin
                .iter_days()
                .take_while(|date| *date <= round.reservation_period_end)
            {
                space.add_time(date, window.0, window.1);
            }
        }
    }
    Ok(space)
}

fn fallback_window(fallback: FallbackWindowConfig) -> Result<(NaiveTime, NaiveTime), AllocationError> {
    let invalid = AllocationError::InvalidFallbackWindow {
        start_hour: fallback.start_hour,
        end_hour: fallback.end_hour,
    };
    if fallback.start_hour >= fallback.end_hour {
        return Err(invalid);
    }
    let start = NaiveTime::from_hms_opt(fallback.start_hour, 0, 0);
    let end = NaiveTime::from_hms_opt(fallback.end_hour, 0, 0);
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(invalid),
    }
}

fn allocation_event(source: &ApplicationEvent, round: &ApplicationRound) -> AllocationEvent {
    AllocationEvent {
        id: source.id,
        occurrences: source.occurrences.clone(),
        period_start: round.reservation_period_begin,
        period_end: round.reservation_period_end,
        space_ids: source
            .requested_units
            .difference(&source.declined_units)
            .map(|unit| SpaceId(unit.0))
            .collect(),
        begin: source.begin,
        end: source.end,
        min_duration: source.min_duration,
        max_duration: source.max_duration.unwrap_or(source.min_duration),
        events_per_week: source.events_per_week,
        num_persons: source.num_persons,
    }
}

fn build_baskets(
    round: &ApplicationRound,
) -> Result<BTreeMap<BasketKey, AllocationBasket>, AllocationError> {
    // Declined and cancelled applications drop out here and never reach any
    // basket, the catch-all included.
    let retained: BTreeMap<ApplicationEventId, &ApplicationEvent> = round
        .applications
        .iter()
        .filter(|application| !application.status.is_excluded_from_allocation())
        .flat_map(|application| &application.events)
        .map(|event| (event.id, event))
        .collect();
    let excluded: BTreeMap<ApplicationEventId, &ApplicationEvent> = round
        .applications
        .iter()
        .filter(|application| application.status.is_excluded_from_allocation())
        .flat_map(|application| &application.events)
        .map(|event| (event.id, event))
        .collect();

    let mut baskets = BTreeMap::new();
    for (basket_id, event_ids) in &round.events_by_basket {
        let source_basket = round
            .baskets
            .iter()
            .find(|basket| basket.id == *basket_id)
            .ok_or(AllocationError::UnknownBasket(*basket_id))?;

        let mut events = Vec::new();
        for event_id in event_ids {
            if let Some(event) = retained.get(event_id) {
                events.push(allocation_event(event, round));
            } else if !excluded.contains_key(event_id) {
                return Err(AllocationError::UnknownEvent {
                    basket: *basket_id,
                    event: *event_id,
                });
            }
        }

        baskets.insert(
            BasketKey::Named(*basket_id),
            AllocationBasket {
                kind: BasketKind::Named {
                    id: source_basket.id,
                    allocation_percentage: source_basket.allocation_percentage,
                    order_number: source_basket.order_number,
                },
                events,
                score: source_basket.score,
            },
        );
    }

    // The catch-all holds every retained event of the round exactly once,
    // whether or not a named basket lists it, so everything stays
    // allocatable at the lowest priority.
    baskets.insert(
        BasketKey::CatchAll,
        AllocationBasket {
            kind: BasketKind::CatchAll,
            events: retained.values().map(|event| allocation_event(event, round)).collect(),
            score: CATCH_ALL_SCORE,
        },
    );
    Ok(baskets)
}
