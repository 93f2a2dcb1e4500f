use std::collections::BTreeMap;

use chrono::NaiveDate;
use good_lp::{variable, ProblemVariables, Variable};
use seasonal_slot_allocation_model::basket::BasketKey;
use seasonal_slot_allocation_model::data::AllocationData;
use seasonal_slot_allocation_model::event::{AllocationEvent, AllocationOccurrence};
use seasonal_slot_allocation_model::ids::{ApplicationEventId, OccurrenceId, SpaceId};
use seasonal_slot_allocation_model::space::AllocationSpace;

use crate::grid::TimeGrid;

/// One boolean decision "assign this occurrence, under this basket, to this
/// space", together with its start variable and the precomputed window it
/// may move in. All four foreign keys travel with the variables so decoding
/// never has to guess which tuple a solver value belongs to.
pub(crate) struct Candidate {
    pub space: SpaceId,
    pub basket: BasketKey,
    pub event: ApplicationEventId,
    pub occurrence: OccurrenceId,
    pub first_date: NaiveDate,
    /// Earliest allowed start, in grid units.
    pub min_start: i64,
    /// Latest allowed end, in grid units.
    pub max_end: i64,
    pub duration: i64,
    pub events_per_week: u32,
    /// Objective coefficient: duration units times basket score.
    pub weight: f64,
    pub selected: Variable,
    pub start: Variable,
}

impl Candidate {
    /// A zero-width window means this assignment can never be performed and
    /// its boolean is forced off.
    pub(crate) const fn window_fits(&self) -> bool {
        self.min_start + self.duration <= self.max_end
    }
}

fn has_room_for_persons(space: &AllocationSpace, event: &AllocationEvent) -> bool {
    match (space.max_persons, event.num_persons) {
        (Some(max_persons), Some(num_persons)) => max_persons >= num_persons,
        _ => true,
    }
}

/// Spaces the event may be placed in: requested and not declined, with
/// enough room for the expected persons.
pub(crate) fn suitable_spaces<'a>(
    event: &'a AllocationEvent,
    spaces: &'a BTreeMap<SpaceId, AllocationSpace>,
) -> impl Iterator<Item = &'a AllocationSpace> + 'a {
    event
        .space_ids
        .iter()
        .filter_map(|space_id| spaces.get(space_id))
        .filter(|space| has_room_for_persons(space, event))
}

/// Intersects the occurrence's requested window with the space's
/// availability on the occurrence date. Returns a zero-width window when
/// the date is closed or the intersection cannot hold `duration`.
fn assignable_window(
    occurrence: &AllocationOccurrence,
    space: &AllocationSpace,
    duration: i64,
    grid: &TimeGrid,
) -> (i64, i64) {
    let mut min_start = 0;
    let mut max_end = 0;
    if let Some(window) = space.available_time(occurrence.first_date) {
        min_start = grid.start_unit(occurrence.begin).max(grid.start_unit(window.start));
        max_end = grid.end_unit(occurrence.end).min(grid.end_unit(window.end));
    }
    if min_start + duration > max_end {
        (0, 0)
    } else {
        (min_start, max_end)
    }
}

/// Builds the candidate arena: one entry per geometrically and
/// capacity-compatible (basket, event, occurrence, space) tuple.
pub(crate) fn generate_candidates(
    data: &AllocationData,
    grid: &TimeGrid,
    vars: &mut ProblemVariables,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for basket in data.baskets.values() {
        for event in &basket.events {
            let duration = grid.duration_units(event.min_duration);
            #[allow(clippy::cast_precision_loss)]
            let weight = (duration * basket.score) as f64;
            for occurrence in event.occurrences.values() {
                for space in suitable_spaces(event, &data.spaces) {
                    let (min_start, max_end) = assignable_window(occurrence, space, duration, grid);
                    let selected = vars.add(
                        variable().binary().name(format!(
                            "x_s{}_b{}_e{}_o{}",
                            space.id,
                            basket.key(),
                            event.id,
                            occurrence.id
                        )),
                    );
                    #[allow(clippy::cast_precision_loss)]
                    let start = vars.add(
                        variable()
                            .integer()
                            .min(min_start as f64)
                            .max((max_end - duration).max(min_start) as f64)
                            .name(format!("s_o{}_on_s{}_b{}", occurrence.id, space.id, basket.key())),
                    );
                    candidates.push(Candidate {
                        space: space.id,
                        basket: basket.key(),
                        event: event.id,
                        occurrence: occurrence.id,
                        first_date: occurrence.first_date,
                        min_start,
                        max_end,
                        duration,
                        events_per_week: event.events_per_week,
                        weight,
                        selected,
                        start,
                    });
                }
            }
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use chrono::{Duration, NaiveDate, NaiveTime};
    use good_lp::ProblemVariables;
    use seasonal_slot_allocation_model::basket::{
        AllocationBasket, BasketKind, CATCH_ALL_SCORE,
    };
    use seasonal_slot_allocation_model::data::AllocationData;
    use seasonal_slot_allocation_model::event::{AllocationEvent, AllocationOccurrence};
    use seasonal_slot_allocation_model::ids::{
        ApplicationEventId, OccurrenceId, ReservationUnitId, SpaceId,
    };
    use seasonal_slot_allocation_model::space::AllocationSpace;

    use super::{assignable_window, generate_candidates, suitable_spaces};
    use crate::grid::TimeGrid;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, day).unwrap()
    }

    fn time(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
    }

    fn space(id: u32, max_persons: Option<u32>) -> AllocationSpace {
        let mut space = AllocationSpace::new(
            SpaceId(id),
            ReservationUnitId(id),
            max_persons,
            date(1),
            date(7),
        );
        space.add_time(date(1), time(8), time(20));
        space
    }

    fn event(num_persons: Option<u32>, space_ids: &[u32]) -> AllocationEvent {
        let occurrence = AllocationOccurrence {
            id: OccurrenceId(1),
            first_date: date(1),
            begin: time(9),
            end: time(18),
        };
        AllocationEvent {
            id: ApplicationEventId(1),
            occurrences: BTreeMap::from([(occurrence.id, occurrence)]),
            period_start: date(1),
            period_end: date(7),
            space_ids: space_ids.iter().map(|id| SpaceId(*id)).collect::<BTreeSet<_>>(),
            begin: time(9),
            end: time(18),
            min_duration: Duration::minutes(60),
            max_duration: Duration::minutes(60),
            events_per_week: 1,
            num_persons,
        }
    }

    #[test]
    fn person_count_filters_spaces() {
        let spaces = BTreeMap::from([(SpaceId(1), space(1, Some(10)))]);

        let small_group = event(Some(5), &[1]);
        assert_eq!(suitable_spaces(&small_group, &spaces).count(), 1);

        let large_group = event(Some(20), &[1]);
        assert_eq!(suitable_spaces(&large_group, &spaces).count(), 0);

        let unknown_size = event(None, &[1]);
        assert_eq!(suitable_spaces(&unknown_size, &spaces).count(), 1);
    }

    #[test]
    fn window_is_the_intersection() {
        let grid = TimeGrid::new(15).unwrap();
        let space = space(1, None);
        let event = event(None, &[1]);
        let occurrence = event.occurrences[&OccurrenceId(1)];

        // requested 09..18 inside availability 08..20
        let (min_start, max_end) = assignable_window(&occurrence, &space, 4, &grid);
        assert_eq!((min_start, max_end), (36, 72));
    }

    #[test]
    fn closed_date_forces_zero_width_window() {
        let grid = TimeGrid::new(15).unwrap();
        let space = space(1, None);
        let event = event(None, &[1]);
        let mut occurrence = event.occurrences[&OccurrenceId(1)];
        occurrence.first_date = date(2);

        assert_eq!(assignable_window(&occurrence, &space, 4, &grid), (0, 0));
    }

    #[test]
    fn too_short_window_forces_zero_width_window() {
        let grid = TimeGrid::new(15).unwrap();
        let mut space = space(1, None);
        space.add_time(date(1), time(9), time(10));
        let event = event(None, &[1]);
        let occurrence = event.occurrences[&OccurrenceId(1)];

        // 8 units do not fit into the one-hour window
        assert_eq!(assignable_window(&occurrence, &space, 8, &grid), (0, 0));
    }

    #[test]
    fn incompatible_events_generate_no_candidates() {
        let grid = TimeGrid::new(15).unwrap();
        let data = AllocationData {
            period_start: date(1),
            period_end: date(7),
            spaces: BTreeMap::from([(SpaceId(1), space(1, Some(10)))]),
            baskets: BTreeMap::from([(
                seasonal_slot_allocation_model::basket::BasketKey::CatchAll,
                AllocationBasket {
                    kind: BasketKind::CatchAll,
                    events: vec![event(Some(20), &[1])],
                    score: CATCH_ALL_SCORE,
                },
            )]),
            output_basket_ids: vec![],
        };

        let mut vars = ProblemVariables::new();
        assert!(generate_candidates(&data, &grid, &mut vars).is_empty());
    }
}
