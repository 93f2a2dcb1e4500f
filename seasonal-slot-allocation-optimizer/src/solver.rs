//! Builds one mixed-integer program for a round and decodes the optimal
//! assignment. Priorities enter as linear objective weights, not as solve
//! order: every basket competes in the same model.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Datelike;
use good_lp::{
    constraint, default_solver, variable, Constraint, Expression, ProblemVariables, Solution,
    SolverModel, Variable,
};
use itertools::Itertools;
use seasonal_slot_allocation_model::basket::BasketKey;
use seasonal_slot_allocation_model::data::{AllocatedEvent, AllocationData};
use seasonal_slot_allocation_model::ids::SpaceId;
use tracing::{debug, info, warn};

use crate::candidates::{generate_candidates, Candidate};
use crate::error::AllocationError;
use crate::grid::TimeGrid;

/// How `events_per_week` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyCap {
    /// Caps the total number of assigned occurrences of an event over the
    /// whole round.
    #[default]
    PerRound,
    /// Caps assigned occurrences per ISO calendar week, the literal reading
    /// of the field name.
    PerCalendarWeek,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverOptions {
    /// Width of one grid step in minutes. Must divide a day.
    pub precision_minutes: u32,
    pub frequency_cap: FrequencyCap,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self { precision_minutes: 15, frequency_cap: FrequencyCap::PerRound }
    }
}

/// A pairwise disjunction between two candidates on the same space: the
/// order binary decides which one goes first whenever both are selected.
struct OverlapPair {
    left: usize,
    right: usize,
    order: Variable,
}

pub struct AllocationSolver {
    data: AllocationData,
    options: SolverOptions,
}

impl AllocationSolver {
    #[must_use]
    pub fn new(data: AllocationData) -> Self {
        Self::with_options(data, SolverOptions::default())
    }

    #[must_use]
    pub const fn with_options(data: AllocationData, options: SolverOptions) -> Self {
        Self { data, options }
    }

    /// Runs one full solve over the round.
    ///
    /// Returns the allocations of an optimal solution, filtered to the
    /// requested output baskets. An infeasible model or a solver that gives
    /// up without proving optimality yields an empty list, not an error;
    /// only malformed input errors.
    pub fn solve(&self) -> Result<Vec<AllocatedEvent>, AllocationError> {
        self.data.validate()?;
        let grid = TimeGrid::new(self.options.precision_minutes)?;
        let started = Instant::now();

        let mut vars = ProblemVariables::new();
        let candidates = generate_candidates(&self.data, &grid, &mut vars);
        if candidates.is_empty() {
            info!("no assignable candidates, nothing to solve");
            return Ok(Vec::new());
        }
        let pairs = overlap_pairs(&candidates, &mut vars);

        let objective = candidates
            .iter()
            .fold(Expression::from(0.0), |acc, candidate| {
                acc + candidate.weight * candidate.selected
            });

        let mut model = vars.maximise(objective).using(default_solver);
        model = with_all(model, single_space_per_occurrence(&candidates));
        model = with_all(model, single_assignment_per_occurrence(&candidates));
        model = with_all(model, events_per_week(&candidates, self.options.frequency_cap));
        model = with_all(model, assignable_windows(&candidates));
        model = with_all(model, no_overlap(&candidates, &pairs, &grid));

        match model.solve() {
            Ok(solution) => {
                let allocations = self.decode(&candidates, &solution, &grid);
                info!(
                    "solved {} candidates, {} disjunction pairs in {:?}: {} allocations",
                    candidates.len(),
                    pairs.len(),
                    started.elapsed(),
                    allocations.len()
                );
                Ok(allocations)
            }
            Err(error) => {
                warn!("solver finished without an optimal solution: {error}");
                Ok(Vec::new())
            }
        }
    }

    fn decode(
        &self,
        candidates: &[Candidate],
        solution: &impl Solution,
        grid: &TimeGrid,
    ) -> Vec<AllocatedEvent> {
        let mut total_cost = 0.0;
        let mut allocations = Vec::new();
        for candidate in candidates {
            if solution.value(candidate.selected) < 0.5 {
                continue;
            }
            total_cost += candidate.weight;
            if !self.in_output(candidate.basket) {
                continue;
            }
            #[allow(clippy::cast_possible_truncation)]
            let start_unit = solution.value(candidate.start).round() as i64;
            debug!(
                "space {} assigned to application event {} occurrence {} under basket {}",
                candidate.space, candidate.event, candidate.occurrence, candidate.basket
            );
            allocations.push(AllocatedEvent {
                space: candidate.space,
                event: candidate.event,
                occurrence: candidate.occurrence,
                basket: candidate.basket,
                begin: grid.time_of(start_unit),
                end: grid.time_of(start_unit + candidate.duration),
                duration: grid.duration_of(candidate.duration),
            });
        }
        info!("total cost {total_cost}");
        allocations
    }

    fn in_output(&self, basket: BasketKey) -> bool {
        self.data.output_basket_ids.is_empty()
            || matches!(basket, BasketKey::Named(id) if self.data.output_basket_ids.contains(&id))
    }
}

fn with_all<M: SolverModel>(model: M, constraints: Vec<Constraint>) -> M {
    constraints.into_iter().fold(model, SolverModel::with)
}

fn selection_sum(candidates: &[Candidate], members: &[usize]) -> Expression {
    members
        .iter()
        .fold(Expression::from(0.0), |acc, index| acc + candidates[*index].selected)
}

/// Ordering binaries for every pair of performable candidates sharing a
/// space. Candidates whose window is already zero width cannot be selected
/// and need no disjunction.
fn overlap_pairs(candidates: &[Candidate], vars: &mut ProblemVariables) -> Vec<OverlapPair> {
    let by_space: BTreeMap<SpaceId, Vec<usize>> = (0..candidates.len())
        .into_group_map_by(|index| candidates[*index].space)
        .into_iter()
        .collect();

    let mut pairs = Vec::new();
    for members in by_space.into_values() {
        for (left, right) in members.into_iter().tuple_combinations() {
            if !candidates[left].window_fits() || !candidates[right].window_fits() {
                continue;
            }
            let order =
                vars.add(variable().binary().name(format!("ord_{left}_{right}")));
            pairs.push(OverlapPair { left, right, order });
        }
    }
    pairs
}

/// Each occurrence is assigned to at most one space within a basket.
fn single_space_per_occurrence(candidates: &[Candidate]) -> Vec<Constraint> {
    let groups: BTreeMap<_, Vec<usize>> = (0..candidates.len())
        .into_group_map_by(|index| {
            let candidate = &candidates[*index];
            (candidate.basket, candidate.event, candidate.occurrence)
        })
        .into_iter()
        .collect();
    groups
        .into_values()
        .map(|members| constraint!(selection_sum(candidates, &members) <= 1.0))
        .collect()
}

/// The same occurrence may surface in several baskets; at most one of those
/// copies wins globally, so nothing is double-booked through two basket
/// memberships.
fn single_assignment_per_occurrence(candidates: &[Candidate]) -> Vec<Constraint> {
    let groups: BTreeMap<_, Vec<usize>> = (0..candidates.len())
        .into_group_map_by(|index| candidates[*index].occurrence)
        .into_iter()
        .collect();
    groups
        .into_values()
        .map(|members| constraint!(selection_sum(candidates, &members) <= 1.0))
        .collect()
}

/// No more than the requested events per week are allocated, aggregated
/// over every basket the event appears in.
fn events_per_week(candidates: &[Candidate], cap: FrequencyCap) -> Vec<Constraint> {
    let groups: Vec<Vec<usize>> = match cap {
        FrequencyCap::PerRound => (0..candidates.len())
            .into_group_map_by(|index| candidates[*index].event)
            .into_iter()
            .collect::<BTreeMap<_, _>>()
            .into_values()
            .collect(),
        FrequencyCap::PerCalendarWeek => (0..candidates.len())
            .into_group_map_by(|index| {
                let candidate = &candidates[*index];
                let week = candidate.first_date.iso_week();
                (candidate.event, week.year(), week.week())
            })
            .into_iter()
            .collect::<BTreeMap<_, _>>()
            .into_values()
            .collect(),
    };

    groups
        .into_iter()
        .map(|members| {
            let limit = f64::from(candidates[members[0]].events_per_week);
            constraint!(selection_sum(candidates, &members) <= limit)
        })
        .collect()
}

/// Candidates whose window cannot hold the minimum duration are never
/// performed. Feasible candidates already carry their window as variable
/// bounds.
fn assignable_windows(candidates: &[Candidate]) -> Vec<Constraint> {
    candidates
        .iter()
        .filter(|candidate| !candidate.window_fits())
        .map(|candidate| constraint!(candidate.selected <= 0.0))
        .collect()
}

/// Two intervals on the same space must not overlap in time, enforced as a
/// big-M disjunction per pair. M is one day in grid units, enough to
/// release a constraint whenever either boolean is off or the order binary
/// points the other way.
#[allow(clippy::cast_precision_loss)]
fn no_overlap(
    candidates: &[Candidate],
    pairs: &[OverlapPair],
    grid: &TimeGrid,
) -> Vec<Constraint> {
    let m = grid.units_per_day() as f64;
    let mut constraints = Vec::with_capacity(pairs.len() * 2);
    for pair in pairs {
        let left = &candidates[pair.left];
        let right = &candidates[pair.right];
        let left_first_limit = 3.0 * m - left.duration as f64;
        let right_first_limit = 2.0 * m - right.duration as f64;
        let released = m * left.selected + m * right.selected;
        constraints.push(constraint!(
            Expression::from(left.start) - right.start + m * pair.order + released.clone()
                <= left_first_limit
        ));
        constraints.push(constraint!(
            Expression::from(right.start) - left.start - m * pair.order + released
                <= right_first_limit
        ));
    }
    constraints
}
