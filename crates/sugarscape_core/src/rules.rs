//! The rule registry.
//!
//! Behavior identifiers from the configuration file resolve once, at load
//! time, into these typed rules; the orchestrator holds them as ordered
//! lists and dispatches without any runtime name lookup. The serde
//! `snake_case` names are the identifiers the configuration uses.

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent;
use crate::cell::Cell;
use crate::environment::Environment;
use crate::error::Result;
use crate::population::Population;

/// A per-cell state transition, applied to every cell each cycle.
///
/// The regeneration rules clamp at capacity, so reapplying one to a full
/// cell is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellRule {
    RegenTwoPercent,
    RegenFivePercent,
    RegenTenPercent,
    RegenFull,
}

impl CellRule {
    pub fn apply(self, cell: &mut Cell) -> Result<()> {
        let capacity = cell.capacity();
        let level = match self {
            CellRule::RegenTwoPercent => (cell.level() + 0.02 * capacity).min(capacity),
            CellRule::RegenFivePercent => (cell.level() + 0.05 * capacity).min(capacity),
            CellRule::RegenTenPercent => (cell.level() + 0.10 * capacity).min(capacity),
            CellRule::RegenFull => capacity,
        };
        cell.set_level(level)
    }
}

/// A per-agent behavior, applied in list order to every live agent each
/// cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRule {
    GrowUp,
    EatAll,
    EatHalf,
    EatQuarter,
    EatMetabolism,
    MoveRandom,
    MoveGreedyHighest,
    MoveGreedyLowest,
    MoveSingleStep,
    MoveWelfare,
    MakeAChild,
    ApplyMortality,
}

impl AgentRule {
    pub fn apply<R: Rng>(
        self,
        env: &mut Environment,
        pop: &mut Population,
        id: Uuid,
        rng: &mut R,
    ) -> Result<()> {
        match self {
            AgentRule::GrowUp => agent::grow_up(pop, id),
            AgentRule::EatAll => agent::eat_fraction(env, pop, id, 1.0),
            AgentRule::EatHalf => agent::eat_fraction(env, pop, id, 0.5),
            AgentRule::EatQuarter => agent::eat_fraction(env, pop, id, 0.25),
            AgentRule::EatMetabolism => agent::eat_metabolism(env, pop, id),
            AgentRule::MoveRandom => agent::move_random(env, pop, id, rng),
            AgentRule::MoveGreedyHighest => agent::move_greedy_highest(env, pop, id),
            AgentRule::MoveGreedyLowest => agent::move_greedy_lowest(env, pop, id),
            AgentRule::MoveSingleStep => agent::move_single_step(env, pop, id),
            AgentRule::MoveWelfare => agent::move_welfare(env, pop, id),
            AgentRule::MakeAChild => agent::reproduce(env, pop, id, rng).map(|_| ()),
            AgentRule::ApplyMortality => {
                agent::evaluate_and_apply_mortality(env, pop, id).map(|_| ())
            }
        }
    }
}

/// How the population is reordered before each cycle's agent pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationStrategy {
    /// A uniform random permutation; no agent is structurally favored.
    #[default]
    Random,
    /// Highest-reserve agents activate first: ascending sort by reserve,
    /// then reversed.
    ReserveDescending,
}

/// When an experiment stops. Evaluated before every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationRule {
    /// Stop once the cycle counter reaches the configured budget.
    #[default]
    MaxCycle,
    /// Stop at the cycle budget or as soon as the population is extinct.
    MaxCycleOrExtinction,
}

impl TerminationRule {
    #[must_use]
    pub fn holds(self, cycle: u64, max_cycle: u64, live_count: usize) -> bool {
        match self {
            TerminationRule::MaxCycle => cycle >= max_cycle,
            TerminationRule::MaxCycleOrExtinction => cycle >= max_cycle || live_count == 0,
        }
    }
}
