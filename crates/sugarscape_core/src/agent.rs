//! Agents and their decision rules.
//!
//! An agent is a record; the foraging, movement, consumption, mortality and
//! reproduction logic lives in free functions that take the environment and
//! the population explicitly. Ownership stays with the simulation; nothing
//! here holds a back-pointer.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sugarscape_data::{Coord, Sex};
use uuid::Uuid;

use crate::config::PopulationConfig;
use crate::environment::Environment;
use crate::error::{Result, SimError};
use crate::population::Population;

/// The value the uniform reproduction draw must hit for a birth to happen.
pub const REPRODUCTION_TRIGGER: u32 = 1;

/// Offsets of the four distance-1 cardinal neighbors.
const CARDINAL_NEIGHBORS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// A foraging individual: it burns `metabolism` sugar per cycle, sees
/// `vision` cells along the four cardinal rays, carries a bounded sugar
/// reserve, ages, and dies when it cannot cover another cycle or outlives
/// the population's maximum age.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    id: Uuid,
    metabolism: f64,
    vision: u32,
    age: u32,
    sex: Sex,
    reserve: f64,
    position: Coord,
}

impl Agent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        metabolism: f64,
        vision: u32,
        age: u32,
        sex: Sex,
        reserve: f64,
        position: Coord,
        max_reserve: f64,
    ) -> Result<Self> {
        if metabolism <= 0.0 {
            return Err(SimError::invariant(
                "agent metabolism must be strictly positive",
            ));
        }
        if vision == 0 {
            return Err(SimError::invariant("agent vision must be strictly positive"));
        }
        let mut agent = Self {
            id,
            metabolism,
            vision,
            age,
            sex,
            reserve: 0.0,
            position,
        };
        agent.set_reserve(reserve, max_reserve)?;
        Ok(agent)
    }

    /// Samples a fresh agent from the population bounds: integer vision and
    /// initial age, real metabolism, reserve equal to its own metabolism.
    pub fn sample_with_rng<R: Rng>(
        props: &PopulationConfig,
        position: Coord,
        rng: &mut R,
    ) -> Result<Self> {
        let id = Uuid::from_u128(rng.gen());
        let vision = rng.gen_range(props.min_vision..=props.max_vision);
        let metabolism = rng.gen_range(props.min_metabolism..=props.max_metabolism);
        let age = rng.gen_range(props.min_initial_age..=props.max_age);
        let sex = if rng.gen::<bool>() {
            Sex::Female
        } else {
            Sex::Male
        };
        Self::new(
            id,
            metabolism,
            vision,
            age,
            sex,
            metabolism,
            position,
            props.max_reserve,
        )
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn metabolism(&self) -> f64 {
        self.metabolism
    }

    #[must_use]
    pub fn vision(&self) -> u32 {
        self.vision
    }

    #[must_use]
    pub fn age(&self) -> u32 {
        self.age
    }

    #[must_use]
    pub fn sex(&self) -> Sex {
        self.sex
    }

    #[must_use]
    pub fn reserve(&self) -> f64 {
        self.reserve
    }

    #[must_use]
    pub fn position(&self) -> Coord {
        self.position
    }

    /// Sets the reserve. Fails if negative or above the population ceiling.
    pub fn set_reserve(&mut self, reserve: f64, max_reserve: f64) -> Result<()> {
        if reserve < 0.0 {
            return Err(SimError::invariant("agent reserve cannot be negative"));
        }
        if reserve > max_reserve {
            return Err(SimError::invariant(format!(
                "agent reserve {reserve} exceeds population ceiling {max_reserve}"
            )));
        }
        self.reserve = reserve;
        Ok(())
    }

    pub fn set_age(&mut self, age: u32) {
        self.age = age;
    }

    pub(crate) fn set_position(&mut self, position: Coord) {
        self.position = position;
    }

    /// A reserve at the population ceiling marks the agent as saturated.
    #[must_use]
    pub fn is_saturated(&self, max_reserve: f64) -> bool {
        self.reserve >= max_reserve
    }

    /// Search radius for this cycle: a saturated agent is slowed down to a
    /// single cell, everyone else uses their full vision.
    #[must_use]
    pub fn effective_vision(&self, max_reserve: f64) -> u32 {
        if self.is_saturated(max_reserve) {
            1
        } else {
            self.vision
        }
    }
}

/// Whether `position` is a legal move target for `agent` this cycle: the
/// cell is vacant and its sugar plus the agent's reserve covers one cycle
/// of metabolism.
fn can_move_to(env: &Environment, agent: &Agent, position: Coord) -> bool {
    let cell = env.cell_at(position);
    !cell.is_occupied() && cell.level() + agent.reserve() >= agent.metabolism()
}

/// Every coordinate the agent could move to this cycle, along the four
/// cardinal rays out to its effective vision. The agent's own cell is never
/// listed. For each offset the x-axis candidate precedes the y-axis one;
/// greedy tie-breaking depends on this order.
#[must_use]
pub fn reachable_positions(env: &Environment, props: &PopulationConfig, agent: &Agent) -> Vec<Coord> {
    let vision = i64::from(agent.effective_vision(props.max_reserve));
    let pos = agent.position();
    let mut positions = Vec::new();
    for step in -vision..=vision {
        if step == 0 {
            continue;
        }
        for candidate in [pos.offset(step, 0), pos.offset(0, step)] {
            let candidate = env.wrap(candidate);
            if can_move_to(env, agent, candidate) {
                positions.push(candidate);
            }
        }
    }
    positions
}

/// Transfers up to `amount` sugar from the occupied cell to the agent.
///
/// Metabolism is paid first, the remainder tops the reserve up to the
/// population ceiling, and any excess beyond the ceiling stays on the cell;
/// the combined cell-plus-reserve total never increases. When even the
/// reserve cannot cover metabolism the call is a no-op and the mortality
/// check claims the agent later in the cycle.
pub fn consume(env: &mut Environment, pop: &mut Population, id: Uuid, amount: f64) -> Result<()> {
    let max_reserve = pop.props().max_reserve;
    let agent = pop.agent(id).ok_or(SimError::UnknownAgent(id))?;
    let position = agent.position();
    let metabolism = agent.metabolism();
    let reserve = agent.reserve();
    let cell_level = env.cell_at(position).level();

    let take = amount.max(0.0).min(cell_level);
    if take + reserve < metabolism {
        return Ok(());
    }
    let after_upkeep = take + reserve - metabolism;
    let new_reserve = after_upkeep.min(max_reserve);
    let overflow = after_upkeep - new_reserve;
    env.cell_at_mut(position)
        .set_level(cell_level - take + overflow)?;
    pop.agent_mut(id)
        .ok_or(SimError::UnknownAgent(id))?
        .set_reserve(new_reserve, max_reserve)?;
    Ok(())
}

/// Moves the agent to `target`: vacates the source cell, claims the target
/// cell, updates the position. Fails with `OccupiedTarget` when the cell
/// already holds an agent: movement rules pre-filter for vacancy, so that
/// is a rule bug.
pub fn move_to(env: &mut Environment, pop: &mut Population, id: Uuid, target: Coord) -> Result<()> {
    let target = env.wrap(target);
    if env.cell_at(target).is_occupied() {
        return Err(SimError::OccupiedTarget { target });
    }
    let agent = pop.agent_mut(id).ok_or(SimError::UnknownAgent(id))?;
    let source = agent.position();
    agent.set_position(target);
    env.cell_at_mut(source).set_occupant(None);
    env.cell_at_mut(target).set_occupant(Some(id));
    Ok(())
}

/// Liveness check with its documented side effect: an agent that cannot
/// cover one more cycle (`cell level + reserve < metabolism`) or has
/// outlived the maximum age is removed from the population, its cell is
/// vacated and the dead counter moves, all before this returns. Returns
/// whether the agent survived.
pub fn evaluate_and_apply_mortality(
    env: &mut Environment,
    pop: &mut Population,
    id: Uuid,
) -> Result<bool> {
    let max_age = pop.props().max_age;
    let agent = pop.agent(id).ok_or(SimError::UnknownAgent(id))?;
    let position = agent.position();
    let cell = env.cell_at(position);
    let alive =
        cell.level() + agent.reserve() >= agent.metabolism() && agent.age() <= max_age;
    if !alive {
        pop.remove(id);
        env.cell_at_mut(position).set_occupant(None);
        pop.record_death();
        tracing::debug!(agent = %id, "agent died");
    }
    Ok(alive)
}

/// Whether an opposite-sex agent stands on one of the four distance-1
/// cardinal neighbors.
fn opposite_sex_adjacent(env: &Environment, pop: &Population, agent: &Agent) -> bool {
    let pos = agent.position();
    CARDINAL_NEIGHBORS.iter().any(|&(dx, dy)| {
        env.cell_at(pos.offset(dx, dy))
            .occupant()
            .and_then(|other_id| pop.agent(other_id))
            .map_or(false, |other| other.sex() == agent.sex().opposite())
    })
}

/// Asexual single-parent reproduction.
///
/// All gates must hold: the parent's age sits in the reproduction window,
/// an opposite-sex agent stands on an adjacent cell, the uniform draw over
/// the configured chance window hits the trigger value, the population is
/// below its maximum, and a free cell exists for the newborn. The offspring
/// inherits metabolism and vision, starts at age 0 with an empty reserve on
/// a random unoccupied cell, and is appended to the population; the
/// parent's reserve drops to zero as the cost of reproduction.
pub fn reproduce<R: Rng>(
    env: &mut Environment,
    pop: &mut Population,
    id: Uuid,
    rng: &mut R,
) -> Result<Option<Uuid>> {
    let props = pop.props().clone();
    let agent = pop.agent(id).ok_or(SimError::UnknownAgent(id))?;
    let in_window =
        agent.age() >= props.min_reproduction_age && agent.age() <= props.max_reproduction_age;
    if !in_window || !opposite_sex_adjacent(env, pop, agent) {
        return Ok(None);
    }
    let draw = rng.gen_range(props.reproduction_chance_min..=props.reproduction_chance_max);
    if draw != REPRODUCTION_TRIGGER || pop.len() >= props.max_size {
        return Ok(None);
    }
    let Some(birthplace) = env.random_unoccupied_coordinate(rng) else {
        tracing::debug!(parent = %id, "no free cell for offspring");
        return Ok(None);
    };
    let parent = pop.agent(id).ok_or(SimError::UnknownAgent(id))?;
    let metabolism = parent.metabolism();
    let vision = parent.vision();
    let sex = if rng.gen::<bool>() {
        Sex::Female
    } else {
        Sex::Male
    };
    let child = Agent::new(
        Uuid::from_u128(rng.gen()),
        metabolism,
        vision,
        0,
        sex,
        0.0,
        birthplace,
        props.max_reserve,
    )?;
    let child_id = child.id();
    env.cell_at_mut(birthplace).set_occupant(Some(child_id));
    pop.push(child);
    pop.agent_mut(id)
        .ok_or(SimError::UnknownAgent(id))?
        .set_reserve(0.0, props.max_reserve)?;
    tracing::debug!(parent = %id, child = %child_id, "agent born");
    Ok(Some(child_id))
}

// ---------------------------------------------------------------------------
// Movement helpers for the single-step rule
// ---------------------------------------------------------------------------

/// One straight-line step from `from` toward `target`, along whichever axis
/// differs. Direction follows the raw coordinate delta (stored positions
/// are already wrapped), so the walk may take the long way around the torus.
fn step_toward(env: &Environment, from: Coord, target: Coord) -> Coord {
    let dx = from.x - target.x;
    let dy = from.y - target.y;
    if dx == 0 {
        let step = if dy < 0 { 1 } else { -1 };
        env.wrap(from.offset(0, step))
    } else {
        let step = if dx < 0 { 1 } else { -1 };
        env.wrap(from.offset(step, 0))
    }
}

/// Reserve plus every cell level collectible on the straight path toward
/// `target`, minus the metabolism burned per step. The sum starts at the
/// agent's own cell and stops one short of the target.
fn projected_gain(env: &Environment, agent: &Agent, target: Coord) -> f64 {
    let pos = agent.position();
    let dx = pos.x - target.x;
    let dy = pos.y - target.y;
    let mut gain = agent.reserve();
    let steps;
    if dx == 0 {
        steps = dy.abs();
        let step = if dy < 0 { 1 } else { -1 };
        for i in 0..steps {
            gain += env.cell_at(pos.offset(0, step * i)).level();
        }
    } else {
        steps = dx.abs();
        let step = if dx < 0 { 1 } else { -1 };
        for i in 0..steps {
            gain += env.cell_at(pos.offset(step * i, 0)).level();
        }
    }
    gain - agent.metabolism() * steps as f64
}

/// Whether another agent could claim `target` first: it sees the cell as
/// reachable and sits strictly closer by straight-line distance.
fn faster_rival_exists(env: &Environment, pop: &Population, agent: &Agent, target: Coord) -> bool {
    let own_distance = agent.position().distance(target);
    pop.live_agents().iter().any(|other| {
        other.id() != agent.id()
            && reachable_positions(env, pop.props(), other).contains(&target)
            && other.position().distance(target) < own_distance
    })
}

/// A target is worth a step when the immediate next cell is vacant, no
/// faster rival contends for it, and the projected net gain is positive.
fn worth_stepping_toward(
    env: &Environment,
    pop: &Population,
    agent: &Agent,
    target: Coord,
) -> bool {
    let next = step_toward(env, agent.position(), target);
    !env.cell_at(next).is_occupied()
        && !faster_rival_exists(env, pop, agent, target)
        && projected_gain(env, agent, target) > 0.0
}

/// Average reserve of the agents inside the 6x6 block around `center`
/// (offsets -3..=2 on both axes, wrapped). Zero when the block holds no
/// agents.
fn block_average_reserve(env: &Environment, pop: &Population, center: Coord) -> f64 {
    let mut total = 0.0;
    let mut found = 0u32;
    for dy in -3..=2_i64 {
        for dx in -3..=2_i64 {
            if let Some(other) = env
                .cell_at(center.offset(dx, dy))
                .occupant()
                .and_then(|other_id| pop.agent(other_id))
            {
                total += other.reserve();
                found += 1;
            }
        }
    }
    if found == 0 {
        0.0
    } else {
        total / f64::from(found)
    }
}

// ---------------------------------------------------------------------------
// Agent rule bodies (dispatched from `rules::AgentRule`)
// ---------------------------------------------------------------------------

/// Ages the agent by one cycle; a no-op once past the maximum age.
pub(crate) fn grow_up(pop: &mut Population, id: Uuid) -> Result<()> {
    let max_age = pop.props().max_age;
    let agent = pop.agent_mut(id).ok_or(SimError::UnknownAgent(id))?;
    if agent.age() <= max_age {
        agent.set_age(agent.age() + 1);
    }
    Ok(())
}

/// Consumes the given fraction of the occupied cell's sugar.
pub(crate) fn eat_fraction(
    env: &mut Environment,
    pop: &mut Population,
    id: Uuid,
    fraction: f64,
) -> Result<()> {
    let agent = pop.agent(id).ok_or(SimError::UnknownAgent(id))?;
    let amount = env.cell_at(agent.position()).level() * fraction;
    consume(env, pop, id, amount)
}

/// Consumes exactly one cycle's worth of metabolism.
pub(crate) fn eat_metabolism(env: &mut Environment, pop: &mut Population, id: Uuid) -> Result<()> {
    let amount = pop
        .agent(id)
        .ok_or(SimError::UnknownAgent(id))?
        .metabolism();
    consume(env, pop, id, amount)
}

/// Moves to a uniformly chosen reachable position; a no-op when none exist.
pub(crate) fn move_random<R: Rng>(
    env: &mut Environment,
    pop: &mut Population,
    id: Uuid,
    rng: &mut R,
) -> Result<()> {
    let agent = pop.agent(id).ok_or(SimError::UnknownAgent(id))?;
    let candidates = reachable_positions(env, pop.props(), agent);
    if candidates.is_empty() {
        return Ok(());
    }
    let target = candidates[rng.gen_range(0..candidates.len())];
    move_to(env, pop, id, target)
}

/// Moves to the reachable position with the highest sugar level; the first
/// candidate seen wins on ties.
pub(crate) fn move_greedy_highest(
    env: &mut Environment,
    pop: &mut Population,
    id: Uuid,
) -> Result<()> {
    let agent = pop.agent(id).ok_or(SimError::UnknownAgent(id))?;
    let candidates = reachable_positions(env, pop.props(), agent);
    match env.max_level_among(&candidates) {
        Some(target) => move_to(env, pop, id, target),
        None => Ok(()),
    }
}

/// Moves to the reachable position with the lowest sugar level; the first
/// candidate seen wins on ties.
pub(crate) fn move_greedy_lowest(
    env: &mut Environment,
    pop: &mut Population,
    id: Uuid,
) -> Result<()> {
    let agent = pop.agent(id).ok_or(SimError::UnknownAgent(id))?;
    let candidates = reachable_positions(env, pop.props(), agent);
    let mut best: Option<(Coord, f64)> = None;
    for &coord in &candidates {
        let level = env.cell_at(coord).level();
        match best {
            Some((_, best_level)) if level >= best_level => {}
            _ => best = Some((coord, level)),
        }
    }
    match best {
        Some((target, _)) => move_to(env, pop, id, target),
        None => Ok(()),
    }
}

/// Walks one grid step toward the best worthwhile target, trying candidates
/// in descending order of sugar level and falling through to the next when
/// a target is contested, blocked, or not profitable.
pub(crate) fn move_single_step(
    env: &mut Environment,
    pop: &mut Population,
    id: Uuid,
) -> Result<()> {
    let agent = pop.agent(id).ok_or(SimError::UnknownAgent(id))?;
    let mut candidates = reachable_positions(env, pop.props(), agent);
    if candidates.is_empty() {
        return Ok(());
    }
    env.sort_by_descending_level(&mut candidates);
    let next = candidates
        .iter()
        .find(|&&target| worth_stepping_toward(env, pop, agent, target))
        .map(|&target| step_toward(env, agent.position(), target));
    match next {
        Some(step) => move_to(env, pop, id, step),
        None => Ok(()),
    }
}

/// Moves to the first reachable position whose neighborhood average reserve
/// beats the agent's own; falls back to the greedy-highest rule when no
/// neighborhood qualifies.
pub(crate) fn move_welfare(env: &mut Environment, pop: &mut Population, id: Uuid) -> Result<()> {
    let agent = pop.agent(id).ok_or(SimError::UnknownAgent(id))?;
    let candidates = reachable_positions(env, pop.props(), agent);
    let reserve = agent.reserve();
    let target = candidates
        .iter()
        .copied()
        .find(|&candidate| block_average_reserve(env, pop, candidate) > reserve);
    match target {
        Some(target) => move_to(env, pop, id, target),
        None => move_greedy_highest(env, pop, id),
    }
}
