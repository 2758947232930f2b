use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sugarscape_data::Coord;

use crate::agent::Agent;
use crate::config::AppConfig;
use crate::environment::Environment;
use crate::error::{Result, SimError};
use crate::population::Population;
use crate::rules::{ActivationStrategy, AgentRule, CellRule, TerminationRule};

/// Where a run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Terminated,
}

/// One experiment: an environment and a population driven cycle by cycle
/// under ordered rule lists.
///
/// Each cycle applies every cell rule (in list order) to every cell, then
/// reorders the population by the activation strategy and applies every
/// agent rule (in list order) to every agent in that order. The termination
/// rule is evaluated before each cycle. The simulation exclusively owns its
/// environment and population; external drivers only read state and call
/// [`Simulation::advance`].
#[derive(Debug)]
pub struct Simulation {
    environment: Environment,
    population: Population,
    cell_rules: Vec<CellRule>,
    agent_rules: Vec<AgentRule>,
    activation: ActivationStrategy,
    termination: TerminationRule,
    max_cycle: u64,
    cycle: u64,
    state: RunState,
    rng: ChaCha8Rng,
}

impl Simulation {
    /// Composes a simulation from pre-built parts. The caller is
    /// responsible for a consistent starting state (cell occupants matching
    /// agent positions); [`Simulation::from_config`] is the usual entry
    /// point.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        environment: Environment,
        population: Population,
        cell_rules: Vec<CellRule>,
        agent_rules: Vec<AgentRule>,
        activation: ActivationStrategy,
        termination: TerminationRule,
        max_cycle: u64,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            environment,
            population,
            cell_rules,
            agent_rules,
            activation,
            termination,
            max_cycle,
            cycle: 0,
            state: RunState::Idle,
            rng,
        }
    }

    /// Builds a ready-to-run simulation from configuration: grid, capacity
    /// distributions, initial sugar levels, initial population placement.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut rng = match config.simulation.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut environment =
            Environment::new(config.environment.size, config.environment.max_capacity)?;
        for distribution in &config.environment.distributions {
            environment.add_capacity_gaussian(
                distribution.peak_factor,
                Coord::new(distribution.center_x, distribution.center_y),
                distribution.dispersion,
            );
        }
        environment.set_all_levels_to_capacity()?;

        let mut population = Population::new(config.population.clone());
        for _ in 0..config.population.initial_size {
            let position = environment
                .random_unoccupied_coordinate(&mut rng)
                .ok_or_else(|| {
                    SimError::invariant("initial population does not fit the grid")
                })?;
            let agent = Agent::sample_with_rng(&config.population, position, &mut rng)?;
            environment
                .cell_at_mut(position)
                .set_occupant(Some(agent.id()));
            population.push(agent);
        }

        tracing::info!(
            fingerprint = %config.fingerprint(),
            size = config.environment.size,
            agents = population.len(),
            "simulation ready"
        );

        Ok(Self {
            environment,
            population,
            cell_rules: config.simulation.cell_rules.clone(),
            agent_rules: config.simulation.agent_rules.clone(),
            activation: config.simulation.activation,
            termination: config.simulation.termination,
            max_cycle: config.simulation.max_cycle,
            cycle: 0,
            state: RunState::Idle,
            rng,
        })
    }

    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    #[must_use]
    pub fn max_cycle(&self) -> u64 {
        self.max_cycle
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Enters `Running` with the cycle counter reset.
    pub fn start(&mut self) {
        self.cycle = 0;
        self.state = RunState::Running;
    }

    /// Evaluates the termination rule and, while it does not hold, performs
    /// one full cycle. Returns whether the simulation is still running;
    /// interactive drivers call this once per frame, batch runs loop on it.
    pub fn advance(&mut self) -> Result<bool> {
        if self.state != RunState::Running {
            return Ok(false);
        }
        if self
            .termination
            .holds(self.cycle, self.max_cycle, self.population.len())
        {
            self.state = RunState::Terminated;
            return Ok(false);
        }
        self.run_one_cycle()?;
        // The counter only moves here, and only forward.
        self.cycle += 1;
        Ok(true)
    }

    /// Runs the experiment to termination.
    pub fn run(&mut self) -> Result<()> {
        self.start();
        while self.advance()? {}
        Ok(())
    }

    fn run_one_cycle(&mut self) -> Result<()> {
        for rule in &self.cell_rules {
            self.environment.apply_rule_to_all_cells(*rule)?;
        }
        self.population.reorder(self.activation, &mut self.rng);
        for rule in &self.agent_rules {
            self.population
                .apply_rule_to_all(&mut self.environment, *rule, &mut self.rng)?;
        }
        Ok(())
    }
}
