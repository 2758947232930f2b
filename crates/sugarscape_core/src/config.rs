//! Configuration management for simulation parameters.
//!
//! Strongly-typed structures that map to the `config.toml` file. Rule and
//! strategy names in the file deserialize straight into the registry enums,
//! so by the time a config exists the rules are resolved; the engine never
//! interprets rule-name strings at runtime.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [environment]
//! size = 50
//! max_capacity = 4.0
//!
//! [[environment.distributions]]
//! peak_factor = 1.0
//! center_x = 12
//! center_y = 12
//! dispersion = 8.0
//!
//! [population]
//! initial_size = 100
//!
//! [simulation]
//! max_cycle = 500
//! agent_rules = ["grow_up", "move_greedy_highest", "eat_all", "apply_mortality"]
//! ```

use serde::{Deserialize, Serialize};

use crate::rules::{ActivationStrategy, AgentRule, CellRule, TerminationRule};

/// One Gaussian capacity source: `peak_factor` scales the environment's
/// maximum capacity, `dispersion` controls the spread around the center.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GaussianConfig {
    pub peak_factor: f64,
    pub center_x: i64,
    pub center_y: i64,
    pub dispersion: f64,
}

/// Grid-level configuration: dimensions, the global capacity ceiling, and
/// the capacity distributions applied once at setup.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EnvironmentConfig {
    pub size: usize,
    pub max_capacity: f64,
    pub distributions: Vec<GaussianConfig>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            size: 50,
            max_capacity: 4.0,
            distributions: vec![
                GaussianConfig {
                    peak_factor: 1.0,
                    center_x: 12,
                    center_y: 12,
                    dispersion: 8.0,
                },
                GaussianConfig {
                    peak_factor: 1.0,
                    center_x: 37,
                    center_y: 37,
                    dispersion: 8.0,
                },
            ],
        }
    }
}

/// Population-wide bounds: agent sampling ranges, the reserve ceiling, and
/// the reproduction gates.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PopulationConfig {
    pub initial_size: usize,
    pub max_size: usize,
    pub min_metabolism: f64,
    pub max_metabolism: f64,
    pub min_vision: u32,
    pub max_vision: u32,
    pub min_initial_age: u32,
    pub max_age: u32,
    pub max_reserve: f64,
    pub min_reproduction_age: u32,
    pub max_reproduction_age: u32,
    pub reproduction_chance_min: u32,
    pub reproduction_chance_max: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_size: 100,
            max_size: 400,
            min_metabolism: 1.0,
            max_metabolism: 4.0,
            min_vision: 1,
            max_vision: 6,
            min_initial_age: 0,
            max_age: 80,
            max_reserve: 100.0,
            min_reproduction_age: 18,
            max_reproduction_age: 50,
            reproduction_chance_min: 1,
            reproduction_chance_max: 5,
        }
    }
}

/// Experiment wiring: the ordered rule lists, the activation and
/// termination policies, the cycle budget, and the RNG seed.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SimulationConfig {
    pub max_cycle: u64,
    pub seed: Option<u64>,
    pub cell_rules: Vec<CellRule>,
    pub agent_rules: Vec<AgentRule>,
    pub activation: ActivationStrategy,
    pub termination: TerminationRule,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_cycle: 500,
            seed: None,
            cell_rules: vec![CellRule::RegenFivePercent],
            agent_rules: vec![
                AgentRule::GrowUp,
                AgentRule::MoveGreedyHighest,
                AgentRule::EatAll,
                AgentRule::MakeAChild,
                AgentRule::ApplyMortality,
            ],
            activation: ActivationStrategy::Random,
            termination: TerminationRule::MaxCycleOrExtinction,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AppConfig {
    pub environment: EnvironmentConfig,
    pub population: PopulationConfig,
    pub simulation: SimulationConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a
    /// description of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        // Environment validation
        anyhow::ensure!(self.environment.size > 0, "Grid size must be positive");
        anyhow::ensure!(
            self.environment.size <= 1000,
            "Grid size too large (max 1000)"
        );
        anyhow::ensure!(
            self.environment.max_capacity >= 0.0,
            "Max capacity must be non-negative"
        );
        for distribution in &self.environment.distributions {
            anyhow::ensure!(
                distribution.peak_factor >= 0.0,
                "Distribution peak factor must be non-negative"
            );
            anyhow::ensure!(
                distribution.dispersion > 0.0,
                "Distribution dispersion must be positive"
            );
        }

        // Population validation
        let cells = self.environment.size * self.environment.size;
        anyhow::ensure!(
            self.population.initial_size <= cells,
            "Initial population does not fit the grid"
        );
        anyhow::ensure!(
            self.population.min_metabolism > 0.0,
            "Min metabolism must be positive"
        );
        anyhow::ensure!(
            self.population.min_metabolism <= self.population.max_metabolism,
            "Metabolism bounds must be ordered"
        );
        anyhow::ensure!(self.population.min_vision > 0, "Min vision must be positive");
        anyhow::ensure!(
            self.population.min_vision <= self.population.max_vision,
            "Vision bounds must be ordered"
        );
        anyhow::ensure!(
            self.population.min_initial_age <= self.population.max_age,
            "Initial age window must sit below the maximum age"
        );
        anyhow::ensure!(
            self.population.max_reserve >= self.population.max_metabolism,
            "Reserve ceiling must fit a newborn's reserve (its metabolism)"
        );
        anyhow::ensure!(
            self.population.min_reproduction_age <= self.population.max_reproduction_age,
            "Reproduction age window must be ordered"
        );
        anyhow::ensure!(
            self.population.reproduction_chance_min <= self.population.reproduction_chance_max,
            "Reproduction chance window must be ordered"
        );

        // Simulation validation
        anyhow::ensure!(
            !self.simulation.agent_rules.is_empty() || !self.simulation.cell_rules.is_empty(),
            "At least one rule must be configured"
        );

        Ok(())
    }

    /// Loads and validates configuration from TOML content.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// A stable hash over the behavioral parameters, logged at run start so
    /// experiments are attributable to an exact configuration.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.environment).as_bytes());
        hasher.update(format!("{:?}", self.population).as_bytes());
        hasher.update(format!("{:?}", self.simulation).as_bytes());
        hex::encode(hasher.finalize())
    }
}
