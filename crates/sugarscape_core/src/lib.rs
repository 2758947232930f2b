//! # Sugarscape Core
//!
//! The simulation engine for Sugarscape, a discrete-time, grid-based
//! multi-agent foraging model.
//!
//! This crate contains the deterministic simulation logic, including:
//! - The toroidal resource grid (cells, capacity distributions)
//! - Agent lifecycle management (foraging, movement, reproduction, death)
//! - The rule registry (cell rules, agent rules, activation and
//!   termination policies)
//! - The cycle orchestrator and its termination state machine
//! - Metrics collection and structured logging
//!
//! ## Architecture
//!
//! One `Simulation` exclusively owns one `Environment` and one
//! `Population`. Each cycle applies the configured cell rules to every
//! cell, reorders the population by the activation strategy, and applies
//! the configured agent rules to every agent in that order. Seeded RNG
//! (`ChaCha8Rng`) makes runs reproducible.
//!
//! ## Example
//!
//! ```
//! use sugarscape_core::config::AppConfig;
//! use sugarscape_core::simulation::Simulation;
//!
//! let mut config = AppConfig::default();
//! config.environment.size = 20;
//! config.population.initial_size = 10;
//! config.simulation.max_cycle = 5;
//! config.simulation.seed = Some(42);
//!
//! let mut sim = Simulation::from_config(&config).expect("valid configuration");
//! sim.run().expect("run to termination");
//! assert!(sim.cycle() <= 5);
//! ```

/// Agents and their foraging, movement, consumption and reproduction logic
pub mod agent;
/// The atomic resource-bearing grid cell
pub mod cell;
/// Strongly-typed configuration for simulation parameters
pub mod config;
/// The toroidal grid of cells and its spatial queries
pub mod environment;
/// Error taxonomy for simulation state transitions
pub mod error;
/// Performance metrics collection and logging
pub mod metrics;
/// The live-agent collection, death bookkeeping and activation order
pub mod population;
/// The rule registry: cell/agent rules, activation and termination policies
pub mod rules;
/// The cycle orchestrator
pub mod simulation;

pub use error::{Result, SimError};
pub use metrics::{init_logging, Metrics};
pub use rules::{ActivationStrategy, AgentRule, CellRule, TerminationRule};
pub use simulation::{RunState, Simulation};
pub use sugarscape_data::{Coord, Sex};
