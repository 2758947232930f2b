//! Sugarscape: a discrete-time, grid-based multi-agent foraging
//! simulation.
//!
//! The engine lives in `sugarscape_core`; this crate adds the process
//! surface around it: the batch experiment runner and the terminal report.

pub mod report;

pub use sugarscape_core::config::AppConfig;
pub use sugarscape_core::{
    init_logging, ActivationStrategy, AgentRule, CellRule, Coord, Metrics, Result, RunState, Sex,
    SimError, Simulation, TerminationRule,
};
