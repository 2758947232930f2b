//! Terminal report over a finished experiment.
//!
//! Everything here reads the core's observation surface; nothing mutates
//! simulation state.

use std::fmt::Write;

use serde::Serialize;
use sugarscape_core::simulation::Simulation;
use sugarscape_data::Sex;

/// Machine-readable run summary for the `--json` output.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub cycle: u64,
    pub live: usize,
    pub dead: u64,
    pub female: usize,
    pub male: usize,
}

#[must_use]
pub fn run_summary(sim: &Simulation) -> RunSummary {
    let (female, male) = sim.population().count_by_sex();
    RunSummary {
        cycle: sim.cycle(),
        live: sim.population().len(),
        dead: sim.population().dead_count(),
        female,
        male,
    }
}

/// One line per cell: coordinate, level, capacity, occupancy.
#[must_use]
pub fn environment_report(sim: &Simulation) -> String {
    let env = sim.environment();
    let mut out = String::new();
    for coord in env.coordinates() {
        let cell = env.cell_at(coord);
        let _ = writeln!(
            out,
            "{coord}: level: {:.2}  capacity: {:.2}  agent present: {}",
            cell.level(),
            cell.capacity(),
            cell.is_occupied()
        );
    }
    out
}

/// Population census plus one line per surviving agent.
#[must_use]
pub fn population_report(sim: &Simulation) -> String {
    let pop = sim.population();
    let (female, male) = pop.count_by_sex();
    let mut out = String::new();
    let _ = writeln!(out, "cycles run: {}", sim.cycle());
    let _ = writeln!(out, "alive agents: {}", pop.len());
    let _ = writeln!(out, "alive female: {female}");
    let _ = writeln!(out, "alive male: {male}");
    let _ = writeln!(out, "dead agents: {}", pop.dead_count());
    for agent in pop.live_agents() {
        let sex = match agent.sex() {
            Sex::Female => "female",
            Sex::Male => "male",
        };
        let _ = writeln!(
            out,
            "{}: {sex} age: {} metabolism: {:.2} reserve: {:.2} vision: {}",
            agent.position(),
            agent.age(),
            agent.metabolism(),
            agent.reserve(),
            agent.vision()
        );
    }
    out
}
