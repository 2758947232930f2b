mod common;

use common::{AgentBuilder, SimulationBuilder};
use sugarscape_core::rules::{ActivationStrategy, AgentRule, CellRule, TerminationRule};
use sugarscape_core::simulation::RunState;
use sugarscape_data::{Coord, Sex};

#[test]
fn test_cell_rules_run_before_agent_rules() {
    // The cell starts empty; regeneration runs first within the cycle, so
    // the agent eats freshly regenerated sugar the same cycle.
    let mut sim = SimulationBuilder::new()
        .size(5)
        .cell(2, 2, 4.0, 0.0)
        .agent(AgentBuilder::new().at(2, 2).metabolism(1.0).reserve(1.0))
        .cell_rule(CellRule::RegenFull)
        .agent_rule(AgentRule::EatAll)
        .max_cycle(1)
        .build();
    sim.run().unwrap();
    let agent = &sim.population().live_agents()[0];
    assert_eq!(agent.reserve(), 4.0);
}

#[test]
fn test_zero_cycle_budget_touches_nothing() {
    let mut sim = SimulationBuilder::new()
        .size(5)
        .cell(2, 2, 4.0, 0.0)
        .agent(AgentBuilder::new().at(2, 2).reserve(1.0))
        .cell_rule(CellRule::RegenFull)
        .agent_rule(AgentRule::EatAll)
        .max_cycle(0)
        .build();
    sim.run().unwrap();
    assert_eq!(sim.cycle(), 0);
    assert_eq!(sim.state(), RunState::Terminated);
    assert_eq!(sim.environment().cell_at(Coord::new(2, 2)).level(), 0.0);
    assert_eq!(sim.population().live_agents()[0].reserve(), 1.0);
}

#[test]
fn test_newborns_are_not_visited_in_the_birth_pass() {
    // Two fertile parents, a guaranteed trigger draw: each parent in the
    // pass snapshot births exactly once, and the two newborns are not
    // offered the rule until the next cycle.
    let mut sim = SimulationBuilder::new()
        .size(7)
        .uniform_sugar(2.0)
        .agent(AgentBuilder::new().id(1).at(2, 2).sex(Sex::Female).age(20).reserve(5.0))
        .agent(AgentBuilder::new().id(2).at(3, 2).sex(Sex::Male).age(20).reserve(5.0))
        .agent_rule(AgentRule::MakeAChild)
        .max_cycle(1)
        .build();
    sim.run().unwrap();
    assert_eq!(sim.population().len(), 4);
}

#[test]
fn test_mid_pass_deaths_do_not_break_iteration() {
    let mut sim = SimulationBuilder::new()
        .size(5)
        .uniform_sugar(0.0)
        .agent(AgentBuilder::new().at(0, 0).metabolism(1.0).reserve(0.5))
        .agent(AgentBuilder::new().at(2, 2).metabolism(1.0).reserve(0.5))
        .agent(AgentBuilder::new().at(4, 4).metabolism(1.0).reserve(0.5))
        .agent_rule(AgentRule::ApplyMortality)
        .max_cycle(1)
        .build();
    sim.run().unwrap();
    assert!(sim.population().is_empty());
    assert_eq!(sim.population().dead_count(), 3);
}

#[test]
fn test_reserve_descending_activation_lets_richest_move_first() {
    // Two agents one step from the same rich cell. Under reserve-descending
    // activation the richer agent acts first and claims it; the poorer one
    // settles for the first vacant candidate it sees.
    let mut sim = SimulationBuilder::new()
        .size(7)
        .uniform_sugar(0.0)
        .cell(3, 2, 4.0, 4.0)
        .agent(AgentBuilder::new().id(1).at(2, 2).vision(2).reserve(5.0))
        .agent(AgentBuilder::new().id(2).at(4, 2).vision(2).reserve(2.0))
        .agent_rule(AgentRule::MoveGreedyHighest)
        .activation(ActivationStrategy::ReserveDescending)
        .max_cycle(1)
        .build();
    sim.run().unwrap();
    let rich = sim.population().agent(uuid::Uuid::from_u128(1)).unwrap();
    assert_eq!(rich.position(), Coord::new(3, 2));
}

#[test]
fn test_extinction_terminates_before_cycle_budget() {
    let mut sim = SimulationBuilder::new()
        .size(5)
        .uniform_sugar(0.0)
        .agent(AgentBuilder::new().at(2, 2).metabolism(1.0).reserve(2.0))
        .agent_rule(AgentRule::EatMetabolism)
        .agent_rule(AgentRule::ApplyMortality)
        .termination(TerminationRule::MaxCycleOrExtinction)
        .max_cycle(100)
        .build();
    sim.run().unwrap();
    assert_eq!(sim.cycle(), 2);
    assert!(sim.population().is_empty());
}
