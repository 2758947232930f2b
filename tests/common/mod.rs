use sugarscape_core::agent::Agent;
use sugarscape_core::config::PopulationConfig;
use sugarscape_core::environment::Environment;
use sugarscape_core::population::Population;
use sugarscape_core::rules::{ActivationStrategy, AgentRule, CellRule, TerminationRule};
use sugarscape_core::simulation::Simulation;
use sugarscape_data::{Coord, Sex};
use uuid::Uuid;

/// Population bounds that keep scenario agents deterministic: sampling
/// ranges are degenerate so any agent the engine creates is predictable.
#[allow(dead_code)]
pub fn test_props() -> PopulationConfig {
    PopulationConfig {
        initial_size: 0,
        max_size: 100,
        min_metabolism: 1.0,
        max_metabolism: 1.0,
        min_vision: 2,
        max_vision: 2,
        min_initial_age: 0,
        max_age: 100,
        max_reserve: 50.0,
        min_reproduction_age: 0,
        max_reproduction_age: 100,
        reproduction_chance_min: 1,
        reproduction_chance_max: 1,
    }
}

#[allow(dead_code)]
pub struct AgentBuilder {
    id: Option<Uuid>,
    position: Coord,
    metabolism: f64,
    vision: u32,
    age: u32,
    sex: Sex,
    reserve: f64,
}

#[allow(dead_code)]
impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            position: Coord::new(0, 0),
            metabolism: 1.0,
            vision: 2,
            age: 0,
            sex: Sex::Female,
            reserve: 1.0,
        }
    }

    pub fn id(mut self, tag: u128) -> Self {
        self.id = Some(Uuid::from_u128(tag));
        self
    }

    pub fn at(mut self, x: i64, y: i64) -> Self {
        self.position = Coord::new(x, y);
        self
    }

    pub fn metabolism(mut self, metabolism: f64) -> Self {
        self.metabolism = metabolism;
        self
    }

    pub fn vision(mut self, vision: u32) -> Self {
        self.vision = vision;
        self
    }

    pub fn age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    pub fn sex(mut self, sex: Sex) -> Self {
        self.sex = sex;
        self
    }

    pub fn reserve(mut self, reserve: f64) -> Self {
        self.reserve = reserve;
        self
    }

    pub fn build(self, max_reserve: f64) -> Agent {
        // Deterministic fallback id derived from the position so repeated
        // builds stay reproducible.
        let id = self.id.unwrap_or_else(|| {
            Uuid::from_u128(
                0x5EED ^ ((self.position.x as u128) << 64) ^ ((self.position.y as u128) << 32),
            )
        });
        Agent::new(
            id,
            self.metabolism,
            self.vision,
            self.age,
            self.sex,
            self.reserve,
            self.position,
            max_reserve,
        )
        .expect("test agent within bounds")
    }
}

#[allow(dead_code)]
pub struct SimulationBuilder {
    size: usize,
    max_capacity: f64,
    uniform_level: Option<f64>,
    cell_mods: Vec<(Coord, f64, f64)>,
    props: PopulationConfig,
    agents: Vec<AgentBuilder>,
    cell_rules: Vec<CellRule>,
    agent_rules: Vec<AgentRule>,
    activation: ActivationStrategy,
    termination: TerminationRule,
    max_cycle: u64,
    seed: u64,
}

#[allow(dead_code)]
impl SimulationBuilder {
    pub fn new() -> Self {
        Self {
            size: 7,
            max_capacity: 4.0,
            uniform_level: None,
            cell_mods: Vec::new(),
            props: test_props(),
            agents: Vec::new(),
            cell_rules: Vec::new(),
            agent_rules: Vec::new(),
            activation: ActivationStrategy::Random,
            termination: TerminationRule::MaxCycle,
            max_cycle: 10,
            seed: 42,
        }
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn max_capacity(mut self, max_capacity: f64) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Give every cell the global capacity and this starting level.
    pub fn uniform_sugar(mut self, level: f64) -> Self {
        self.uniform_level = Some(level);
        self
    }

    /// Pin one cell's capacity and level.
    pub fn cell(mut self, x: i64, y: i64, capacity: f64, level: f64) -> Self {
        self.cell_mods.push((Coord::new(x, y), capacity, level));
        self
    }

    pub fn props<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut PopulationConfig),
    {
        modifier(&mut self.props);
        self
    }

    pub fn agent(mut self, agent: AgentBuilder) -> Self {
        self.agents.push(agent);
        self
    }

    pub fn cell_rule(mut self, rule: CellRule) -> Self {
        self.cell_rules.push(rule);
        self
    }

    pub fn agent_rule(mut self, rule: AgentRule) -> Self {
        self.agent_rules.push(rule);
        self
    }

    pub fn activation(mut self, activation: ActivationStrategy) -> Self {
        self.activation = activation;
        self
    }

    pub fn termination(mut self, termination: TerminationRule) -> Self {
        self.termination = termination;
        self
    }

    pub fn max_cycle(mut self, max_cycle: u64) -> Self {
        self.max_cycle = max_cycle;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Environment and population only, for driving core operations
    /// directly.
    pub fn build_parts(&self) -> (Environment, Population) {
        let mut env = Environment::new(self.size, self.max_capacity).expect("valid test grid");
        if let Some(level) = self.uniform_level {
            for coord in env.coordinates().collect::<Vec<_>>() {
                let max_capacity = self.max_capacity;
                let cell = env.cell_at_mut(coord);
                cell.set_capacity(max_capacity, max_capacity)
                    .expect("capacity within ceiling");
                cell.set_level(level).expect("level within capacity");
            }
        }
        for &(coord, capacity, level) in &self.cell_mods {
            let max_capacity = self.max_capacity;
            let cell = env.cell_at_mut(coord);
            cell.set_capacity(capacity, max_capacity)
                .expect("capacity within ceiling");
            cell.set_level(level).expect("level within capacity");
        }
        let mut pop = Population::new(self.props.clone());
        for blueprint in &self.agents {
            let agent = AgentBuilder {
                id: blueprint.id,
                position: blueprint.position,
                metabolism: blueprint.metabolism,
                vision: blueprint.vision,
                age: blueprint.age,
                sex: blueprint.sex,
                reserve: blueprint.reserve,
            }
            .build(self.props.max_reserve);
            env.cell_at_mut(agent.position())
                .set_occupant(Some(agent.id()));
            pop.push(agent);
        }
        (env, pop)
    }

    pub fn build(self) -> Simulation {
        let (env, pop) = self.build_parts();
        Simulation::new(
            env,
            pop,
            self.cell_rules,
            self.agent_rules,
            self.activation,
            self.termination,
            self.max_cycle,
            Some(self.seed),
        )
    }
}
