use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sugarscape_data::Sex;
use uuid::Uuid;

use crate::agent::Agent;
use crate::config::PopulationConfig;
use crate::environment::Environment;
use crate::error::Result;
use crate::rules::{ActivationStrategy, AgentRule};

/// The live agents of one simulation.
///
/// The storage order is semantically meaningful: it is the activation order
/// for the coming cycle, reselected by the configured strategy before every
/// agent pass. The population grows only through reproduction and shrinks
/// only through death.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Population {
    agents: Vec<Agent>,
    dead_count: u64,
    props: PopulationConfig,
}

impl Population {
    #[must_use]
    pub fn new(props: PopulationConfig) -> Self {
        Self {
            agents: Vec::new(),
            dead_count: 0,
            props,
        }
    }

    /// The shared bounds used for sampling and rule thresholds.
    #[must_use]
    pub fn props(&self) -> &PopulationConfig {
        &self.props
    }

    /// The live agents in current activation order.
    #[must_use]
    pub fn live_agents(&self) -> &[Agent] {
        &self.agents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    #[must_use]
    pub fn dead_count(&self) -> u64 {
        self.dead_count
    }

    /// Counts one death. The counter only moves forward, so the
    /// negative-count failure mode of a signed counter cannot occur.
    pub fn record_death(&mut self) {
        self.dead_count += 1;
    }

    #[must_use]
    pub fn agent(&self, id: Uuid) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    pub fn agent_mut(&mut self, id: Uuid) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: Uuid) -> bool {
        self.agents.iter().any(|a| a.id() == id)
    }

    /// Appends an agent; newborns join at the back of the activation order.
    pub fn push(&mut self, agent: Agent) {
        self.agents.push(agent);
    }

    /// Removes an agent by id, preserving the activation order of the rest.
    pub fn remove(&mut self, id: Uuid) -> Option<Agent> {
        let idx = self.agents.iter().position(|a| a.id() == id)?;
        Some(self.agents.remove(idx))
    }

    /// Ids of the agents live at this instant. Rule passes iterate this
    /// snapshot so that mid-pass deaths are skipped safely and mid-pass
    /// births are not visited until the next pass.
    #[must_use]
    pub fn snapshot_ids(&self) -> Vec<Uuid> {
        self.agents.iter().map(Agent::id).collect()
    }

    /// `(female, male)` counts over the live agents.
    #[must_use]
    pub fn count_by_sex(&self) -> (usize, usize) {
        let female = self
            .agents
            .iter()
            .filter(|a| a.sex() == Sex::Female)
            .count();
        (female, self.agents.len() - female)
    }

    /// Applies an agent rule to every currently-live agent, in current
    /// activation order, iterating a snapshot taken at call time: agents
    /// removed mid-pass are skipped safely, agents born mid-pass are not
    /// visited until the next pass.
    pub fn apply_rule_to_all<R: Rng>(
        &mut self,
        env: &mut Environment,
        rule: AgentRule,
        rng: &mut R,
    ) -> Result<()> {
        for id in self.snapshot_ids() {
            if !self.contains(id) {
                continue;
            }
            rule.apply(env, self, id, rng)?;
        }
        Ok(())
    }

    /// Reselects the activation order for the coming cycle.
    pub fn reorder<R: Rng>(&mut self, strategy: ActivationStrategy, rng: &mut R) {
        match strategy {
            ActivationStrategy::Random => self.agents.shuffle(rng),
            ActivationStrategy::ReserveDescending => {
                // Stable ascending sort, then reverse: highest-reserve
                // agents activate first, ties in reversed insertion order.
                self.agents.sort_by(|a, b| {
                    a.reserve()
                        .partial_cmp(&b.reserve())
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                self.agents.reverse();
            }
        }
    }
}
