//! Alternating literal/action level graph with per-level mutex tables.

pub mod level;
pub mod mutex;
pub mod node;

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::pddl::State;
use level::{ActionLevel, LiteralLevel};
use mutex::{action_mutex, literal_mutex, ActionMutexTable, LiteralMutexTable};
use node::{GraphDomain, LiteralId, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphOptions {
    /// Maximum number of action levels to add. `None` expands until level-off.
    pub max_levels: Option<usize>,
    /// Make every pair of non-persistence actions in a level mutex.
    pub serialize: bool,
    /// Skip mutex computation entirely.
    pub ignore_mutexes: bool,
}

pub struct PlanningGraph<'d> {
    domain: &'d GraphDomain,
    options: GraphOptions,
    literal_levels: Vec<LiteralLevel>,
    action_levels: Vec<ActionLevel>,
    leveled: bool,
}

impl<'d> PlanningGraph<'d> {
    /// Graph holding level 0 only.
    pub fn new(domain: &'d GraphDomain, initial: BTreeSet<LiteralId>, options: GraphOptions) -> Result<Self> {
        if let Some(literal) = initial.iter().find(|l| initial.contains(&l.complement())) {
            return Err(Error::ContradictoryInitialState(domain.literal(*literal).to_string()));
        }
        Ok(Self { domain, options, literal_levels: vec![LiteralLevel::initial(initial)], action_levels: Vec::new(), leveled: false })
    }

    /// Graph rooted at the closed-world completion of `state`.
    pub fn from_state(domain: &'d GraphDomain, state: &State, options: GraphOptions) -> Self {
        let initial = domain.closed_world(state);
        Self { domain, options, literal_levels: vec![LiteralLevel::initial(initial)], action_levels: Vec::new(), leveled: false }
    }

    /// Expands until level-off or `options.max_levels`.
    pub fn build(domain: &'d GraphDomain, initial: BTreeSet<LiteralId>, options: GraphOptions) -> Result<Self> {
        let mut graph = PlanningGraph::new(domain, initial, options)?;
        graph.fill(options.max_levels);
        Ok(graph)
    }

    /// Like [`PlanningGraph::build`] but stops at the first level where `goal` is
    /// fully present and pairwise non-mutex.
    pub fn build_for_goal(domain: &'d GraphDomain, initial: BTreeSet<LiteralId>, goal: &[LiteralId], options: GraphOptions) -> Result<Self> {
        let mut graph = PlanningGraph::new(domain, initial, options)?;
        graph.expand_for_goal(goal);
        Ok(graph)
    }

    pub fn expand_for_goal(&mut self, goal: &[LiteralId]) -> &mut Self {
        let mut added = 0;
        while !self.last_level().supports(goal) && !self.leveled && self.options.max_levels.map_or(true, |m| added < m) {
            self.extend();
            added += 1;
        }
        self
    }

    pub fn fill(&mut self, max_levels: Option<usize>) -> &mut Self {
        let mut added = 0;
        while !self.leveled && max_levels.map_or(true, |m| added < m) {
            self.extend();
            added += 1;
        }
        self
    }

    /// Adds A<sub>i</sub> and S<sub>i+1</sub>. Returns `false` without touching the
    /// graph once it has leveled off.
    pub fn extend(&mut self) -> bool {
        if self.leveled {
            return false;
        }
        let domain = self.domain;
        let ignore_mutexes = self.options.ignore_mutexes;
        let (action_level, literal_level) = {
            let below = self.last_level();
            let mut nodes: Vec<NodeKind> = below.literals().map(NodeKind::Persistence).collect();
            for (idx, action) in domain.actions().iter().enumerate() {
                if below.supports(&action.preconditions) {
                    nodes.push(NodeKind::Ground(idx));
                }
            }

            let views: Vec<_> = nodes.iter().map(|kind| domain.node(kind)).collect();
            let mut action_mutexes = ActionMutexTable::default();
            if !ignore_mutexes {
                for (i, a) in views.iter().enumerate() {
                    for (j, b) in views.iter().enumerate().skip(i + 1) {
                        action_mutexes.insert(i, j, action_mutex(a, b, &below.mutexes, self.options.serialize));
                    }
                }
            }

            let mut producers: BTreeMap<LiteralId, Vec<usize>> = BTreeMap::new();
            for (idx, view) in views.iter().enumerate() {
                for effect in view.effects {
                    producers.entry(*effect).or_default().push(idx);
                }
            }
            let literals: Vec<LiteralId> = producers.keys().copied().collect();
            let mut literal_mutexes = LiteralMutexTable::default();
            if !ignore_mutexes {
                for (i, p) in literals.iter().enumerate() {
                    for q in &literals[i + 1..] {
                        literal_mutexes.insert(*p, *q, literal_mutex(*p, *q, &producers[p], &producers[q], &action_mutexes));
                    }
                }
            }
            (
                ActionLevel { nodes, mutexes: action_mutexes },
                LiteralLevel { literals: literals.into_iter().collect(), producers, mutexes: literal_mutexes },
            )
        };

        self.leveled = literal_level.same_as(self.last_level());
        debug!(
            level = self.literal_levels.len(),
            literals = literal_level.len(),
            actions = action_level.nodes.len(),
            action_mutexes = action_level.mutexes.len(),
            literal_mutexes = literal_level.mutexes.len(),
            leveled = self.leveled,
            "extended planning graph"
        );
        self.action_levels.push(action_level);
        self.literal_levels.push(literal_level);
        true
    }

    pub fn domain(&self) -> &'d GraphDomain {
        self.domain
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    pub fn literal_levels(&self) -> &[LiteralLevel] {
        &self.literal_levels
    }

    pub fn action_levels(&self) -> &[ActionLevel] {
        &self.action_levels
    }

    pub fn last_level(&self) -> &LiteralLevel {
        &self.literal_levels[self.literal_levels.len() - 1]
    }

    pub fn is_leveled(&self) -> bool {
        self.leveled
    }

    /// Index of the literal level that repeated its predecessor.
    pub fn leveled_at(&self) -> Option<usize> {
        if self.leveled {
            Some(self.literal_levels.len() - 1)
        } else {
            None
        }
    }
}
