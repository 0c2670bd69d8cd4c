//! Level-based heuristics read off a planning graph.
//!
//! See Russell-Norvig 10.3.1 (3rd Edition).

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::graph::{node::GraphDomain, node::LiteralId, GraphOptions, PlanningGraph};
use crate::pddl::{Literal, Problem, State};
use crate::search::Heuristic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelCost {
    Cost(usize),
    /// The goal never shows up, even after the graph leveled off.
    Unreachable,
    /// `max_levels` ran out before the goal showed up or the graph leveled off.
    BoundExceeded,
}

impl LevelCost {
    pub fn cost(self) -> Option<usize> {
        match self {
            LevelCost::Cost(c) => Some(c),
            _ => None,
        }
    }
}

/// Goal conjunction resolved against a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    literals: Vec<LiteralId>,
    /// Some goal literal is outside the domain's universe.
    foreign: bool,
}

impl Goal {
    pub fn resolve(domain: &GraphDomain, literals: &[Literal]) -> Self {
        let ids: Vec<Option<LiteralId>> = literals.iter().map(|l| domain.literal_id(l)).collect();
        let foreign = ids.iter().any(Option::is_none);
        let mut literals: Vec<LiteralId> = ids.into_iter().flatten().collect();
        literals.sort();
        literals.dedup();
        Self { literals, foreign }
    }

    pub fn literals(&self) -> &[LiteralId] {
        &self.literals
    }
}

fn missing(graph: &PlanningGraph) -> LevelCost {
    if graph.is_leveled() {
        LevelCost::Unreachable
    } else {
        LevelCost::BoundExceeded
    }
}

/// First literal level containing `literal`.
pub fn first_level(graph: &PlanningGraph, literal: LiteralId) -> Option<usize> {
    graph.literal_levels().iter().position(|level| level.contains(literal))
}

fn first_levels(graph: &PlanningGraph, goal: &Goal) -> std::result::Result<Vec<usize>, LevelCost> {
    if goal.foreign {
        return Err(LevelCost::Unreachable);
    }
    goal.literals.iter().map(|l| first_level(graph, *l).ok_or_else(|| missing(graph))).collect()
}

/// Sum of each goal literal's first level. Ignores goal interaction.
pub fn level_sum(graph: &PlanningGraph, goal: &Goal) -> LevelCost {
    match first_levels(graph, goal) {
        Ok(levels) => LevelCost::Cost(levels.iter().sum()),
        Err(cost) => cost,
    }
}

/// Largest first level over the goal literals.
pub fn max_level(graph: &PlanningGraph, goal: &Goal) -> LevelCost {
    match first_levels(graph, goal) {
        Ok(levels) => LevelCost::Cost(levels.into_iter().max().unwrap_or(0)),
        Err(cost) => cost,
    }
}

/// First level where every goal literal is present and no two are mutex.
pub fn set_level(graph: &PlanningGraph, goal: &Goal) -> LevelCost {
    let start = match max_level(graph, goal) {
        LevelCost::Cost(c) => c,
        other => return other,
    };
    graph.literal_levels()[start..]
        .iter()
        .position(|level| level.supports(&goal.literals))
        .map(|offset| LevelCost::Cost(start + offset))
        .unwrap_or_else(|| missing(graph))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeuristicKind {
    UnmetGoals,
    LevelSum,
    MaxLevel,
    SetLevel,
}

impl FromStr for HeuristicKind {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "unmet-goals" => Ok(HeuristicKind::UnmetGoals),
            "level-sum" => Ok(HeuristicKind::LevelSum),
            "max-level" => Ok(HeuristicKind::MaxLevel),
            "set-level" => Ok(HeuristicKind::SetLevel),
            _ => Err(Error::UnknownHeuristic(s.to_owned())),
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeuristicKind::UnmetGoals => "unmet-goals",
            HeuristicKind::LevelSum => "level-sum",
            HeuristicKind::MaxLevel => "max-level",
            HeuristicKind::SetLevel => "set-level",
        };
        write!(f, "{}", name)
    }
}

pub fn level_cost(graph: &PlanningGraph, goal: &Goal, kind: HeuristicKind) -> LevelCost {
    match kind {
        HeuristicKind::LevelSum => level_sum(graph, goal),
        HeuristicKind::MaxLevel => max_level(graph, goal),
        HeuristicKind::SetLevel => set_level(graph, goal),
        // goal literals missing from level 0
        HeuristicKind::UnmetGoals => {
            let initial = &graph.literal_levels()[0];
            LevelCost::Cost(goal.literals.iter().filter(|l| !initial.contains(**l)).count())
        }
    }
}

/// Heuristic callback for search: each state gets a fresh graph.
pub struct GraphHeuristic<'p> {
    problem: &'p Problem,
    domain: GraphDomain,
    goal: Goal,
    kind: HeuristicKind,
    options: GraphOptions,
}

impl<'p> GraphHeuristic<'p> {
    pub fn new(problem: &'p Problem, kind: HeuristicKind, options: GraphOptions) -> Result<Self> {
        let domain = GraphDomain::from_problem(problem)?;
        let goal = Goal::resolve(&domain, &problem.goal);
        Ok(Self { problem, domain, goal, kind, options })
    }

    pub fn level_cost(&self, state: &State) -> Result<LevelCost> {
        if self.kind == HeuristicKind::UnmetGoals {
            return Ok(LevelCost::Cost(self.problem.unmet_goals(state) as usize));
        }
        if self.goal.foreign {
            return Ok(LevelCost::Unreachable);
        }
        let graph = PlanningGraph::build_for_goal(&self.domain, self.domain.closed_world(state), &self.goal.literals, self.options)?;
        Ok(level_cost(&graph, &self.goal, self.kind))
    }
}

impl Heuristic<State> for GraphHeuristic<'_> {
    fn estimate(&self, state: &State) -> Option<u32> {
        match self.level_cost(state) {
            Ok(LevelCost::Cost(c)) => Some(c as u32),
            Ok(LevelCost::Unreachable) => None,
            Ok(LevelCost::BoundExceeded) => {
                debug!(heuristic = %self.kind, max_levels = ?self.options.max_levels, "planning graph bound exceeded");
                None
            }
            Err(e) => {
                warn!(heuristic = %self.kind, "treating state as a dead end: {}", e);
                None
            }
        }
    }
}
