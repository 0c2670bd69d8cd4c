//! Runs one search strategy against one problem and reports what it cost.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::GraphOptions;
use crate::heuristic::{GraphHeuristic, HeuristicKind};
use crate::pddl::Problem;
use crate::search::{astar, breadth_first, depth_first, greedy_best_first, uniform_cost, SearchResult, Stats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    BreadthFirst,
    DepthFirst,
    UniformCost,
    GreedyBestFirst,
    Astar,
}

impl Algorithm {
    pub fn is_informed(self) -> bool {
        matches!(self, Algorithm::GreedyBestFirst | Algorithm::Astar)
    }
}

impl FromStr for Algorithm {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "breadth-first" => Ok(Algorithm::BreadthFirst),
            "depth-first" => Ok(Algorithm::DepthFirst),
            "uniform-cost" => Ok(Algorithm::UniformCost),
            "greedy-best-first" => Ok(Algorithm::GreedyBestFirst),
            "astar" => Ok(Algorithm::Astar),
            _ => Err(Error::UnknownAlgorithm(s.to_owned())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::BreadthFirst => "breadth-first",
            Algorithm::DepthFirst => "depth-first",
            Algorithm::UniformCost => "uniform-cost",
            Algorithm::GreedyBestFirst => "greedy-best-first",
            Algorithm::Astar => "astar",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Strategy {
    pub algorithm: Algorithm,
    /// Ignored by the uninformed algorithms.
    #[serde(default)]
    pub heuristic: Option<HeuristicKind>,
}

impl Strategy {
    pub fn new(algorithm: Algorithm, heuristic: Option<HeuristicKind>) -> Result<Self> {
        let strategy = Self { algorithm, heuristic };
        strategy.validate()?;
        Ok(strategy)
    }

    pub fn validate(&self) -> Result<()> {
        if self.algorithm.is_informed() && self.heuristic.is_none() {
            return Err(Error::MissingHeuristic(self.algorithm.to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.heuristic {
            Some(h) if self.algorithm.is_informed() => write!(f, "{}[{}]", self.algorithm, h),
            _ => write!(f, "{}", self.algorithm),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub problem: String,
    pub strategy: Strategy,
    pub stats: Stats,
    /// Action names, `None` when no plan exists.
    pub plan: Option<Vec<String>>,
    pub elapsed: Duration,
}

impl Report {
    pub fn plan_length(&self) -> Option<usize> {
        self.plan.as_ref().map(Vec::len)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}: ", self.problem, self.strategy)?;
        match self.plan_length() {
            Some(len) => write!(f, "plan of {} steps", len)?,
            None => write!(f, "no plan")?,
        }
        writeln!(
            f,
            " ({} expansions, {} goal tests, {} new nodes, {:.3}s)",
            self.stats.expansions,
            self.stats.goal_tests,
            self.stats.new_nodes,
            self.elapsed.as_secs_f64()
        )?;
        for action in self.plan.iter().flatten() {
            writeln!(f, "    {}", action)?;
        }
        Ok(())
    }
}

fn informed(problem: &Problem, strategy: &Strategy, options: GraphOptions) -> Result<SearchResult<usize>> {
    let kind = strategy.heuristic.ok_or_else(|| Error::MissingHeuristic(strategy.algorithm.to_string()))?;
    let heuristic = GraphHeuristic::new(problem, kind, options)?;
    Ok(match strategy.algorithm {
        Algorithm::GreedyBestFirst => greedy_best_first(problem, &heuristic),
        _ => astar(problem, &heuristic),
    })
}

pub fn run(problem: &Problem, strategy: &Strategy, options: GraphOptions) -> Result<Report> {
    strategy.validate()?;
    info!(problem = %problem.name, strategy = %strategy, "solving");
    let started = Instant::now();
    let result = match strategy.algorithm {
        Algorithm::BreadthFirst => breadth_first(problem),
        Algorithm::DepthFirst => depth_first(problem),
        Algorithm::UniformCost => uniform_cost(problem),
        Algorithm::GreedyBestFirst | Algorithm::Astar => informed(problem, strategy, options)?,
    };
    let elapsed = started.elapsed();
    debug!(expansions = result.stats.expansions, goal_tests = result.stats.goal_tests, new_nodes = result.stats.new_nodes, "search finished");

    let plan = result.solution.map(|s| s.plan.iter().map(|i| problem.actions[*i].name.clone()).collect());
    Ok(Report { problem: problem.name.clone(), strategy: *strategy, stats: result.stats, plan, elapsed })
}

#[cfg(test)]
mod tests {
    use super::{run, Algorithm, Strategy};
    use crate::error::Error;
    use crate::graph::GraphOptions;
    use crate::heuristic::HeuristicKind;
    use crate::pddl::domains::{air_cargo_p1, have_cake};

    #[test]
    fn test_parse_algorithm() {
        for name in ["breadth-first", "depth-first", "uniform-cost", "greedy-best-first", "astar"].iter() {
            assert_eq!(name.parse::<Algorithm>().unwrap().to_string(), *name);
        }
        assert!(matches!("a-star".parse::<Algorithm>(), Err(Error::UnknownAlgorithm(_))));
    }

    #[test]
    fn test_missing_heuristic() {
        assert!(matches!(Strategy::new(Algorithm::Astar, None), Err(Error::MissingHeuristic(name)) if name == "astar"));
        let strategy = Strategy { algorithm: Algorithm::GreedyBestFirst, heuristic: None };
        assert!(run(&have_cake().unwrap(), &strategy, GraphOptions::default()).is_err());
        assert!(Strategy::new(Algorithm::BreadthFirst, None).is_ok());
    }

    #[test]
    fn test_run_reports() {
        let problem = have_cake().unwrap();
        let strategy = Strategy::new(Algorithm::Astar, Some(HeuristicKind::LevelSum)).unwrap();
        let report = run(&problem, &strategy, GraphOptions::default()).unwrap();
        assert_eq!(report.plan, Some(vec!["Eat(Cake)".to_owned(), "Bake(Cake)".to_owned()]));
        let text = report.to_string();
        assert!(text.starts_with("have-cake / astar[level-sum]: plan of 2 steps"));
        assert!(text.contains("    Bake(Cake)\n"));
    }

    #[test]
    fn test_strategies_agree_on_p1() {
        let problem = air_cargo_p1().unwrap();
        let strategies = [
            Strategy::new(Algorithm::BreadthFirst, None).unwrap(),
            Strategy::new(Algorithm::UniformCost, None).unwrap(),
            Strategy::new(Algorithm::Astar, Some(HeuristicKind::UnmetGoals)).unwrap(),
            Strategy::new(Algorithm::Astar, Some(HeuristicKind::MaxLevel)).unwrap(),
        ];
        for strategy in strategies.iter() {
            let report = run(&problem, strategy, GraphOptions::default()).unwrap();
            assert_eq!(report.plan_length(), Some(6), "{}", strategy);
        }
        let greedy = Strategy::new(Algorithm::GreedyBestFirst, Some(HeuristicKind::SetLevel)).unwrap();
        assert!(run(&problem, &greedy, GraphOptions::default()).unwrap().plan_length().is_some());
    }
}
