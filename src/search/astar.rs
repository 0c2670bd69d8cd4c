use std::cmp::Reverse;
use std::collections::HashMap;

use priority_queue::PriorityQueue;
use tracing::debug;

use super::{reconstruct_path, Heuristic, SearchResult, SearchSpace, Stats};

#[derive(Debug, Clone, Copy)]
enum Ordering {
    /// g
    PathCost,
    /// h
    Estimate,
    /// g + h
    Total,
}

impl Ordering {
    fn priority(self, g: u32, h: u32) -> u32 {
        match self {
            Ordering::PathCost => g,
            Ordering::Estimate => h,
            Ordering::Total => g.saturating_add(h),
        }
    }
}

/// Best-first graph search. Nodes whose heuristic is `None` are never queued. An
/// expanded node found again through a cheaper path is queued again.
fn best_first<S, H>(space: &S, heuristic: &H, ordering: Ordering) -> SearchResult<S::Step>
where
    S: SearchSpace,
    H: Heuristic<S::Node>,
{
    let mut stats = Stats::default();
    let start = space.start();
    let h_start = match heuristic.estimate(&start) {
        Some(h) => h,
        None => return SearchResult::failure(stats),
    };

    let mut open_set = PriorityQueue::new();
    let mut came_from: HashMap<S::Node, (S::Node, S::Step)> = HashMap::new();
    let mut g_score: HashMap<S::Node, u32> = HashMap::new();
    let mut h_cache: HashMap<S::Node, Option<u32>> = HashMap::new();
    // insertion counter, so equal priorities pop first in first out
    let mut pushed: u64 = 0;

    g_score.insert(start.clone(), 0);
    h_cache.insert(start.clone(), Some(h_start));
    open_set.push(start, Reverse((ordering.priority(0, h_start), pushed)));

    while let Some((current, _)) = open_set.pop() {
        let g = g_score.get(&current).copied().unwrap_or_default();
        stats.goal_tests += 1;
        if space.is_goal(&current) {
            let plan = reconstruct_path(&came_from, &current);
            return SearchResult::found(plan, g, stats);
        }
        stats.expansions += 1;
        for (step, child, cost) in space.successors(&current) {
            let tentative = g.saturating_add(cost);
            if g_score.get(&child).map_or(false, |known| tentative >= *known) {
                continue;
            }
            let h = match *h_cache.entry(child.clone()).or_insert_with(|| heuristic.estimate(&child)) {
                Some(h) => h,
                None => continue,
            };
            if !g_score.contains_key(&child) {
                stats.new_nodes += 1;
            }
            g_score.insert(child.clone(), tentative);
            came_from.insert(child.clone(), (current.clone(), step));
            pushed += 1;
            open_set.push(child, Reverse((ordering.priority(tentative, h), pushed)));
        }
    }
    debug!(expansions = stats.expansions, new_nodes = stats.new_nodes, "open set exhausted");
    SearchResult::failure(stats)
}

/// A* ordered by `g + h`. Optimal when `heuristic` is admissible.
pub fn astar<S, H>(space: &S, heuristic: &H) -> SearchResult<S::Step>
where
    S: SearchSpace,
    H: Heuristic<S::Node>,
{
    best_first(space, heuristic, Ordering::Total)
}

pub fn greedy_best_first<S, H>(space: &S, heuristic: &H) -> SearchResult<S::Step>
where
    S: SearchSpace,
    H: Heuristic<S::Node>,
{
    best_first(space, heuristic, Ordering::Estimate)
}

pub fn uniform_cost<S: SearchSpace>(space: &S) -> SearchResult<S::Step> {
    best_first(space, &|_: &S::Node| Some(0), Ordering::PathCost)
}

#[cfg(test)]
mod tests {
    use super::{astar, greedy_best_first, uniform_cost};
    use crate::graph::GraphOptions;
    use crate::heuristic::{GraphHeuristic, HeuristicKind};
    use crate::pddl::domains::{air_cargo_p1, have_cake};
    use crate::search::tests::{diamond, Grid};

    #[test]
    fn test_uniform_cost_diamond() {
        let result = uniform_cost(&diamond());
        let solution = result.solution.unwrap();
        assert_eq!(solution.plan, vec![(0, 1), (1, 3)]);
        assert_eq!(solution.cost, 2);
        assert!(result.stats.goal_tests >= 1);
    }

    #[test]
    fn test_greedy_follows_estimate() {
        // Estimate pulls the search straight down the expensive edge.
        let h = |n: &u32| Some(if *n == 3 { 0 } else if *n == 0 { 1 } else { 9 });
        let solution = greedy_best_first(&diamond(), &h).solution.unwrap();
        assert_eq!(solution.plan, vec![(0, 3)]);
        assert_eq!(solution.cost, 5);
    }

    #[test]
    fn test_dead_ends_are_pruned() {
        let h = |n: &u32| if *n == 1 { None } else { Some(0) };
        let solution = astar(&diamond(), &h).solution.unwrap();
        assert_eq!(solution.plan, vec![(0, 2), (2, 3)]);
        assert_eq!(solution.cost, 3);

        let unreachable = Grid { edges: vec![(0, 1, 1)], goal: 7 };
        let result = astar(&unreachable, &|_: &u32| Some(0));
        assert!(result.solution.is_none());
        assert_eq!(result.stats.expansions, 2);
    }

    #[test]
    fn test_astar_cake() {
        let problem = have_cake().unwrap();
        let h = GraphHeuristic::new(&problem, HeuristicKind::SetLevel, GraphOptions::default()).unwrap();
        let solution = astar(&problem, &h).solution.unwrap();
        let names: Vec<&str> = solution.plan.iter().map(|i| problem.actions[*i].name.as_str()).collect();
        assert_eq!(names, vec!["Eat(Cake)", "Bake(Cake)"]);
    }

    #[test]
    fn test_astar_air_cargo_p1() {
        let problem = air_cargo_p1().unwrap();
        for kind in [HeuristicKind::MaxLevel, HeuristicKind::SetLevel].iter() {
            let h = GraphHeuristic::new(&problem, *kind, GraphOptions::default()).unwrap();
            let result = astar(&problem, &h);
            let solution = result.solution.unwrap();
            assert_eq!(solution.plan.len(), 6, "{}", kind);
            assert_eq!(solution.cost, 6);
            let mut state = problem.initial.clone();
            for step in &solution.plan {
                assert!(problem.is_applicable(&state, &problem.actions[*step]));
                state = problem.result(&state, &problem.actions[*step]);
            }
            assert!(problem.goal_test(&state));
        }
    }

    #[test]
    fn test_uniform_cost_air_cargo_p1() {
        let problem = air_cargo_p1().unwrap();
        let result = uniform_cost(&problem);
        assert_eq!(result.solution.unwrap().cost, 6);
        assert!(result.stats.new_nodes > 0);
    }
}
