use std::collections::{HashMap, HashSet, VecDeque};

use super::{reconstruct_path, SearchResult, SearchSpace, Stats};

/// Fewest steps, ignoring edge costs. Children are goal-tested as they are generated.
pub fn breadth_first<S: SearchSpace>(space: &S) -> SearchResult<S::Step> {
    let mut stats = Stats::default();
    let start = space.start();
    stats.goal_tests += 1;
    if space.is_goal(&start) {
        return SearchResult::found(Vec::new(), 0, stats);
    }

    let mut came_from: HashMap<S::Node, (S::Node, S::Step)> = HashMap::new();
    let mut costs: HashMap<S::Node, u32> = HashMap::new();
    let mut frontier = VecDeque::new();
    let mut seen = HashSet::new();
    seen.insert(start.clone());
    costs.insert(start.clone(), 0);
    frontier.push_back(start);

    while let Some(current) = frontier.pop_front() {
        stats.expansions += 1;
        let g = costs.get(&current).copied().unwrap_or_default();
        for (step, child, cost) in space.successors(&current) {
            if seen.contains(&child) {
                continue;
            }
            stats.new_nodes += 1;
            stats.goal_tests += 1;
            seen.insert(child.clone());
            costs.insert(child.clone(), g.saturating_add(cost));
            came_from.insert(child.clone(), (current.clone(), step));
            if space.is_goal(&child) {
                let cost = costs.get(&child).copied().unwrap_or_default();
                return SearchResult::found(reconstruct_path(&came_from, &child), cost, stats);
            }
            frontier.push_back(child);
        }
    }
    SearchResult::failure(stats)
}

/// Graph search expanding the newest node first. Plans are valid but rarely short.
pub fn depth_first<S: SearchSpace>(space: &S) -> SearchResult<S::Step> {
    let mut stats = Stats::default();
    let start = space.start();
    let mut came_from: HashMap<S::Node, (S::Node, S::Step)> = HashMap::new();
    let mut costs: HashMap<S::Node, u32> = HashMap::new();
    let mut explored = HashSet::new();
    let mut stack = vec![start.clone()];
    costs.insert(start, 0);

    while let Some(current) = stack.pop() {
        if !explored.insert(current.clone()) {
            continue;
        }
        let g = costs.get(&current).copied().unwrap_or_default();
        stats.goal_tests += 1;
        if space.is_goal(&current) {
            return SearchResult::found(reconstruct_path(&came_from, &current), g, stats);
        }
        stats.expansions += 1;
        for (step, child, cost) in space.successors(&current) {
            if explored.contains(&child) {
                continue;
            }
            if !costs.contains_key(&child) {
                stats.new_nodes += 1;
            }
            // the last push wins, matching the order nodes come off the stack
            costs.insert(child.clone(), g.saturating_add(cost));
            came_from.insert(child.clone(), (current.clone(), step));
            stack.push(child);
        }
    }
    SearchResult::failure(stats)
}

#[cfg(test)]
mod tests {
    use super::{breadth_first, depth_first};
    use crate::pddl::domains::{air_cargo_p1, have_cake};
    use crate::search::tests::{diamond, Grid};

    #[test]
    fn test_breadth_first_diamond() {
        let result = breadth_first(&diamond());
        let solution = result.solution.unwrap();
        // one step beats two cheap ones
        assert_eq!(solution.plan, vec![(0, 3)]);
        assert_eq!(solution.cost, 5);
        assert_eq!(result.stats.expansions, 1);
    }

    #[test]
    fn test_start_is_goal() {
        let grid = Grid { edges: vec![(0, 1, 1)], goal: 0 };
        assert!(breadth_first(&grid).solution.unwrap().plan.is_empty());
        assert!(depth_first(&grid).solution.unwrap().plan.is_empty());
    }

    #[test]
    fn test_unreachable_goal() {
        let grid = Grid { edges: vec![(0, 1, 1), (1, 0, 1)], goal: 2 };
        assert!(breadth_first(&grid).solution.is_none());
        let result = depth_first(&grid);
        assert!(result.solution.is_none());
        assert_eq!(result.stats.expansions, 2);
    }

    #[test]
    fn test_breadth_first_problems() {
        let cake = have_cake().unwrap();
        assert_eq!(breadth_first(&cake).solution.unwrap().plan.len(), 2);
        let p1 = air_cargo_p1().unwrap();
        let result = breadth_first(&p1);
        assert_eq!(result.solution.unwrap().plan.len(), 6);
        assert!(result.stats.goal_tests > result.stats.expansions);
    }

    #[test]
    fn test_depth_first_plan_is_valid() {
        let problem = air_cargo_p1().unwrap();
        let plan = depth_first(&problem).solution.unwrap().plan;
        let mut state = problem.initial.clone();
        for step in &plan {
            assert!(problem.is_applicable(&state, &problem.actions[*step]));
            state = problem.result(&state, &problem.actions[*step]);
        }
        assert!(problem.goal_test(&state));
        assert!(plan.len() >= 6);
    }
}
