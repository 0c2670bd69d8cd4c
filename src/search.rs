use std::collections::HashMap;
use std::hash::Hash;

pub mod astar;
pub mod uninformed;

pub use astar::{astar, greedy_best_first, uniform_cost};
pub use uninformed::{breadth_first, depth_first};

/// State space explored by the search drivers.
pub trait SearchSpace {
    type Node: Clone + Eq + Hash;
    type Step: Clone;

    fn start(&self) -> Self::Node;
    fn is_goal(&self, node: &Self::Node) -> bool;
    /// Outgoing edges as `(step, child, cost)`.
    fn successors(&self, node: &Self::Node) -> Vec<(Self::Step, Self::Node, u32)>;
}

/// Estimated cost to a goal. `None` marks a dead end.
pub trait Heuristic<N> {
    fn estimate(&self, node: &N) -> Option<u32>;
}

impl<N, F> Heuristic<N> for F
where
    F: Fn(&N) -> Option<u32>,
{
    fn estimate(&self, node: &N) -> Option<u32> {
        self(node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution<T> {
    pub plan: Vec<T>,
    pub cost: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub expansions: usize,
    pub goal_tests: usize,
    pub new_nodes: usize,
}

#[derive(Debug, Clone)]
pub struct SearchResult<T> {
    pub solution: Option<Solution<T>>,
    pub stats: Stats,
}

impl<T> SearchResult<T> {
    fn failure(stats: Stats) -> Self {
        Self { solution: None, stats }
    }

    fn found(plan: Vec<T>, cost: u32, stats: Stats) -> Self {
        Self { solution: Some(Solution { plan, cost }), stats }
    }
}

fn reconstruct_path<N, T>(came_from: &HashMap<N, (N, T)>, goal: &N) -> Vec<T>
where
    N: Eq + Hash,
    T: Clone,
{
    let mut total_path = Vec::new();
    let mut current = goal;
    while let Some((parent, step)) = came_from.get(current) {
        total_path.push(step.clone());
        current = parent;
    }
    total_path.reverse();
    total_path
}

#[cfg(test)]
pub(crate) mod tests {
    use super::SearchSpace;

    /// Weighted graph on integers, goal is `goal`.
    pub struct Grid {
        pub edges: Vec<(u32, u32, u32)>,
        pub goal: u32,
    }

    impl SearchSpace for Grid {
        type Node = u32;
        type Step = (u32, u32);

        fn start(&self) -> u32 {
            0
        }

        fn is_goal(&self, node: &u32) -> bool {
            *node == self.goal
        }

        fn successors(&self, node: &u32) -> Vec<((u32, u32), u32, u32)> {
            self.edges.iter().filter(|(a, _, _)| a == node).map(|(a, b, c)| ((*a, *b), *b, *c)).collect()
        }
    }

    /// 0 -> 1 -> 3 costs 2, 0 -> 3 costs 5, 0 -> 2 -> 3 costs 3.
    pub fn diamond() -> Grid {
        Grid { edges: vec![(0, 1, 1), (1, 3, 1), (0, 3, 5), (0, 2, 1), (2, 3, 2)], goal: 3 }
    }

    #[test]
    fn test_reconstruct_path() {
        let mut came_from = std::collections::HashMap::new();
        came_from.insert(1, (0, 'a'));
        came_from.insert(2, (1, 'b'));
        assert_eq!(super::reconstruct_path(&came_from, &2), vec!['a', 'b']);
        assert!(super::reconstruct_path(&came_from, &0).is_empty());
    }
}
