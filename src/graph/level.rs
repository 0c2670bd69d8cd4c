use std::collections::{BTreeMap, BTreeSet};

use super::mutex::{ActionMutexTable, LiteralMutexTable};
use super::node::{LiteralId, NodeKind};

/// S<sub>i</sub>: reachable literals, who produced them and which pairs are mutex.
#[derive(Debug, Clone)]
pub struct LiteralLevel {
    pub(super) literals: BTreeSet<LiteralId>,
    /// Positions of producing nodes in the action level below. Empty at level 0.
    pub(super) producers: BTreeMap<LiteralId, Vec<usize>>,
    pub(super) mutexes: LiteralMutexTable,
}

impl LiteralLevel {
    pub(super) fn initial(literals: BTreeSet<LiteralId>) -> Self {
        Self { literals, producers: BTreeMap::new(), mutexes: LiteralMutexTable::default() }
    }

    pub fn contains(&self, literal: LiteralId) -> bool {
        self.literals.contains(&literal)
    }

    pub fn literals(&self) -> impl Iterator<Item = LiteralId> + '_ {
        self.literals.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn producers(&self, literal: LiteralId) -> &[usize] {
        self.producers.get(&literal).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn mutexes(&self) -> &LiteralMutexTable {
        &self.mutexes
    }

    pub fn is_mutex(&self, p: LiteralId, q: LiteralId) -> bool {
        self.mutexes.contains(p, q)
    }

    /// Whether every literal is present and no two of them are mutex.
    pub fn supports(&self, literals: &[LiteralId]) -> bool {
        literals.iter().all(|l| self.contains(*l))
            && literals.iter().enumerate().all(|(i, p)| literals[i + 1..].iter().all(|q| !self.is_mutex(*p, *q)))
    }

    /// Same literals and same mutex pairs.
    pub fn same_as(&self, other: &LiteralLevel) -> bool {
        self.literals == other.literals && self.mutexes.same_pairs(&other.mutexes)
    }
}

/// A<sub>i</sub>: nodes applicable in S<sub>i</sub>, no-ops first.
#[derive(Debug, Clone)]
pub struct ActionLevel {
    pub(super) nodes: Vec<NodeKind>,
    pub(super) mutexes: ActionMutexTable,
}

impl ActionLevel {
    pub fn nodes(&self) -> &[NodeKind] {
        &self.nodes
    }

    pub fn position(&self, kind: NodeKind) -> Option<usize> {
        self.nodes.iter().position(|k| *k == kind)
    }

    pub fn contains(&self, kind: NodeKind) -> bool {
        self.position(kind).is_some()
    }

    pub fn mutexes(&self) -> &ActionMutexTable {
        &self.mutexes
    }

    pub fn is_mutex(&self, a: usize, b: usize) -> bool {
        self.mutexes.contains(a, b)
    }
}
