//! Pairwise mutual exclusion tests between nodes of the same graph level.
//!
//! Every test is a pure function of the two nodes and, for competing needs and
//! inconsistent support, the mutex table of the level below.

use std::collections::BTreeMap;

use enumset::{EnumSet, EnumSetType};

use super::node::{LiteralId, NodeRef};

#[derive(EnumSetType, Debug)]
pub enum ActionMutex {
    /// An effect of one action negates an effect of the other.
    InconsistentEffects,
    /// An effect of one action negates a precondition of the other.
    Interference,
    /// Some pair of preconditions is mutex in the previous literal level.
    CompetingNeeds,
    /// Both are real actions and the graph is serialized.
    Serialization,
}

#[derive(EnumSetType, Debug)]
pub enum LiteralMutex {
    Negation,
    /// No pair of producers in the previous action level is free of mutex.
    InconsistentSupport,
}

/// Mutex pairs of one level, keyed by unordered pair.
#[derive(Debug, Clone)]
pub struct MutexTable<K: Ord + Copy, R: EnumSetType> {
    pairs: BTreeMap<(K, K), EnumSet<R>>,
}

impl<K: Ord + Copy, R: EnumSetType> Default for MutexTable<K, R> {
    fn default() -> Self {
        Self { pairs: BTreeMap::new() }
    }
}

#[inline]
fn key<K: Ord + Copy>(a: K, b: K) -> (K, K) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl<K: Ord + Copy, R: EnumSetType> MutexTable<K, R> {
    /// Records the pair; an empty reason set leaves the table untouched.
    pub fn insert(&mut self, a: K, b: K, reasons: EnumSet<R>) {
        if !reasons.is_empty() {
            self.pairs.insert(key(a, b), reasons);
        }
    }

    pub fn contains(&self, a: K, b: K) -> bool {
        self.pairs.contains_key(&key(a, b))
    }

    pub fn reasons(&self, a: K, b: K) -> EnumSet<R> {
        self.pairs.get(&key(a, b)).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (K, K, EnumSet<R>)> + '_ {
        self.pairs.iter().map(|((a, b), r)| (*a, *b, *r))
    }

    /// Same mutex pairs, regardless of the recorded reasons.
    pub fn same_pairs(&self, other: &Self) -> bool {
        self.pairs.keys().eq(other.pairs.keys())
    }
}

pub type LiteralMutexTable = MutexTable<LiteralId, LiteralMutex>;
pub type ActionMutexTable = MutexTable<usize, ActionMutex>;

fn negates_any(literals: &[LiteralId], others: &[LiteralId]) -> bool {
    literals.iter().any(|l| others.binary_search(&l.complement()).is_ok())
}

pub fn inconsistent_effects(a: &NodeRef, b: &NodeRef) -> bool {
    negates_any(a.effects, b.effects)
}

pub fn interference(a: &NodeRef, b: &NodeRef) -> bool {
    negates_any(a.effects, b.preconditions) || negates_any(b.effects, a.preconditions)
}

pub fn competing_needs(a: &NodeRef, b: &NodeRef, below: &LiteralMutexTable) -> bool {
    a.preconditions.iter().any(|p| b.preconditions.iter().any(|q| below.contains(*p, *q)))
}

pub fn serialized(a: &NodeRef, b: &NodeRef) -> bool {
    !a.is_persistence() && !b.is_persistence()
}

/// All relations that hold between two distinct nodes of one action level.
pub fn action_mutex(a: &NodeRef, b: &NodeRef, below: &LiteralMutexTable, serialize: bool) -> EnumSet<ActionMutex> {
    let mut reasons = EnumSet::new();
    if inconsistent_effects(a, b) {
        reasons.insert(ActionMutex::InconsistentEffects);
    }
    if interference(a, b) {
        reasons.insert(ActionMutex::Interference);
    }
    if competing_needs(a, b, below) {
        reasons.insert(ActionMutex::CompetingNeeds);
    }
    if serialize && serialized(a, b) {
        reasons.insert(ActionMutex::Serialization);
    }
    reasons
}

pub fn negation(p: LiteralId, q: LiteralId) -> bool {
    p.complement() == q
}

/// `producers_*` are positions in the action level below. A node producing both
/// literals is never mutex with itself.
pub fn inconsistent_support(producers_p: &[usize], producers_q: &[usize], actions: &ActionMutexTable) -> bool {
    producers_p.iter().all(|a| producers_q.iter().all(|b| a != b && actions.contains(*a, *b)))
}

pub fn literal_mutex(p: LiteralId, q: LiteralId, producers_p: &[usize], producers_q: &[usize], actions: &ActionMutexTable) -> EnumSet<LiteralMutex> {
    let mut reasons = EnumSet::new();
    if negation(p, q) {
        reasons.insert(LiteralMutex::Negation);
    }
    if inconsistent_support(producers_p, producers_q, actions) {
        reasons.insert(LiteralMutex::InconsistentSupport);
    }
    reasons
}

#[cfg(test)]
mod tests {
    use enumset::EnumSet;

    use super::*;
    use crate::graph::node::{LiteralId, NodeKind, NodeRef};

    fn lit(atom: usize, positive: bool) -> LiteralId {
        LiteralId::new(atom, positive)
    }

    fn node<'a>(idx: usize, pre: &'a [LiteralId], eff: &'a [LiteralId]) -> NodeRef<'a> {
        NodeRef { kind: NodeKind::Ground(idx), preconditions: pre, effects: eff }
    }

    #[test]
    fn test_action_relations() {
        // Eat: Have -> Eaten, ~Have ; Bake: ~Have -> Have
        let (have, eaten) = (lit(1, true), lit(0, true));
        let eat_pre = [have];
        let mut eat_eff = [eaten, have.complement()];
        eat_eff.sort();
        let bake_pre = [have.complement()];
        let bake_eff = [have];
        let eat = node(0, &eat_pre, &eat_eff);
        let bake = node(1, &bake_pre, &bake_eff);
        let noop_have = NodeRef { kind: NodeKind::Persistence(have), preconditions: &eat_pre, effects: &eat_pre };

        assert!(inconsistent_effects(&eat, &bake));
        assert!(!interference(&eat, &bake));
        assert!(inconsistent_effects(&eat, &noop_have));
        assert!(interference(&eat, &noop_have));
        assert!(!serialized(&eat, &noop_have));
        assert!(serialized(&eat, &bake));

        let mut below = LiteralMutexTable::default();
        below.insert(have, have.complement(), EnumSet::only(LiteralMutex::Negation));
        assert!(competing_needs(&eat, &bake, &below));
        assert!(!competing_needs(&eat, &noop_have, &below));

        let reasons = action_mutex(&eat, &bake, &below, false);
        assert_eq!(reasons, ActionMutex::InconsistentEffects | ActionMutex::CompetingNeeds);
        assert!(action_mutex(&eat, &bake, &below, true).contains(ActionMutex::Serialization));
    }

    #[test]
    fn test_table_symmetry() {
        let mut table = ActionMutexTable::default();
        table.insert(4, 2, EnumSet::only(ActionMutex::Interference));
        table.insert(1, 3, EnumSet::empty());
        assert!(table.contains(2, 4));
        assert!(table.contains(4, 2));
        assert!(!table.contains(1, 3));
        assert_eq!(table.reasons(2, 4), table.reasons(4, 2));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_literal_relations() {
        let mut actions = ActionMutexTable::default();
        actions.insert(0, 1, EnumSet::only(ActionMutex::InconsistentEffects));
        actions.insert(0, 2, EnumSet::only(ActionMutex::Interference));
        let (p, q) = (lit(0, true), lit(1, true));
        assert!(inconsistent_support(&[0], &[1, 2], &actions));
        assert!(!inconsistent_support(&[0, 3], &[1], &actions));
        // shared producer
        assert!(!inconsistent_support(&[0], &[0, 1], &actions));
        assert!(negation(p, p.complement()));
        assert!(!negation(p, q));
        assert_eq!(literal_mutex(p, p.complement(), &[0], &[3], &actions), EnumSet::only(LiteralMutex::Negation));
    }
}
