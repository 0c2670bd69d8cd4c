use std::collections::{BTreeSet, HashMap};

use crate::error::Result;
use crate::pddl::{Action, Atom, Literal, Problem, State};

/// Interned literal: `atom index << 1`, low bit set when negated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LiteralId(u32);

impl LiteralId {
    pub fn new(atom: usize, positive: bool) -> Self {
        LiteralId((atom as u32) << 1 | if positive { 0 } else { 1 })
    }

    pub fn atom(self) -> usize {
        (self.0 >> 1) as usize
    }

    pub fn is_positive(self) -> bool {
        self.0 & 1 == 0
    }

    pub fn complement(self) -> Self {
        LiteralId(self.0 ^ 1)
    }
}

/// What an action node stands for inside a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    /// Index into [`GraphDomain::actions`].
    Ground(usize),
    /// No-op carrying a literal to the next level.
    Persistence(LiteralId),
}

/// Ground action compiled down to sorted literal ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionNode {
    pub name: String,
    pub preconditions: Vec<LiteralId>,
    pub effects: Vec<LiteralId>,
}

/// Borrowed view of any node in an action level, ground or persistence.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    pub kind: NodeKind,
    pub preconditions: &'a [LiteralId],
    pub effects: &'a [LiteralId],
}

impl NodeRef<'_> {
    pub fn is_persistence(&self) -> bool {
        matches!(self.kind, NodeKind::Persistence(_))
    }

    pub fn requires(&self, literal: LiteralId) -> bool {
        self.preconditions.binary_search(&literal).is_ok()
    }

    pub fn produces(&self, literal: LiteralId) -> bool {
        self.effects.binary_search(&literal).is_ok()
    }
}

/// Literal universe and ground actions of one problem, compiled once and shared
/// by every planning graph built for it.
#[derive(Debug)]
pub struct GraphDomain {
    atoms: Vec<Atom>,
    atom_mapping: HashMap<Atom, usize>,
    actions: Vec<ActionNode>,
}

impl GraphDomain {
    pub fn new(fluents: &[Atom], actions: &[Action]) -> Result<Self> {
        let mut domain = Self { atoms: Vec::new(), atom_mapping: HashMap::new(), actions: Vec::with_capacity(actions.len()) };
        for atom in fluents {
            domain.intern(atom);
        }
        for action in actions {
            action.validate()?;
            let preconditions = domain.compile(action.preconditions());
            let effects = domain.compile(action.effects());
            domain.actions.push(ActionNode { name: action.name.clone(), preconditions, effects });
        }
        Ok(domain)
    }

    pub fn from_problem(problem: &Problem) -> Result<Self> {
        GraphDomain::new(&problem.fluents, &problem.actions)
    }

    fn intern(&mut self, atom: &Atom) -> usize {
        if let Some(idx) = self.atom_mapping.get(atom) {
            *idx
        } else {
            let idx = self.atoms.len();
            self.atoms.push(atom.clone());
            self.atom_mapping.insert(atom.clone(), idx);
            idx
        }
    }

    fn compile(&mut self, literals: impl Iterator<Item = Literal>) -> Vec<LiteralId> {
        let mut ids: Vec<LiteralId> = literals.map(|l| LiteralId::new(self.intern(&l.atom), l.positive)).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn actions(&self) -> &[ActionNode] {
        &self.actions
    }

    /// `None` when the literal is outside the domain's universe.
    pub fn literal_id(&self, literal: &Literal) -> Option<LiteralId> {
        self.atom_mapping.get(&literal.atom).map(|idx| LiteralId::new(*idx, literal.positive))
    }

    pub fn literal(&self, id: LiteralId) -> Literal {
        let atom = &self.atoms[id.atom()];
        if id.is_positive() {
            atom.positive()
        } else {
            atom.negative()
        }
    }

    /// Closed-world completion of `state`: every atom appears with exactly one
    /// polarity. Atoms unknown to the domain are ignored.
    pub fn closed_world(&self, state: &State) -> BTreeSet<LiteralId> {
        (0..self.atoms.len()).map(|idx| LiteralId::new(idx, state.0.contains(&self.atoms[idx]))).collect()
    }

    pub fn node<'a>(&'a self, kind: &'a NodeKind) -> NodeRef<'a> {
        match kind {
            NodeKind::Ground(idx) => {
                let action = &self.actions[*idx];
                NodeRef { kind: *kind, preconditions: &action.preconditions, effects: &action.effects }
            }
            NodeKind::Persistence(literal) => {
                NodeRef { kind: *kind, preconditions: std::slice::from_ref(literal), effects: std::slice::from_ref(literal) }
            }
        }
    }

    pub fn node_name(&self, kind: NodeKind) -> String {
        match kind {
            NodeKind::Ground(idx) => self.actions[idx].name.clone(),
            NodeKind::Persistence(literal) => format!("NoOp({})", self.literal(literal)),
        }
    }
}
