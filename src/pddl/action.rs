use std::fmt;

use serde::Deserialize;

use super::literal::{Atom, Literal};
use crate::error::{Error, Result};

/// Ground STRIPS action. All four sets hold atoms; polarity comes from the set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Action {
    pub name: String,
    #[serde(default)]
    pub precond_pos: Vec<Atom>,
    #[serde(default)]
    pub precond_neg: Vec<Atom>,
    #[serde(default)]
    pub effect_add: Vec<Atom>,
    #[serde(default)]
    pub effect_rem: Vec<Atom>,
}

impl Action {
    pub fn new(name: &str, precond_pos: Vec<Atom>, precond_neg: Vec<Atom>, effect_add: Vec<Atom>, effect_rem: Vec<Atom>) -> Self {
        Self { name: name.to_owned(), precond_pos, precond_neg, effect_add, effect_rem }
    }

    /// Signed preconditions: `precond_pos` followed by negated `precond_neg`.
    pub fn preconditions(&self) -> impl Iterator<Item = Literal> + '_ {
        self.precond_pos.iter().map(Atom::positive).chain(self.precond_neg.iter().map(Atom::negative))
    }

    /// Signed effects: `effect_add` followed by negated `effect_rem`.
    pub fn effects(&self) -> impl Iterator<Item = Literal> + '_ {
        self.effect_add.iter().map(Atom::positive).chain(self.effect_rem.iter().map(Atom::negative))
    }

    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.precond_pos.iter().chain(&self.precond_neg).chain(&self.effect_add).chain(&self.effect_rem)
    }

    /// Rejects actions that require an atom both true and false, or that add and
    /// remove the same atom.
    pub fn validate(&self) -> Result<()> {
        if let Some(atom) = self.precond_pos.iter().find(|a| self.precond_neg.contains(a)) {
            return Err(Error::invalid_action(&self.name, format!("preconditions require both {} and ~{}", atom, atom)));
        }
        if let Some(atom) = self.effect_add.iter().find(|a| self.effect_rem.contains(a)) {
            return Err(Error::invalid_action(&self.name, format!("effects assert both {} and ~{}", atom, atom)));
        }
        Ok(())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
