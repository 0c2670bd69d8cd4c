use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use super::action::Action;
use super::literal::{Atom, Literal};
use crate::error::{Error, Result};
use crate::search::SearchSpace;

/// Search node: the atoms true in a world. Absent atoms are false.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct State(pub BTreeSet<Atom>);

impl State {
    pub fn new(atoms: impl IntoIterator<Item = Atom>) -> Self {
        State(atoms.into_iter().collect())
    }

    pub fn holds(&self, literal: &Literal) -> bool {
        self.0.contains(&literal.atom) == literal.positive
    }

    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.0.iter()
    }
}

pub struct Problem {
    pub name: String,
    /// Every atom the problem can talk about, sorted.
    pub fluents: Vec<Atom>,
    pub initial: State,
    pub goal: Vec<Literal>,
    pub actions: Vec<Action>,
}

impl Problem {
    pub fn new(name: &str, fluents: Vec<Atom>, initial: State, goal: Vec<Literal>, actions: Vec<Action>) -> Result<Self> {
        for action in &actions {
            action.validate()?;
        }
        let mut universe: BTreeSet<Atom> = fluents.into_iter().collect();
        universe.extend(initial.atoms().cloned());
        universe.extend(goal.iter().map(|l| l.atom.clone()));
        universe.extend(actions.iter().flat_map(|a| a.atoms().cloned()));
        Ok(Self { name: name.to_owned(), fluents: universe.into_iter().collect(), initial, goal, actions })
    }

    pub fn from_toml(code: &str) -> Result<Self> {
        let file: ProblemFile = toml::from_str(code)?;
        Problem::new(&file.name, file.fluents, State::new(file.init), file.goal, file.actions)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let code = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Problem::from_toml(&code)
    }

    pub fn is_applicable(&self, state: &State, action: &Action) -> bool {
        action.preconditions().all(|l| state.holds(&l))
    }

    pub fn applicable<'a>(&'a self, state: &'a State) -> impl Iterator<Item = (usize, &'a Action)> + 'a {
        self.actions.iter().enumerate().filter(move |(_, a)| self.is_applicable(state, a))
    }

    pub fn result(&self, state: &State, action: &Action) -> State {
        let mut next = state.clone();
        for atom in &action.effect_rem {
            next.0.remove(atom);
        }
        next.0.extend(action.effect_add.iter().cloned());
        next
    }

    pub fn goal_test(&self, state: &State) -> bool {
        self.goal.iter().all(|l| state.holds(l))
    }

    pub fn unmet_goals(&self, state: &State) -> u32 {
        self.goal.iter().filter(|l| !state.holds(l)).count() as u32
    }
}

impl SearchSpace for Problem {
    type Node = State;
    type Step = usize;

    fn start(&self) -> State {
        self.initial.clone()
    }

    fn is_goal(&self, node: &State) -> bool {
        self.goal_test(node)
    }

    fn successors(&self, node: &State) -> Vec<(usize, State, u32)> {
        self.applicable(node).map(|(idx, action)| (idx, self.result(node, action), 1)).collect()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ProblemFile {
    name: String,
    #[serde(default)]
    fluents: Vec<Atom>,
    #[serde(default)]
    init: Vec<Atom>,
    goal: Vec<Literal>,
    #[serde(default)]
    actions: Vec<Action>,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{Problem, State};
    use crate::error::Error;
    use crate::pddl::literal::{Atom, Literal};

    const CAKE: &str = r#"
name = "have-cake"
init = ["Have(Cake)"]
goal = ["Have(Cake)", "Eaten(Cake)"]

[[actions]]
name = "Eat(Cake)"
precond_pos = ["Have(Cake)"]
effect_add = ["Eaten(Cake)"]
effect_rem = ["Have(Cake)"]

[[actions]]
name = "Bake(Cake)"
precond_neg = ["Have(Cake)"]
effect_add = ["Have(Cake)"]
"#;

    #[test]
    fn test_from_toml() {
        let problem = Problem::from_toml(CAKE).unwrap();
        assert_eq!(problem.name, "have-cake");
        assert_eq!(problem.fluents, vec!["Eaten(Cake)".parse::<Atom>().unwrap(), "Have(Cake)".parse().unwrap()]);
        assert_eq!(problem.actions.len(), 2);
        assert_eq!(problem.unmet_goals(&problem.initial), 1);
        let applicable: Vec<usize> = problem.applicable(&problem.initial).map(|(i, _)| i).collect();
        assert_eq!(applicable, vec![0]);
        let eaten = problem.result(&problem.initial, &problem.actions[0]);
        assert!(eaten.holds(&"Eaten(Cake)".parse::<Literal>().unwrap()));
        assert!(eaten.holds(&"~Have(Cake)".parse::<Literal>().unwrap()));
        let baked = problem.result(&eaten, &problem.actions[1]);
        assert!(problem.goal_test(&baked));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().expect("Unable to create temporary file");
        write!(file.as_file_mut(), "{}", CAKE).expect("Unable to write to tempfile");
        let problem = Problem::load(file.path()).unwrap();
        assert_eq!(problem.goal.len(), 2);
        assert!(matches!(Problem::load(std::path::Path::new("/nonexistent/problem.toml")), Err(Error::Io { .. })));
    }

    #[test]
    fn test_rejects_bad_actions() {
        let code = "name = \"bad\"\ngoal = []\n[[actions]]\nname = \"Flip\"\neffect_add = [\"P\"]\neffect_rem = [\"P\"]\n";
        assert!(matches!(Problem::from_toml(code), Err(Error::InvalidActionDefinition { .. })));
        assert!(matches!(Problem::from_toml("name = \"x\"\ngoal = [\"At(\"]"), Err(Error::Toml(_))));
    }

    #[test]
    fn test_negative_goal() {
        let p: Atom = "P".parse().unwrap();
        let problem = Problem::new("neg", vec![], State::new(vec![p.clone()]), vec![p.negative()], vec![]).unwrap();
        assert!(!problem.goal_test(&problem.initial));
        assert!(problem.goal_test(&State::default()));
        assert_eq!(problem.fluents, vec![p]);
    }
}
