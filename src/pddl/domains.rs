use super::action::Action;
use super::literal::{Atom, Literal};
use super::problem::{Problem, State};
use crate::error::{Error, Result};

pub const NAMES: [&str; 5] = ["air-cargo-p1", "air-cargo-p2", "air-cargo-p3", "air-cargo-p4", "have-cake"];

pub fn by_name(name: &str) -> Result<Problem> {
    match name {
        "air-cargo-p1" => air_cargo_p1(),
        "air-cargo-p2" => air_cargo_p2(),
        "air-cargo-p3" => air_cargo_p3(),
        "air-cargo-p4" => air_cargo_p4(),
        "have-cake" => have_cake(),
        _ => Err(Error::UnknownProblem(name.to_owned())),
    }
}

fn at(thing: &str, place: &str) -> Atom {
    Atom::new("At", &[thing, place])
}

fn cargo_in(cargo: &str, plane: &str) -> Atom {
    Atom::new("In", &[cargo, plane])
}

/// Grounds Load, Unload and Fly over every cargo, plane and airport combination.
fn air_cargo_actions(cargos: &[&str], planes: &[&str], airports: &[&str]) -> Vec<Action> {
    let mut actions = Vec::new();
    for &c in cargos {
        for &p in planes {
            for &a in airports {
                actions.push(Action::new(
                    &format!("Load({}, {}, {})", c, p, a),
                    vec![at(c, a), at(p, a)],
                    vec![],
                    vec![cargo_in(c, p)],
                    vec![at(c, a)],
                ));
                actions.push(Action::new(
                    &format!("Unload({}, {}, {})", c, p, a),
                    vec![cargo_in(c, p), at(p, a)],
                    vec![],
                    vec![at(c, a)],
                    vec![cargo_in(c, p)],
                ));
            }
        }
    }
    for &p in planes {
        for &from in airports {
            for &to in airports.iter().filter(|&&to| to != from) {
                actions.push(Action::new(&format!("Fly({}, {}, {})", p, from, to), vec![at(p, from)], vec![], vec![at(p, to)], vec![at(p, from)]));
            }
        }
    }
    actions
}

fn air_cargo(name: &str, cargos: &[&str], planes: &[&str], airports: &[&str], init: &[(&str, &str)], goal: &[(&str, &str)]) -> Result<Problem> {
    let initial = State::new(init.iter().map(|(thing, place)| at(thing, place)));
    let goal: Vec<Literal> = goal.iter().map(|(thing, place)| at(thing, place).positive()).collect();
    Problem::new(name, Vec::new(), initial, goal, air_cargo_actions(cargos, planes, airports))
}

pub fn air_cargo_p1() -> Result<Problem> {
    air_cargo(
        "air-cargo-p1",
        &["C1", "C2"],
        &["P1", "P2"],
        &["JFK", "SFO"],
        &[("C1", "SFO"), ("C2", "JFK"), ("P1", "SFO"), ("P2", "JFK")],
        &[("C1", "JFK"), ("C2", "SFO")],
    )
}

pub fn air_cargo_p2() -> Result<Problem> {
    air_cargo(
        "air-cargo-p2",
        &["C1", "C2", "C3"],
        &["P1", "P2", "P3"],
        &["JFK", "SFO", "ATL"],
        &[("C1", "SFO"), ("C2", "JFK"), ("C3", "ATL"), ("P1", "SFO"), ("P2", "JFK"), ("P3", "ATL")],
        &[("C1", "JFK"), ("C2", "SFO"), ("C3", "SFO")],
    )
}

pub fn air_cargo_p3() -> Result<Problem> {
    air_cargo(
        "air-cargo-p3",
        &["C1", "C2", "C3", "C4"],
        &["P1", "P2"],
        &["JFK", "SFO", "ATL", "ORD"],
        &[("C1", "SFO"), ("C2", "JFK"), ("C3", "ATL"), ("C4", "ORD"), ("P1", "SFO"), ("P2", "JFK")],
        &[("C1", "JFK"), ("C3", "JFK"), ("C2", "SFO"), ("C4", "SFO")],
    )
}

pub fn air_cargo_p4() -> Result<Problem> {
    air_cargo(
        "air-cargo-p4",
        &["C1", "C2", "C3", "C4", "C5"],
        &["P1", "P2", "P3"],
        &["JFK", "SFO", "ATL", "ORD"],
        &[("C1", "SFO"), ("C2", "JFK"), ("C3", "ATL"), ("C4", "ORD"), ("C5", "ORD"), ("P1", "SFO"), ("P2", "JFK"), ("P3", "ATL")],
        &[("C1", "JFK"), ("C2", "SFO"), ("C3", "JFK"), ("C4", "SFO"), ("C5", "ATL")],
    )
}

/// The textbook cake problem: eating the cake removes it, baking needs it gone.
pub fn have_cake() -> Result<Problem> {
    let have = Atom::new("Have", &["Cake"]);
    let eaten = Atom::new("Eaten", &["Cake"]);
    let eat = Action::new("Eat(Cake)", vec![have.clone()], vec![], vec![eaten.clone()], vec![have.clone()]);
    let bake = Action::new("Bake(Cake)", vec![], vec![have.clone()], vec![have.clone()], vec![]);
    Problem::new("have-cake", Vec::new(), State::new(vec![have.clone()]), vec![have.positive(), eaten.positive()], vec![eat, bake])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_cargo_sizes() {
        let p1 = air_cargo_p1().unwrap();
        // 2*2*2 loads + as many unloads + 2*2*1 flights
        assert_eq!(p1.actions.len(), 20);
        // At(cargo, airport), At(plane, airport), In(cargo, plane)
        assert_eq!(p1.fluents.len(), 12);
        assert!(p1.actions.iter().any(|a| a.name == "Fly(P1, SFO, JFK)"));
        assert!(!p1.goal_test(&p1.initial));
    }

    #[test]
    fn test_by_name() {
        for name in NAMES.iter() {
            assert_eq!(by_name(name).unwrap().name, *name);
        }
        assert!(matches!(by_name("air-cargo-p9"), Err(Error::UnknownProblem(_))));
    }
}
