pub mod action;
pub mod domains;
pub mod literal;
pub mod problem;

pub use action::Action;
pub use literal::{Atom, Literal};
pub use problem::{Problem, State};
