//! Planning-graph heuristics for STRIPS problems, plus the search drivers and
//! experiment runner that use them.

pub mod config;
pub mod error;
pub mod experiment;
pub mod graph;
pub mod heuristic;
pub mod pddl;
pub mod search;

pub use error::{Error, Result};
