//! TOML run configuration: graph options plus the problems and strategies to run.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::experiment::{Algorithm, Strategy};
use crate::graph::GraphOptions;
use crate::heuristic::HeuristicKind;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub graph: GraphOptions,
    pub run: RunConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Built-in problems, by name.
    pub problems: Vec<String>,
    pub problem_files: Vec<PathBuf>,
    pub strategies: Vec<Strategy>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            problems: vec!["air-cargo-p1".to_owned()],
            problem_files: Vec::new(),
            strategies: vec![
                Strategy { algorithm: Algorithm::BreadthFirst, heuristic: None },
                Strategy { algorithm: Algorithm::Astar, heuristic: Some(HeuristicKind::LevelSum) },
            ],
        }
    }
}

impl Config {
    pub fn from_toml(code: &str) -> Result<Self> {
        let config: Config = toml::from_str(code)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let code = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Config::from_toml(&code)
    }

    pub fn validate(&self) -> Result<()> {
        self.run.strategies.iter().try_for_each(Strategy::validate)
    }
}
