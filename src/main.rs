use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::warn;

use strips_planner::config::Config;
use strips_planner::experiment::{self, Algorithm, Strategy};
use strips_planner::heuristic::HeuristicKind;
use strips_planner::pddl::{domains, Problem};

#[derive(Parser)]
#[command(name = "strips-planner", about = "Compare search strategies and planning graph heuristics on STRIPS problems")]
struct Cli {
    /// TOML run configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Built-in problem to solve (repeatable)
    #[arg(short, long = "problem")]
    problems: Vec<String>,

    /// TOML problem file to solve (repeatable)
    #[arg(long = "problem-file")]
    problem_files: Vec<PathBuf>,

    /// Search algorithm, replaces the configured strategies
    #[arg(short, long)]
    algorithm: Option<Algorithm>,

    /// Heuristic for greedy-best-first and astar
    #[arg(long)]
    heuristic: Option<HeuristicKind>,

    /// Maximum planning graph levels
    #[arg(long)]
    max_levels: Option<usize>,

    /// Make real actions in the same level mutually exclusive
    #[arg(long)]
    serialize: bool,

    /// Print the built-in problems and exit
    #[arg(long)]
    list: bool,
}

impl Cli {
    /// Config file values, then command line overrides.
    fn resolve(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path).with_context(|| format!("failed to load config {}", path.display()))?,
            None => Config::default(),
        };
        if !self.problems.is_empty() || !self.problem_files.is_empty() {
            config.run.problems = self.problems.clone();
            config.run.problem_files = self.problem_files.clone();
        }
        if let Some(algorithm) = self.algorithm {
            config.run.strategies = vec![Strategy::new(algorithm, self.heuristic)?];
        } else if self.heuristic.is_some() {
            warn!("--heuristic has no effect without --algorithm");
        }
        if self.max_levels.is_some() {
            config.graph.max_levels = self.max_levels;
        }
        config.graph.serialize |= self.serialize;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if cli.list {
        for name in domains::NAMES.iter() {
            println!("{}", name);
        }
        return Ok(());
    }

    let config = cli.resolve()?;
    let mut problems: Vec<Problem> = Vec::new();
    for name in &config.run.problems {
        problems.push(domains::by_name(name)?);
    }
    for path in &config.run.problem_files {
        problems.push(Problem::load(path).with_context(|| format!("failed to load problem {}", path.display()))?);
    }

    for problem in &problems {
        for strategy in &config.run.strategies {
            let report = experiment::run(problem, strategy, config.graph)?;
            print!("{}", report);
        }
    }
    Ok(())
}
