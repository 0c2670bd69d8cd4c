use thiserror::Error;

/// Errors raised while defining problems, building planning graphs or loading files.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid action definition {action}: {reason}")]
    InvalidActionDefinition { action: String, reason: String },

    #[error("initial literals contain both {0} and its negation")]
    ContradictoryInitialState(String),

    #[error("invalid literal {text:?}: {reason}")]
    InvalidLiteral { text: String, reason: String },

    #[error("unknown problem {0:?}")]
    UnknownProblem(String),

    #[error("unknown search algorithm {0:?} (expected breadth-first, depth-first, uniform-cost, greedy-best-first or astar)")]
    UnknownAlgorithm(String),

    #[error("unknown heuristic {0:?} (expected unmet-goals, level-sum, max-level or set-level)")]
    UnknownHeuristic(String),

    #[error("{0} search needs a heuristic")]
    MissingHeuristic(String),

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_action(action: &str, reason: impl Into<String>) -> Self {
        Self::InvalidActionDefinition { action: action.to_owned(), reason: reason.into() }
    }

    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io { path: path.display().to_string(), source }
    }
}
