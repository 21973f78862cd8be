use std::fmt;

use thiserror::Error;

/// Errors from repository/storage operations (used by trait definitions in buildman-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors from requests against the live game server.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    #[error("request to {path} failed: {message}")]
    Transport { path: String, message: String },

    #[error("request to {path} returned HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

/// One step of an orchestration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeStep {
    Fraction,
    Skill,
    Army,
    Inventory,
    AttributeReset,
    AttributeAllocate,
}

impl fmt::Display for ChangeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeStep::Fraction => "fraction",
            ChangeStep::Skill => "skill",
            ChangeStep::Army => "army",
            ChangeStep::Inventory => "inventory",
            ChangeStep::AttributeReset => "attribute-reset",
            ChangeStep::AttributeAllocate => "attribute-allocate",
        };
        f.write_str(name)
    }
}

/// Errors that abort an orchestration run.
///
/// Completed steps are never rolled back; the live account may be left
/// partially migrated.
#[derive(Debug, Error)]
pub enum ChangeError {
    #[error("{step} step failed: {source}")]
    Remote {
        step: ChangeStep,
        #[source]
        source: RemoteError,
    },

    #[error("unknown fraction '{0}'")]
    UnknownFraction(String),

    #[error("unknown inventory set '{0}'")]
    UnknownInventory(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors from operations that read the live account into local state.
#[derive(Debug, Error)]
pub enum LiveError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),

    #[error("build '{0}' not found")]
    BuildNotFound(String),
}

/// Why an import payload was rejected. Detected before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("payload is not an array")]
    NotAnArray,

    #[error("entry {index} is malformed: {reason}")]
    Malformed { index: usize, reason: String },

    #[error("entry {index} has an empty {field}")]
    EmptyField { index: usize, field: &'static str },

    #[error("entry {index} references unknown fraction '{id}'")]
    UnknownFraction { index: usize, id: String },

    #[error("entry {index} references unknown inventory set '{id}'")]
    UnknownInventory { index: usize, id: String },

    #[error("entry {index} references unknown skill '{id}'")]
    UnknownSkill { index: usize, id: String },

    #[error("entry {index} lists skill '{id}' more than once")]
    DuplicateSkill { index: usize, id: String },

    #[error("entry {index} reuses id '{id}'")]
    DuplicateId { index: usize, id: String },
}
