//! error types for the payment ledger

use thiserror::Error;

use crate::ledger::{Path, ValueKind};

pub type Result<T> = std::result::Result<T, Error>;

/// why an invocation aborted
///
/// every variant aborts the whole invocation; the caller's context is never
/// partially updated
#[derive(Debug, Error)]
pub enum Error {
    /// circuit assertion did not hold
    #[error("failed assert: {0}")]
    Assertion(&'static str),

    #[error("argument `{argument}`: expected {expected} bytes, got {found}")]
    ArgumentLength {
        argument: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{circuit}: expected {expected} arguments, got {found}")]
    ArgumentCount {
        circuit: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("unknown circuit `{0}`")]
    UnknownCircuit(String),

    #[error("witness `{name}` failed: {reason}")]
    Witness { name: &'static str, reason: String },

    /// internal or schema failure, a contract bug rather than bad input
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("config error: {0}")]
    Config(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// failures of the ledger state store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("path {0:?} out of range")]
    PathOutOfRange(Path),

    #[error("path {0:?} does not name an array")]
    NotAnArray(Path),

    #[error("path {0:?} does not name a cell")]
    NotACell(Path),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: ValueKind, found: ValueKind },

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("counter at {0:?} overflowed")]
    CounterOverflow(Path),
}

/// witness implementations report failure with this
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct WitnessError(pub String);

impl WitnessError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}
