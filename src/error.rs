//! Error types for parsing and rule application.
//!
//! Parse failures and path failures are distinct, recoverable values. Nothing
//! in this crate panics on bad input; out-of-range `child` access is the one
//! documented fallback that is not an error at all.

use crate::fingerprint::HashValue;
use crate::path::Path;
use crate::rules::RuleKind;
use thiserror::Error;

/// Failure to read a graph from its textual notation.
///
/// Offsets are byte offsets into the original input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty input")]
    EmptyInput,
    #[error("mismatched delimiters at {offset}: '{open}' closed by '{close}'")]
    MismatchedDelimiter {
        offset: usize,
        open: char,
        close: char,
    },
    #[error("unbalanced brackets at {offset}")]
    Unbalanced { offset: usize },
    #[error("empty element at {offset}")]
    EmptyElement { offset: usize },
    #[error("nesting depth exceeds limit of {limit}")]
    DepthLimitExceeded { limit: usize },
}

/// Why a path was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathFault {
    #[error("path is empty")]
    Empty,
    #[error("step {step}: index {index} out of range (len {len})")]
    OutOfRange { step: usize, index: usize, len: usize },
    #[error("{0} is not applicable here")]
    NotApplicable(RuleKind),
}

/// Crate-level error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("invalid path {path}: {fault}")]
    InvalidPath { path: Path, fault: PathFault },
    #[error("stale candidate: computed on {expected}, applied to {found}")]
    StaleCandidate { expected: HashValue, found: HashValue },
}

impl GraphError {
    pub(crate) fn invalid_path(path: &Path, fault: PathFault) -> Self {
        Self::InvalidPath {
            path: path.clone(),
            fault,
        }
    }
}
