//! Paths: snapshot-relative locations inside a graph.
//!
//! A path is a sequence of child indices starting at the root. Every step but
//! the last selects a cut by its index in the canonical subgraph list. The
//! last step selects an element of the context reached so far, in the
//! combined sequence of subgraphs followed by atoms (so an atom index is
//! offset by that context's subgraph count).
//!
//! A path only means something against the exact graph it was computed on.
//! After any rewrite it must be recomputed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of an element within a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<usize>);

impl Path {
    /// Creates a path from its steps.
    #[inline]
    pub fn new(steps: Vec<usize>) -> Self {
        Self(steps)
    }

    /// The empty path (the root itself).
    #[inline]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns the steps.
    #[inline]
    pub fn steps(&self) -> &[usize] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Splits into the steps leading to the parent context and the final
    /// element index. `None` for the empty path.
    pub fn split_last(&self) -> Option<(&[usize], usize)> {
        self.0.split_last().map(|(last, parent)| (parent, *last))
    }

    /// Returns a new path with `step` appended.
    pub fn child(&self, step: usize) -> Self {
        Self::at(&self.0, step)
    }

    /// The path to element `index` of the context at `context`.
    pub(crate) fn at(context: &[usize], index: usize) -> Self {
        let mut steps = Vec::with_capacity(context.len() + 1);
        steps.extend_from_slice(context);
        steps.push(index);
        Self(steps)
    }
}

impl From<Vec<usize>> for Path {
    fn from(steps: Vec<usize>) -> Self {
        Self(steps)
    }
}

impl From<&[usize]> for Path {
    fn from(steps: &[usize]) -> Self {
        Self(steps.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Path {
    fn from(steps: [usize; N]) -> Self {
        Self(steps.to_vec())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", step)?;
        }
        write!(f, "]")
    }
}
