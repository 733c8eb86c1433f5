//! aegraph: Peirce's Alpha existential graphs as canonical trees.
//!
//! An existential graph is propositional logic drawn as nested regions. The
//! sheet of assertion holds what is asserted, juxtaposition is conjunction,
//! and a cut negates whatever it encloses. This crate provides:
//! - a canonical, persistent tree ([`AEGraph`]) whose text form is unique per
//!   graph, so equality is textual equality;
//! - a parser and serializer for the bracket notation `(a, [b], [[c]])`;
//! - structural queries (counts, indexed children, containment, paths);
//! - the Alpha inference rules (double cut, erasure, deiteration), each as a
//!   candidate search plus an apply operation that returns a new graph.
//!
//! # Example
//!
//! ```
//! use aegraph::prelude::*;
//!
//! let graph = AEGraph::parse("(a, [b], [[c]])").unwrap();
//! assert_eq!(graph.repr(), "([[c]], [b], a)");
//!
//! let paths = graph.possible_double_cuts();
//! assert_eq!(paths, vec![Path::from([0])]);
//! let simpler = graph.double_cut(&paths[0]).unwrap();
//! assert_eq!(simpler.repr(), "([b], a, c)");
//! ```
//!
//! # References
//!
//! - Peirce, C.S. "Prolegomena to an Apology for Pragmaticism" (1906)
//! - Roberts, D.D. "The Existential Graphs of Charles S. Peirce" (1973)

pub mod arena;
pub mod config;
pub mod core;
pub mod error;
pub mod fingerprint;
pub mod grammar;
pub mod path;
pub mod query;
pub mod rules;
mod shape;

pub use crate::config::GrammarConfig;
pub use crate::core::{AEGraph, ContextKind, Polarity};
pub use crate::error::{GraphError, ParseError, PathFault};
pub use crate::fingerprint::HashValue;
pub use crate::path::Path;
pub use crate::query::Element;
pub use crate::rules::{apply_candidate, candidates, Candidate, Rule, RuleKind};

/// Prelude for convenient usage.
pub mod prelude {
    pub use crate::config::GrammarConfig;
    pub use crate::core::{AEGraph, ContextKind, Polarity};
    pub use crate::error::{GraphError, ParseError, PathFault};
    pub use crate::fingerprint::HashValue;
    pub use crate::path::Path;
    pub use crate::query::Element;
    pub use crate::rules::{
        apply_candidate, candidates, Candidate, Deiteration, DoubleCut, DoubleCutInsertion, Erasure, Rule,
        RuleKind,
    };
}
