//! Inference rules of the Alpha system.
//!
//! Every rule has a candidate query (`possible_*`, all legal locations as
//! sorted paths) and an apply operation returning a new canonical graph. Apply
//! operations check their path against the graph they are given and reject it
//! with [`GraphError::InvalidPath`] rather than rewriting the wrong element.
//!
//! Rewrites are persistent: only the contexts on the path from the root to
//! the edited context are copied, everything else is shared with the input.
//!
//! The [`Rule`] trait gives the rules a common face, and [`candidates`] /
//! [`apply_candidate`] work with snapshot-stamped moves across all of them.

mod deiteration;
mod double_cut;
mod erasure;

pub use deiteration::Deiteration;
pub use double_cut::{DoubleCut, DoubleCutInsertion};
pub use erasure::Erasure;

use crate::core::AEGraph;
use crate::error::{GraphError, PathFault};
use crate::fingerprint::HashValue;
use crate::path::Path;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifies an inference rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    DoubleCut,
    DoubleCutInsertion,
    Erasure,
    Deiteration,
}

impl RuleKind {
    /// Every rule, in candidate-listing order.
    pub const ALL: [RuleKind; 4] = [
        RuleKind::DoubleCut,
        RuleKind::DoubleCutInsertion,
        RuleKind::Erasure,
        RuleKind::Deiteration,
    ];

    /// The rule implementation for this kind.
    pub fn rule(self) -> &'static dyn Rule {
        match self {
            RuleKind::DoubleCut => &DoubleCut,
            RuleKind::DoubleCutInsertion => &DoubleCutInsertion,
            RuleKind::Erasure => &Erasure,
            RuleKind::Deiteration => &Deiteration,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::DoubleCut => "double cut",
            RuleKind::DoubleCutInsertion => "double cut insertion",
            RuleKind::Erasure => "erasure",
            RuleKind::Deiteration => "deiteration",
        };
        f.write_str(name)
    }
}

/// A rewrite rule on existential graphs.
///
/// Implementors are stateless unit structs; the inherent `AEGraph` methods do
/// the work.
pub trait Rule {
    /// Which rule this is.
    fn kind(&self) -> RuleKind;

    /// All paths at which the rule applies, sorted and without duplicates.
    fn candidates(&self, graph: &AEGraph) -> Vec<Path>;

    /// Applies the rule at `path`.
    fn apply(&self, graph: &AEGraph, path: &Path) -> Result<AEGraph, GraphError>;

    /// True if `path` is one of [`candidates`](Rule::candidates).
    fn is_applicable(&self, graph: &AEGraph, path: &Path) -> bool {
        self.candidates(graph).binary_search(path).is_ok()
    }
}

/// A legal move, stamped with the fingerprint of the graph it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub rule: RuleKind,
    pub path: Path,
    pub snapshot: HashValue,
}

/// Every legal move on `graph` across all rules.
///
/// Grouped by rule in [`RuleKind::ALL`] order, paths sorted within a group.
pub fn candidates(graph: &AEGraph) -> Vec<Candidate> {
    let snapshot = graph.fingerprint();
    let mut moves = Vec::new();
    for kind in RuleKind::ALL {
        let paths = kind.rule().candidates(graph);
        tracing::trace!(rule = %kind, count = paths.len(), "candidates");
        moves.extend(paths.into_iter().map(|path| Candidate {
            rule: kind,
            path,
            snapshot,
        }));
    }
    moves
}

/// Applies a stamped candidate, rejecting it if `graph` is not the graph it
/// was computed on.
pub fn apply_candidate(graph: &AEGraph, candidate: &Candidate) -> Result<AEGraph, GraphError> {
    let found = graph.fingerprint();
    if found != candidate.snapshot {
        tracing::warn!(
            rule = %candidate.rule,
            path = %candidate.path,
            expected = %candidate.snapshot,
            found = %found,
            "stale candidate rejected"
        );
        return Err(GraphError::StaleCandidate {
            expected: candidate.snapshot,
            found,
        });
    }
    candidate.rule.rule().apply(graph, &candidate.path)
}

/// An element taken out of a context.
#[derive(Debug)]
pub(crate) enum Removed {
    Atom(String),
    Cut(Arc<AEGraph>),
}

/// Removes element `index` (cuts first, then atoms) from `context`.
pub(crate) fn remove_element(context: &mut AEGraph, index: usize) -> Option<Removed> {
    let subgraphs = context.subgraphs.len();
    if index < subgraphs {
        Some(Removed::Cut(context.subgraphs.remove(index)))
    } else if index - subgraphs < context.atoms.len() {
        Some(Removed::Atom(context.atoms.remove(index - subgraphs)))
    } else {
        None
    }
}

impl AEGraph {
    /// Resolves an element path to its enclosing context and element index.
    pub(crate) fn locate(&self, path: &Path) -> Result<(&AEGraph, usize), PathFault> {
        let (parent, last) = path.split_last().ok_or(PathFault::Empty)?;
        let context = self.descend(parent)?;
        if last >= context.size() {
            return Err(PathFault::OutOfRange {
                step: parent.len(),
                index: last,
                len: context.size(),
            });
        }
        Ok((context, last))
    }

    /// Copies the spine down to the context at `steps`, lets `edit` change
    /// that context, and re-canonicalizes the copied spine bottom-up.
    ///
    /// Contexts off the spine are shared with `self`.
    pub(crate) fn edit_context<F>(&self, steps: &[usize], edit: F) -> Result<AEGraph, PathFault>
    where
        F: FnOnce(&mut AEGraph),
    {
        let mut spine: Vec<&AEGraph> = Vec::with_capacity(steps.len() + 1);
        spine.push(self);
        for (step, &index) in steps.iter().enumerate() {
            let node = spine[step];
            let next = node.subgraphs.get(index).ok_or(PathFault::OutOfRange {
                step,
                index,
                len: node.subgraphs.len(),
            })?;
            spine.push(next);
        }

        let mut current = spine[steps.len()].clone();
        edit(&mut current);
        current.sort_local();
        for (depth, &index) in steps.iter().enumerate().rev() {
            let mut parent = spine[depth].clone();
            parent.subgraphs[index] = Arc::new(current);
            parent.sort_subgraphs();
            current = parent;
        }
        Ok(current)
    }
}

/// Logs and builds a rejection.
pub(crate) fn reject(rule: RuleKind, path: &Path, fault: PathFault) -> GraphError {
    tracing::warn!(rule = %rule, path = %path, fault = %fault, "path rejected");
    GraphError::invalid_path(path, fault)
}

/// Logs a completed rewrite.
pub(crate) fn applied(rule: RuleKind, path: &Path, result: AEGraph) -> AEGraph {
    if tracing::enabled!(tracing::Level::DEBUG) {
        tracing::debug!(
            rule = %rule,
            path = %path,
            fingerprint = %result.fingerprint(),
            "rewrite applied"
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> AEGraph {
        AEGraph::parse(text).unwrap()
    }

    #[test]
    fn rule_kind_names() {
        assert_eq!(RuleKind::DoubleCut.to_string(), "double cut");
        assert_eq!(RuleKind::Erasure.to_string(), "erasure");
        for kind in RuleKind::ALL {
            assert_eq!(kind.rule().kind(), kind);
        }
        assert_eq!(serde_json::to_string(&RuleKind::DoubleCutInsertion).unwrap(), "\"double_cut_insertion\"");
    }

    #[test]
    fn edit_shares_untouched_contexts() {
        let g = parse("([[p], q], [r, s], t)");
        // canonical: ([[p], q], [r, s], t); edit the second cut
        let edited = g
            .edit_context(&[1], |ctx| {
                ctx.atoms.retain(|a| a != "s");
            })
            .unwrap();
        assert_eq!(edited.repr(), "([[p], q], [r], t)");
        assert!(Arc::ptr_eq(&g.subgraphs[0], &edited.subgraphs[0]));
        assert_eq!(g.repr(), "([[p], q], [r, s], t)");
    }

    #[test]
    fn edit_resorts_the_spine() {
        let g = parse("([a], [b])");
        let edited = g.edit_context(&[0], |ctx| ctx.atoms[0] = "c".to_string()).unwrap();
        assert_eq!(edited.repr(), "([b], [c])");
        assert!(edited.is_canonical());
    }

    #[test]
    fn edit_rejects_bad_steps() {
        let g = parse("([a])");
        assert_eq!(
            g.edit_context(&[0, 0], |_| {}).unwrap_err(),
            PathFault::OutOfRange { step: 1, index: 0, len: 0 }
        );
    }

    #[test]
    fn locate_checks_every_step() {
        let g = parse("(a, [b])");
        assert_eq!(g.locate(&Path::root()).unwrap_err(), PathFault::Empty);
        assert_eq!(
            g.locate(&Path::from([2])).unwrap_err(),
            PathFault::OutOfRange { step: 0, index: 2, len: 2 }
        );
        let (ctx, index) = g.locate(&Path::from([0, 0])).unwrap();
        assert_eq!((ctx.repr().as_str(), index), ("[b]", 0));
    }

    #[test]
    fn candidates_are_stamped() {
        let g = parse("(a, [[b]])");
        let moves = candidates(&g);
        assert!(moves.iter().all(|c| c.snapshot == g.fingerprint()));
        assert!(moves.contains(&Candidate {
            rule: RuleKind::DoubleCut,
            path: Path::from([0]),
            snapshot: g.fingerprint(),
        }));
        assert!(moves.iter().any(|c| c.rule == RuleKind::Erasure));
    }

    #[test]
    fn every_candidate_applies() {
        let g = parse("(a, [a, b], [[c]], [[a], d])");
        for candidate in candidates(&g) {
            let result = apply_candidate(&g, &candidate);
            assert!(result.is_ok(), "{:?} failed: {:?}", candidate, result);
            assert!(result.unwrap().is_canonical());
        }
    }

    #[test]
    fn stale_candidates_are_rejected() {
        let g = parse("(a, [[b]])");
        let other = parse("(a, [[c]])");
        let candidate = candidates(&g).remove(0);
        assert!(matches!(
            apply_candidate(&other, &candidate),
            Err(GraphError::StaleCandidate { .. })
        ));
        assert!(apply_candidate(&g, &candidate).is_ok());
    }

    #[test]
    fn candidate_serde() {
        let g = parse("(a, b)");
        let candidate = candidates(&g).remove(0);
        let json = serde_json::to_string(&candidate).unwrap();
        let back: Candidate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, candidate);
    }
}
