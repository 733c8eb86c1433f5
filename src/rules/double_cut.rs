//! Double cut: two nested cuts with nothing between them cancel out.
//!
//! Removal and insertion are both legal in any context. Insertion can wrap
//! a single element, a set of sibling elements, or nothing at all (an empty
//! double cut `[[]]` added to a context).

use super::{applied, reject, remove_element, Removed, Rule, RuleKind};
use crate::core::{AEGraph, ContextKind};
use crate::error::{GraphError, PathFault};
use crate::path::Path;
use std::sync::Arc;

/// Removal of a double cut `[[x]]`, leaving `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DoubleCut;

impl Rule for DoubleCut {
    fn kind(&self) -> RuleKind {
        RuleKind::DoubleCut
    }

    fn candidates(&self, graph: &AEGraph) -> Vec<Path> {
        graph.possible_double_cuts()
    }

    fn apply(&self, graph: &AEGraph, path: &Path) -> Result<AEGraph, GraphError> {
        graph.double_cut(path)
    }
}

/// Insertion of a double cut around any element, or of an empty one into
/// any context.
///
/// A path whose last step equals the size of its context names the empty
/// slot after the last element; inserting there adds `[[]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DoubleCutInsertion;

impl Rule for DoubleCutInsertion {
    fn kind(&self) -> RuleKind {
        RuleKind::DoubleCutInsertion
    }

    fn candidates(&self, graph: &AEGraph) -> Vec<Path> {
        graph.possible_double_cut_insertions()
    }

    fn apply(&self, graph: &AEGraph, path: &Path) -> Result<AEGraph, GraphError> {
        graph.insert_double_cut(path)
    }

    fn is_applicable(&self, graph: &AEGraph, path: &Path) -> bool {
        graph.insertion_slot(path).is_ok()
    }
}

impl AEGraph {
    /// True if this context is a cut holding exactly one cut and no atoms.
    fn is_double_cut(&self) -> bool {
        self.kind == ContextKind::Cut && self.atoms.is_empty() && self.subgraphs.len() == 1
    }

    /// Paths to every cut whose whole content is a single cut, sorted.
    pub fn possible_double_cuts(&self) -> Vec<Path> {
        let mut paths = Vec::new();
        self.walk(|node, steps| {
            for (i, sg) in node.subgraphs.iter().enumerate() {
                if sg.is_double_cut() {
                    paths.push(Path::at(steps, i));
                }
            }
        });
        paths.sort();
        tracing::trace!(count = paths.len(), "double cut candidates");
        paths
    }

    /// Removes the double cut at `path`, splicing the inner content into the
    /// enclosing context.
    ///
    /// `([[c]], a)` at `[0]` becomes `(a, c)`.
    pub fn double_cut(&self, path: &Path) -> Result<AEGraph, GraphError> {
        let kind = RuleKind::DoubleCut;
        let (context, index) = self.locate(path).map_err(|fault| reject(kind, path, fault))?;
        let is_double = context
            .subgraphs
            .get(index)
            .map_or(false, |sg| sg.is_double_cut());
        if !is_double {
            return Err(reject(kind, path, PathFault::NotApplicable(kind)));
        }

        let parent = &path.steps()[..path.len() - 1];
        let result = self
            .edit_context(parent, |ctx| {
                if let Some(Removed::Cut(outer)) = remove_element(ctx, index) {
                    if let Some(inner) = outer.subgraphs.first() {
                        ctx.atoms.extend(inner.atoms.iter().cloned());
                        ctx.subgraphs.extend(inner.subgraphs.iter().cloned());
                    }
                }
            })
            .map_err(|fault| reject(kind, path, fault))?;
        Ok(applied(kind, path, result))
    }

    /// Every element path plus one empty slot per context, sorted.
    ///
    /// The slot of a context is the index one past its last element, so even
    /// the empty sheet `()` has a candidate, `[0]`.
    pub fn possible_double_cut_insertions(&self) -> Vec<Path> {
        let mut paths = Vec::new();
        self.walk(|node, steps| paths.extend((0..=node.size()).map(|i| Path::at(steps, i))));
        paths.sort();
        tracing::trace!(count = paths.len(), "double cut insertion candidates");
        paths
    }

    /// Resolves an insertion path to its context steps and the element it
    /// wraps (`None` for the empty slot).
    fn insertion_slot<'p>(&self, path: &'p Path) -> Result<(&'p [usize], Option<usize>), PathFault> {
        let (parent, last) = path.split_last().ok_or(PathFault::Empty)?;
        let size = self.descend(parent)?.size();
        match last.cmp(&size) {
            std::cmp::Ordering::Less => Ok((parent, Some(last))),
            std::cmp::Ordering::Equal => Ok((parent, None)),
            std::cmp::Ordering::Greater => Err(PathFault::OutOfRange {
                step: parent.len(),
                index: last,
                len: size + 1,
            }),
        }
    }

    /// Wraps the element at `path` in two cuts: `x` becomes `[[x]]`. At the
    /// empty slot of a context, adds `[[]]` to it.
    pub fn insert_double_cut(&self, path: &Path) -> Result<AEGraph, GraphError> {
        let kind = RuleKind::DoubleCutInsertion;
        let (context, element) = self.insertion_slot(path).map_err(|fault| reject(kind, path, fault))?;
        let elements: Vec<usize> = element.into_iter().collect();
        let result = self
            .wrapped(context, &elements)
            .map_err(|fault| reject(kind, path, fault))?;
        Ok(applied(kind, path, result))
    }

    /// Wraps the listed elements of the context at `context` together in one
    /// double cut. No elements adds an empty `[[]]`.
    ///
    /// `([c], a, b)` with context `[]` and elements `[1, 2]` becomes
    /// `([[a, b]], [c])`.
    pub fn wrap_in_double_cut(&self, context: &Path, elements: &[usize]) -> Result<AEGraph, GraphError> {
        let kind = RuleKind::DoubleCutInsertion;
        let target = self
            .descend(context.steps())
            .map_err(|fault| reject(kind, context, fault))?;
        let mut picked = elements.to_vec();
        picked.sort_unstable();
        if let Some(&index) = picked.last().filter(|&&index| index >= target.size()) {
            let fault = PathFault::OutOfRange {
                step: context.len(),
                index,
                len: target.size(),
            };
            return Err(reject(kind, &context.child(index), fault));
        }
        if let Some(pair) = picked.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(reject(kind, &context.child(pair[0]), PathFault::NotApplicable(kind)));
        }

        let result = self
            .wrapped(context.steps(), &picked)
            .map_err(|fault| reject(kind, context, fault))?;
        Ok(applied(kind, context, result))
    }

    /// Moves `elements` (distinct, in range) of the context at `context`
    /// into a new double cut there.
    fn wrapped(&self, context: &[usize], elements: &[usize]) -> Result<AEGraph, PathFault> {
        self.edit_context(context, |ctx| {
            let mut picked = elements.to_vec();
            picked.sort_unstable();
            let mut inner = AEGraph {
                kind: ContextKind::Cut,
                atoms: Vec::new(),
                subgraphs: Vec::new(),
            };
            // Highest index first, so the lower ones stay valid.
            for &index in picked.iter().rev() {
                match remove_element(ctx, index) {
                    Some(Removed::Atom(atom)) => inner.atoms.push(atom),
                    Some(Removed::Cut(cut)) => inner.subgraphs.push(cut),
                    None => {}
                }
            }
            inner.sort_local();
            ctx.subgraphs.push(Arc::new(AEGraph {
                kind: ContextKind::Cut,
                atoms: Vec::new(),
                subgraphs: vec![Arc::new(inner)],
            }));
        })
    }
}
