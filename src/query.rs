//! Structural queries: counts, indexed access, containment, and path search.
//!
//! All traversals use an explicit stack, so they are safe on graphs nested
//! far deeper than the call stack would allow.

use crate::core::{AEGraph, Polarity};
use crate::error::PathFault;
use crate::path::Path;
use crate::shape::ShapeIndex;

/// An element of a context, as located by a [`Path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element<'a> {
    /// A propositional symbol.
    Atom(&'a str),
    /// A child cut.
    Cut(&'a AEGraph),
}

impl Element<'_> {
    /// The uniform graph view of this element, as returned by
    /// [`AEGraph::child`].
    pub fn to_graph(&self) -> AEGraph {
        match self {
            Element::Atom(atom) => AEGraph::atom_view(atom),
            Element::Cut(cut) => (*cut).clone(),
        }
    }
}

/// # Counts
impl AEGraph {
    /// Number of atoms directly in this context.
    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Number of cuts directly in this context.
    #[inline]
    pub fn subgraph_count(&self) -> usize {
        self.subgraphs.len()
    }

    /// `atom_count() + subgraph_count()`.
    #[inline]
    pub fn size(&self) -> usize {
        self.atoms.len() + self.subgraphs.len()
    }

    /// Atoms in this context and all nested contexts.
    pub fn total_atom_count(&self) -> usize {
        self.descendants().map(|node| node.atoms.len()).sum()
    }

    /// Cuts nested anywhere inside this context.
    pub fn total_subgraph_count(&self) -> usize {
        self.descendants().map(|node| node.subgraphs.len()).sum()
    }

    /// Deepest cut nesting below this context (0 if it has no cuts).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.subgraphs.iter().map(|sg| (sg.as_ref(), depth + 1)));
        }
        deepest
    }

    /// This context and every nested one, preorder.
    pub fn descendants(&self) -> impl Iterator<Item = &AEGraph> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.subgraphs.iter().rev().map(|sg| sg.as_ref()));
            Some(node)
        })
    }
}

/// # Indexed access
impl AEGraph {
    /// Element `index` of the combined subgraphs-then-atoms sequence.
    ///
    /// Atoms come back as a one-atom view `(atom)`. An index at or beyond
    /// [`size`](Self::size) returns the empty sheet `()` rather than failing.
    pub fn child(&self, index: usize) -> AEGraph {
        let subgraphs = self.subgraphs.len();
        if index < subgraphs {
            return self.subgraphs[index].as_ref().clone();
        }
        match self.atoms.get(index - subgraphs) {
            Some(atom) => AEGraph::atom_view(atom),
            None => AEGraph::empty_sheet(),
        }
    }

    /// Follows `steps` through child cuts.
    pub(crate) fn descend(&self, steps: &[usize]) -> Result<&AEGraph, PathFault> {
        let mut node = self;
        for (step, &index) in steps.iter().enumerate() {
            node = node
                .subgraphs
                .get(index)
                .map(|sg| sg.as_ref())
                .ok_or(PathFault::OutOfRange {
                    step,
                    index,
                    len: node.subgraphs.len(),
                })?;
        }
        Ok(node)
    }

    /// The context reached by treating every step of `path` as a cut index.
    pub fn context_at(&self, path: &Path) -> Option<&AEGraph> {
        self.descend(path.steps()).ok()
    }

    /// The element `path` points at.
    pub fn element_at(&self, path: &Path) -> Option<Element<'_>> {
        let (parent, last) = path.split_last()?;
        let context = self.descend(parent).ok()?;
        let subgraphs = context.subgraphs.len();
        if last < subgraphs {
            Some(Element::Cut(context.subgraphs[last].as_ref()))
        } else {
            context.atoms.get(last - subgraphs).map(|atom| Element::Atom(atom.as_str()))
        }
    }

    /// Polarity of the context the element at `path` sits in.
    ///
    /// `None` if `path` is empty or does not resolve.
    pub fn polarity_at(&self, path: &Path) -> Option<Polarity> {
        self.element_at(path)?;
        Some(self.context_polarity(path.len() - 1))
    }

    /// Polarity of a context reached through `steps` cut steps from the root.
    ///
    /// Polarity counts every enclosing cut, the root included: content of a
    /// cut root is negative, so its first-level cuts are positive.
    pub(crate) fn context_polarity(&self, steps: usize) -> Polarity {
        self.root_polarity().nested(steps)
    }

    /// Preorder walk over this context and every nested one, handing each to
    /// `visit` with its cut steps from `self`.
    ///
    /// One step buffer is shared by the whole walk.
    pub(crate) fn walk<'a>(&'a self, mut visit: impl FnMut(&'a AEGraph, &[usize])) {
        let mut steps: Vec<usize> = Vec::new();
        // (context, cut depth, index in its parent)
        let mut stack: Vec<(&'a AEGraph, usize, usize)> = vec![(self, 0, 0)];
        while let Some((node, depth, index)) = stack.pop() {
            steps.truncate(depth.saturating_sub(1));
            if depth > 0 {
                steps.push(index);
            }
            visit(node, &steps);
            stack.extend(
                node.subgraphs
                    .iter()
                    .enumerate()
                    .rev()
                    .map(|(i, sg)| (sg.as_ref(), depth + 1, i)),
            );
        }
    }
}

/// # Containment and path search
impl AEGraph {
    /// True if `atom` occurs in this context or any nested one.
    pub fn contains_atom(&self, atom: &str) -> bool {
        self.descendants()
            .any(|node| node.atoms.binary_search_by(|a| a.as_str().cmp(atom)).is_ok())
    }

    /// True if a cut equal to `target` occurs anywhere below this context.
    pub fn contains_subgraph(&self, target: &AEGraph) -> bool {
        let mut shapes = ShapeIndex::of(self);
        let wanted = shapes.label(target);
        self.descendants()
            .flat_map(|node| node.subgraphs.iter())
            .any(|sg| shapes.get(sg) == Some(wanted))
    }

    /// Every path to an occurrence of `atom`, sorted.
    ///
    /// An atom that is the only element of its context is skipped.
    pub fn paths_to_atom(&self, atom: &str) -> Vec<Path> {
        let mut paths = Vec::new();
        self.walk(|node, steps| {
            if node.size() > 1 {
                let offset = node.subgraphs.len();
                for (i, a) in node.atoms.iter().enumerate() {
                    if a == atom {
                        paths.push(Path::at(steps, offset + i));
                    }
                }
            }
        });
        paths.sort();
        paths
    }

    /// Every path to a cut equal to `target`, sorted.
    ///
    /// A cut that is the only element of its context is skipped (and searched
    /// inside instead). No match can sit inside another, since a cut is never
    /// equal to one of its own descendants.
    ///
    /// Subtrees are compared by [`ShapeIndex`] label, so the search is linear
    /// in the size of `self` plus `target`.
    pub fn paths_to_subgraph(&self, target: &AEGraph) -> Vec<Path> {
        let mut shapes = ShapeIndex::of(self);
        let wanted = shapes.label(target);
        let mut paths = Vec::new();
        self.walk(|node, steps| {
            if node.size() > 1 {
                for (i, sg) in node.subgraphs.iter().enumerate() {
                    if shapes.get(sg) == Some(wanted) {
                        paths.push(Path::at(steps, i));
                    }
                }
            }
        });
        paths.sort();
        paths
    }
}
