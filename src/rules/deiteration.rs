//! Deiteration: a copy of an element nested inside a sibling cut may be
//! removed, since the outer occurrence already asserts it there.
//!
//! Candidate search lays the graph out in preorder, so every subtree is a
//! contiguous id range. Occurrences of each atom and of each cut shape are
//! listed in preorder too; the copies of an element that sit below one of
//! its sibling cuts are then a sub-range found by binary search. Ranges for
//! the same key are merged before paths are built, keeping the search close
//! to linear in the size of the graph plus the number of candidates.

use super::{applied, reject, remove_element, Rule, RuleKind};
use crate::core::AEGraph;
use crate::error::{GraphError, PathFault};
use crate::path::Path;
use crate::shape::{ShapeId, ShapeIndex};
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Deiteration;

impl Rule for Deiteration {
    fn kind(&self) -> RuleKind {
        RuleKind::Deiteration
    }

    fn candidates(&self, graph: &AEGraph) -> Vec<Path> {
        graph.possible_deiterations()
    }

    fn apply(&self, graph: &AEGraph, path: &Path) -> Result<AEGraph, GraphError> {
        graph.deiterate(path)
    }

    fn is_applicable(&self, graph: &AEGraph, path: &Path) -> bool {
        graph.locate(path).is_ok() && graph.is_deiterable(path)
    }
}

/// One context in preorder.
struct Slot<'a> {
    node: &'a AEGraph,
    parent: usize,
    /// Index of this cut in its parent's subgraph list.
    step: usize,
    /// Last preorder id inside this subtree.
    end: usize,
}

/// Every context of a graph in preorder; id 0 is the root.
struct Layout<'a> {
    slots: Vec<Slot<'a>>,
}

impl<'a> Layout<'a> {
    fn new(root: &'a AEGraph) -> Self {
        let mut slots: Vec<Slot<'a>> = Vec::new();
        let mut stack = vec![(root, 0usize, 0usize)];
        while let Some((node, parent, step)) = stack.pop() {
            let id = slots.len();
            slots.push(Slot { node, parent, step, end: id });
            stack.extend(
                node.subgraphs
                    .iter()
                    .enumerate()
                    .rev()
                    .map(|(i, sg)| (sg.as_ref(), id, i)),
            );
        }
        for id in (1..slots.len()).rev() {
            let (end, parent) = (slots[id].end, slots[id].parent);
            slots[parent].end = slots[parent].end.max(end);
        }
        Self { slots }
    }

    /// Ids of the child cuts of `id`, in subgraph order.
    fn children(&self, id: usize) -> Vec<usize> {
        let mut children = Vec::with_capacity(self.slots[id].node.subgraphs.len());
        let mut next = id + 1;
        for _ in 0..self.slots[id].node.subgraphs.len() {
            children.push(next);
            next = self.slots[next].end + 1;
        }
        children
    }

    /// Cut steps from the root to `id`.
    fn steps(&self, mut id: usize) -> Vec<usize> {
        let mut steps = Vec::new();
        while id != 0 {
            steps.push(self.slots[id].step);
            id = self.slots[id].parent;
        }
        steps.reverse();
        steps
    }
}

/// Coalesces overlapping or touching `[lo, hi)` ranges.
fn merged(mut spans: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    spans.sort_unstable();
    let mut out: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
    for (lo, hi) in spans {
        match out.last_mut() {
            Some(last) if lo <= last.1 => last.1 = last.1.max(hi),
            _ => out.push((lo, hi)),
        }
    }
    out
}

/// Records the sites whose context id lies in `first..=last`, if any.
fn add_span<K: Eq + Hash, T>(
    spans: &mut HashMap<K, Vec<(usize, usize)>>,
    key: K,
    sites: &[T],
    context: impl Fn(&T) -> usize,
    (first, last): (usize, usize),
) {
    let lo = sites.partition_point(|site| context(site) < first);
    let hi = sites.partition_point(|site| context(site) <= last);
    if lo < hi {
        spans.entry(key).or_default().push((lo, hi));
    }
}

impl AEGraph {
    /// Paths to every removable copy, sorted and deduplicated.
    ///
    /// An atom of a context may be removed from any context inside one of
    /// that context's child cuts. A child cut may be removed from anywhere
    /// strictly inside one of its sibling cuts. A copy that is the only
    /// element of its own context is kept.
    pub fn possible_deiterations(&self) -> Vec<Path> {
        let layout = Layout::new(self);
        let shapes = ShapeIndex::of(self);

        // Occurrences, in preorder of the context holding them.
        let mut atom_sites: HashMap<&str, Vec<(usize, usize)>> = HashMap::new();
        let mut cut_sites: HashMap<ShapeId, Vec<usize>> = HashMap::new();
        for (id, slot) in layout.slots.iter().enumerate() {
            if slot.node.size() > 1 {
                let offset = slot.node.subgraphs.len();
                for (i, atom) in slot.node.atoms.iter().enumerate() {
                    atom_sites.entry(atom.as_str()).or_default().push((id, offset + i));
                }
            }
            if id > 0 && layout.slots[slot.parent].node.size() > 1 {
                if let Some(shape) = shapes.get(slot.node) {
                    cut_sites.entry(shape).or_default().push(id);
                }
            }
        }

        let mut atom_spans: HashMap<&str, Vec<(usize, usize)>> = HashMap::new();
        let mut cut_spans: HashMap<ShapeId, Vec<(usize, usize)>> = HashMap::new();
        for (id, slot) in layout.slots.iter().enumerate() {
            let children = layout.children(id);
            if children.is_empty() {
                continue;
            }

            let mut atoms: Vec<&str> = slot.node.atoms.iter().map(String::as_str).collect();
            atoms.dedup();
            for atom in atoms {
                if let Some(sites) = atom_sites.get(atom) {
                    for &child in &children {
                        let end = layout.slots[child].end;
                        add_span(&mut atom_spans, atom, sites, |&(ctx, _)| ctx, (child, end));
                    }
                }
            }

            let labels: Vec<Option<ShapeId>> =
                children.iter().map(|&c| shapes.get(layout.slots[c].node)).collect();
            let mut counts: HashMap<ShapeId, usize> = HashMap::new();
            for &label in labels.iter().flatten() {
                *counts.entry(label).or_default() += 1;
            }
            for (&child, own) in children.iter().zip(&labels) {
                let end = layout.slots[child].end;
                if end == child {
                    continue;
                }
                for (&shape, &count) in &counts {
                    let others = count - usize::from(*own == Some(shape));
                    if others == 0 {
                        continue;
                    }
                    if let Some(sites) = cut_sites.get(&shape) {
                        // strictly inside the child
                        add_span(&mut cut_spans, shape, sites, |&site| site, (child + 1, end));
                    }
                }
            }
        }

        let mut found = Vec::new();
        for (atom, spans) in atom_spans {
            if let Some(sites) = atom_sites.get(atom) {
                for (lo, hi) in merged(spans) {
                    found.extend(
                        sites[lo..hi]
                            .iter()
                            .map(|&(ctx, element)| Path::at(&layout.steps(ctx), element)),
                    );
                }
            }
        }
        for (shape, spans) in cut_spans {
            if let Some(sites) = cut_sites.get(&shape) {
                for (lo, hi) in merged(spans) {
                    found.extend(sites[lo..hi].iter().map(|&site| Path::new(layout.steps(site))));
                }
            }
        }
        found.sort();
        tracing::trace!(count = found.len(), "deiteration candidates");
        found
    }

    /// Whether the element at `path` has a copy in an enclosing context,
    /// outside the child cut that leads down to it.
    fn is_deiterable(&self, path: &Path) -> bool {
        let Some((steps, last)) = path.split_last() else {
            return false;
        };
        let mut ancestors: Vec<&AEGraph> = Vec::with_capacity(steps.len());
        let mut node = self;
        for &index in steps {
            ancestors.push(node);
            match node.subgraphs.get(index) {
                Some(next) => node = next.as_ref(),
                None => return false,
            }
        }
        if node.size() <= 1 {
            return false;
        }

        let subgraphs = node.subgraphs.len();
        if last < subgraphs {
            let shapes = ShapeIndex::of(self);
            let wanted = shapes.get(&node.subgraphs[last]);
            ancestors.iter().zip(steps).any(|(context, &j)| {
                context
                    .subgraphs
                    .iter()
                    .enumerate()
                    .any(|(i, sg)| i != j && shapes.get(sg) == wanted)
            })
        } else {
            match node.atoms.get(last - subgraphs) {
                Some(atom) => ancestors
                    .iter()
                    .any(|context| context.atoms.binary_search(atom).is_ok()),
                None => false,
            }
        }
    }

    /// Removes the copy at `path`.
    pub fn deiterate(&self, path: &Path) -> Result<AEGraph, GraphError> {
        let kind = RuleKind::Deiteration;
        let (_, index) = self.locate(path).map_err(|fault| reject(kind, path, fault))?;
        if !self.is_deiterable(path) {
            return Err(reject(kind, path, PathFault::NotApplicable(kind)));
        }

        let parent = &path.steps()[..path.len() - 1];
        let result = self
            .edit_context(parent, |ctx| {
                remove_element(ctx, index);
            })
            .map_err(|fault| reject(kind, path, fault))?;
        Ok(applied(kind, path, result))
    }
}
