//! Shape labels: structurally identical contexts get the same id.
//!
//! Labels are assigned bottom-up from `(kind, atoms, child labels)`. Children
//! are already in canonical order, so two contexts share a label exactly when
//! they render to the same text. One pass labels a whole graph; after that,
//! comparing two subtrees is an integer comparison instead of a rendering.

use crate::core::{AEGraph, ContextKind};
use std::collections::HashMap;

pub(crate) type ShapeId = u32;

/// Label table for one or more graphs borrowed for `'a`.
///
/// Contexts are keyed by address, so a context shared between graphs through
/// an `Arc` is labelled once.
#[derive(Debug, Default)]
pub(crate) struct ShapeIndex<'a> {
    labels: HashMap<*const AEGraph, ShapeId>,
    table: HashMap<(ContextKind, &'a [String], Vec<ShapeId>), ShapeId>,
}

impl<'a> ShapeIndex<'a> {
    /// Labels every context of `graph`.
    pub(crate) fn of(graph: &'a AEGraph) -> Self {
        let mut index = Self::default();
        index.label(graph);
        index
    }

    /// Labels `graph` and everything below it, returning the label of
    /// `graph` itself.
    pub(crate) fn label(&mut self, graph: &'a AEGraph) -> ShapeId {
        enum Frame<'g> {
            Enter(&'g AEGraph),
            Exit(&'g AEGraph),
        }
        let mut frames = vec![Frame::Enter(graph)];
        while let Some(frame) = frames.pop() {
            match frame {
                Frame::Enter(node) => {
                    if self.labels.contains_key(&address(node)) {
                        continue;
                    }
                    frames.push(Frame::Exit(node));
                    frames.extend(node.subgraphs.iter().map(|sg| Frame::Enter(sg.as_ref())));
                }
                Frame::Exit(node) => {
                    // A shared child can be queued twice before its first exit.
                    if self.labels.contains_key(&address(node)) {
                        continue;
                    }
                    let children: Vec<ShapeId> = node
                        .subgraphs
                        .iter()
                        .filter_map(|sg| self.labels.get(&address(sg)).copied())
                        .collect();
                    let fresh = self.table.len() as ShapeId;
                    let id = *self
                        .table
                        .entry((node.kind, node.atoms.as_slice(), children))
                        .or_insert(fresh);
                    self.labels.insert(address(node), id);
                }
            }
        }
        self.labels.get(&address(graph)).copied().unwrap_or_default()
    }

    /// Label of a context already seen by this index.
    pub(crate) fn get(&self, node: &AEGraph) -> Option<ShapeId> {
        self.labels.get(&address(node)).copied()
    }
}

fn address(node: &AEGraph) -> *const AEGraph {
    node
}
