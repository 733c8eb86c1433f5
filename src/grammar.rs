//! Reading the textual notation.
//!
//! ```text
//! Graph     := '(' ElemList ')'      outer sheet
//!            | '[' ElemList ']'      cut
//! ElemList  := ε | Elem (',' Elem)*
//! Elem      := Atom | Graph          a nested Graph starts with '['
//! Atom      := any token not starting with '['
//! ```
//!
//! Whitespace around tokens and delimiters is ignored. An atom runs to the
//! next comma or closing bracket outside its own brackets, so `x[1, 2]` is
//! one atom. Writing is the `Display` impl on [`AEGraph`]; the two are
//! inverse on canonical graphs.
//!
//! The body is read in one left-to-right pass with a stack of open cuts.
//! Contexts are laid out in a [`NodeArena`] as they are opened and assembled
//! bottom-up afterwards, so input nesting depth is bounded only by
//! [`GrammarConfig::max_depth`], not by the call stack.

use crate::arena::{ArenaNodeId, NodeArena};
use crate::config::GrammarConfig;
use crate::core::{AEGraph, ContextKind};
use crate::error::ParseError;
use std::str::FromStr;
use std::sync::Arc;

/// A context as laid out during parsing, before canonical assembly.
#[derive(Debug)]
struct RawContext {
    kind: ContextKind,
    atoms: Vec<String>,
    children: Vec<ArenaNodeId>,
}

impl RawContext {
    fn new(kind: ContextKind) -> Self {
        Self {
            kind,
            atoms: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// What the scanner accepts next in the current context.
#[derive(Debug, Clone, Copy)]
enum Slot {
    /// Start of a list: an element or the closing bracket.
    Start,
    /// After a comma: an element must follow.
    AfterComma,
    /// Inside an atom starting at body offset `start`, with `nest` of its
    /// own brackets still open.
    Atom { start: usize, nest: usize },
    /// Right after a cut that opened at input offset `open_at`.
    Closed { open_at: usize },
}

/// Single-pass reader for the body of the outermost context.
struct Scanner<'t> {
    body: &'t str,
    /// Input offset of `body`.
    base: usize,
    max_depth: usize,
    arena: NodeArena<RawContext>,
    current: ArenaNodeId,
    /// Contexts enclosing `current`, each with the offset of the `[` that
    /// opened the context above it.
    open: Vec<(ArenaNodeId, usize)>,
}

impl<'t> Scanner<'t> {
    fn new(kind: ContextKind, body: &'t str, base: usize, max_depth: usize) -> Self {
        let mut arena = NodeArena::new();
        let current = arena.allocate(RawContext::new(kind));
        Self {
            body,
            base,
            max_depth,
            arena,
            current,
            open: Vec::new(),
        }
    }

    fn run(mut self) -> Result<NodeArena<RawContext>, ParseError> {
        let body = self.body;
        let mut slot = Slot::Start;
        for (i, c) in body.char_indices() {
            let at = self.base + i;
            slot = match (slot, c) {
                (Slot::Atom { start, nest }, '[') => Slot::Atom { start, nest: nest + 1 },
                (Slot::Atom { start, nest }, ']') if nest > 0 => Slot::Atom { start, nest: nest - 1 },
                (Slot::Atom { start, nest: 0 }, ',') => {
                    self.push_atom(start, i);
                    Slot::AfterComma
                }
                (Slot::Atom { start, nest: 0 }, ']') => {
                    self.push_atom(start, i);
                    self.close(at)?
                }
                (atom @ Slot::Atom { .. }, _) => atom,
                (slot, c) if c.is_whitespace() => slot,
                (Slot::Start | Slot::AfterComma, '[') => self.open_cut(at)?,
                (Slot::Start, ']') | (Slot::Closed { .. }, ']') => self.close(at)?,
                (Slot::Start | Slot::AfterComma, ',') | (Slot::AfterComma, ']') => {
                    return Err(ParseError::EmptyElement { offset: at })
                }
                (Slot::Start | Slot::AfterComma, _) => Slot::Atom { start: i, nest: 0 },
                (Slot::Closed { .. }, ',') => Slot::AfterComma,
                (Slot::Closed { .. }, '[') => return Err(ParseError::Unbalanced { offset: at }),
                (Slot::Closed { open_at }, close) => {
                    return Err(ParseError::MismatchedDelimiter {
                        offset: open_at,
                        open: '[',
                        close,
                    })
                }
            };
        }

        let end = self.base + body.len();
        if !self.open.is_empty() {
            return Err(ParseError::Unbalanced { offset: end });
        }
        match slot {
            Slot::Atom { nest: 0, start } => self.push_atom(start, body.len()),
            Slot::Atom { .. } => return Err(ParseError::Unbalanced { offset: end }),
            Slot::AfterComma => return Err(ParseError::EmptyElement { offset: end }),
            Slot::Start | Slot::Closed { .. } => {}
        }
        Ok(self.arena)
    }

    fn push_atom(&mut self, start: usize, end: usize) {
        let atom = self.body[start..end].trim_end().to_string();
        if let Some(context) = self.arena.get_mut(self.current) {
            context.atoms.push(atom);
        }
    }

    fn open_cut(&mut self, at: usize) -> Result<Slot, ParseError> {
        if self.open.len() + 1 > self.max_depth {
            return Err(ParseError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }
        let child = self.arena.allocate(RawContext::new(ContextKind::Cut));
        if let Some(parent) = self.arena.get_mut(self.current) {
            parent.children.push(child);
        }
        self.open.push((self.current, at));
        self.current = child;
        Ok(Slot::Start)
    }

    fn close(&mut self, at: usize) -> Result<Slot, ParseError> {
        let (parent, open_at) = self.open.pop().ok_or(ParseError::Unbalanced { offset: at })?;
        self.current = parent;
        Ok(Slot::Closed { open_at })
    }
}

impl AEGraph {
    /// Parses a graph with the default [`GrammarConfig`].
    pub fn parse(text: &str) -> Result<AEGraph, ParseError> {
        Self::parse_with(text, &GrammarConfig::default())
    }

    /// Parses a graph, returning it in canonical form.
    ///
    /// `(...)` at the top level is a sheet of assertion, `[...]` a cut.
    pub fn parse_with(text: &str, config: &GrammarConfig) -> Result<AEGraph, ParseError> {
        let lead = text.len() - text.trim_start().len();
        let input = text.trim();

        let mut ends = input.chars();
        let (open, close) = match (ends.next(), ends.next_back()) {
            (Some(open), Some(close)) => (open, close),
            (Some(only), None) => {
                return Err(ParseError::MismatchedDelimiter {
                    offset: lead,
                    open: only,
                    close: only,
                })
            }
            _ => return Err(ParseError::EmptyInput),
        };
        let kind = match (open, close) {
            ('(', ')') => ContextKind::Sheet,
            ('[', ']') => ContextKind::Cut,
            _ => {
                return Err(ParseError::MismatchedDelimiter {
                    offset: lead,
                    open,
                    close,
                })
            }
        };
        let body = &input[1..input.len() - 1];
        let arena = Scanner::new(kind, body, lead + 1, config.max_depth).run()?;

        let contexts = arena.len();
        let graph = assemble(arena).ok_or(ParseError::EmptyInput)?;
        tracing::trace!(contexts, "parsed graph");
        Ok(graph)
    }
}

/// Builds the canonical tree from the arena, children before parents.
fn assemble(mut arena: NodeArena<RawContext>) -> Option<AEGraph> {
    let mut built: Vec<Option<AEGraph>> = Vec::with_capacity(arena.len());
    built.resize_with(arena.len(), || None);

    let ids: Vec<ArenaNodeId> = arena.ids_rev().collect();
    for id in ids {
        let Some(raw) = arena.take(id) else {
            continue;
        };
        let subgraphs = raw
            .children
            .iter()
            .filter_map(|child| built[child.as_u32() as usize].take())
            .map(Arc::new)
            .collect();
        let mut graph = AEGraph {
            kind: raw.kind,
            atoms: raw.atoms,
            subgraphs,
        };
        graph.sort_local();
        built[id.as_u32() as usize] = Some(graph);
    }
    built.into_iter().next().flatten()
}

impl FromStr for AEGraph {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AEGraph::parse(s)
    }
}
