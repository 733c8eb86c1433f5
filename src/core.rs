//! Core data structure for Alpha existential graphs.
//!
//! A graph is a tree of contexts. The root is usually the sheet of assertion;
//! every nested context is a cut (a negation). Each context holds atoms
//! (propositional symbols) and child cuts.
//!
//! # Invariants
//! - Every `AEGraph` value is canonical: atoms are sorted, children are
//!   canonical, and children are sorted by their serialized text. All
//!   constructors and rewrites maintain this; there is no way to observe a
//!   non-canonical value.
//! - Nested contexts are always `ContextKind::Cut`.
//! - Equality, ordering and hashing are defined on the serialized text.
//!
//! Children are shared through `Arc`, so cloning a graph is shallow and a
//! rewrite only copies the spine from the root to the edited context.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Whether a context is the sheet of assertion or a cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// The outermost, unnegated context. Written `( ... )`.
    Sheet,
    /// A negated context. Written `[ ... ]`.
    Cut,
}

impl ContextKind {
    /// Opening delimiter.
    #[inline]
    pub const fn open(self) -> &'static str {
        match self {
            Self::Sheet => "(",
            Self::Cut => "[",
        }
    }

    /// Closing delimiter.
    #[inline]
    pub const fn close(self) -> &'static str {
        match self {
            Self::Sheet => ")",
            Self::Cut => "]",
        }
    }
}

/// Truth polarity of a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// Asserted: an even number of cuts encloses the content.
    Positive,
    /// Denied: an odd number of cuts encloses the content.
    Negative,
}

impl Polarity {
    #[inline]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::Positive)
    }

    /// Polarity after descending through `cuts` more cuts.
    #[inline]
    pub const fn nested(self, cuts: usize) -> Self {
        match (self, cuts % 2) {
            (polarity, 0) => polarity,
            (Self::Positive, _) => Self::Negative,
            (Self::Negative, _) => Self::Positive,
        }
    }
}

/// A context in an existential graph.
#[derive(Debug, Clone)]
pub struct AEGraph {
    pub(crate) kind: ContextKind,
    pub(crate) atoms: Vec<String>,
    pub(crate) subgraphs: Vec<Arc<AEGraph>>,
}

impl AEGraph {
    /// Creates a canonical context of the given kind.
    ///
    /// Children are turned into cuts if they are not already.
    pub fn new<A, S>(kind: ContextKind, atoms: A, subgraphs: Vec<AEGraph>) -> Self
    where
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let subgraphs = subgraphs
            .into_iter()
            .map(|mut child| {
                child.kind = ContextKind::Cut;
                Arc::new(child)
            })
            .collect();
        let mut graph = Self {
            kind,
            atoms: atoms.into_iter().map(Into::into).collect(),
            subgraphs,
        };
        graph.sort_local();
        graph
    }

    /// Creates a sheet of assertion.
    pub fn sheet<A, S>(atoms: A, cuts: Vec<AEGraph>) -> Self
    where
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ContextKind::Sheet, atoms, cuts)
    }

    /// Creates a cut.
    pub fn cut<A, S>(atoms: A, cuts: Vec<AEGraph>) -> Self
    where
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ContextKind::Cut, atoms, cuts)
    }

    /// The empty sheet `()`.
    pub fn empty_sheet() -> Self {
        Self {
            kind: ContextKind::Sheet,
            atoms: Vec::new(),
            subgraphs: Vec::new(),
        }
    }

    /// One-atom view `(atom)` used by indexed child access.
    pub fn atom_view(atom: &str) -> Self {
        Self {
            kind: ContextKind::Sheet,
            atoms: vec![atom.to_string()],
            subgraphs: Vec::new(),
        }
    }

    /// Context kind of this node.
    #[inline]
    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    #[inline]
    pub fn is_sheet(&self) -> bool {
        self.kind == ContextKind::Sheet
    }

    /// Atoms directly in this context, sorted.
    #[inline]
    pub fn atoms(&self) -> &[String] {
        &self.atoms
    }

    /// Child cuts directly in this context, in canonical order.
    pub fn subgraphs(&self) -> impl ExactSizeIterator<Item = &AEGraph> + '_ {
        self.subgraphs.iter().map(|sg| sg.as_ref())
    }

    /// Polarity of the content of this context when it is the root.
    ///
    /// A cut root counts as one enclosing cut, so its content is negative.
    #[inline]
    pub fn root_polarity(&self) -> Polarity {
        match self.kind {
            ContextKind::Sheet => Polarity::Positive,
            ContextKind::Cut => Polarity::Negative,
        }
    }

    /// Serialized canonical text.
    pub fn repr(&self) -> String {
        self.to_string()
    }

    /// Returns a deep copy re-canonicalized from scratch.
    ///
    /// Values are canonical by construction, so the result always equals
    /// `self`; this exists to check that claim.
    pub fn canonicalized(&self) -> AEGraph {
        // Post-order without recursion: expand a frame, then rebuild it once
        // all of its children have been rebuilt.
        enum Frame<'a> {
            Enter(&'a AEGraph),
            Exit(&'a AEGraph),
        }
        let mut frames = vec![Frame::Enter(self)];
        let mut built: Vec<AEGraph> = Vec::new();
        while let Some(frame) = frames.pop() {
            match frame {
                Frame::Enter(node) => {
                    frames.push(Frame::Exit(node));
                    for child in node.subgraphs.iter().rev() {
                        frames.push(Frame::Enter(child));
                    }
                }
                Frame::Exit(node) => {
                    let children = built.split_off(built.len() - node.subgraphs.len());
                    let mut rebuilt = AEGraph {
                        kind: node.kind,
                        atoms: node.atoms.clone(),
                        subgraphs: children.into_iter().map(Arc::new).collect(),
                    };
                    rebuilt.sort_local();
                    built.push(rebuilt);
                }
            }
        }
        built.pop().unwrap_or_else(AEGraph::empty_sheet)
    }

    /// True if every context is locally sorted.
    pub fn is_canonical(&self) -> bool {
        self.descendants().all(|node| {
            node.atoms.windows(2).all(|w| w[0] <= w[1]) && node.subgraphs.windows(2).all(|w| w[0] <= w[1])
        })
    }

    /// The canonical text as a stream of fragments, produced without
    /// recursion and without building the whole string.
    pub(crate) fn tokens(&self) -> Tokens<'_> {
        Tokens {
            stack: vec![Emit::Node(self)],
        }
    }

    fn text_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.tokens().flat_map(str::bytes)
    }

    /// Sorts this context's atoms and children, assuming the children are
    /// already canonical.
    pub(crate) fn sort_local(&mut self) {
        self.atoms.sort();
        self.sort_subgraphs();
    }

    pub(crate) fn sort_subgraphs(&mut self) {
        if self.subgraphs.len() > 1 {
            self.subgraphs.sort();
        }
    }
}

enum Emit<'a> {
    Node(&'a AEGraph),
    Text(&'a str),
}

/// Fragments of a graph's canonical text, in order.
///
/// Comparing two streams stops at the first differing byte, so ordering
/// siblings never renders more than their common prefix.
pub(crate) struct Tokens<'a> {
    stack: Vec<Emit<'a>>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        match self.stack.pop()? {
            Emit::Text(text) => Some(text),
            Emit::Node(node) => {
                self.stack.push(Emit::Text(node.kind.close()));
                // Push in reverse so the first element pops first.
                for (i, atom) in node.atoms.iter().enumerate().rev() {
                    self.stack.push(Emit::Text(atom.as_str()));
                    if node.subgraphs.len() + i > 0 {
                        self.stack.push(Emit::Text(", "));
                    }
                }
                for (i, sg) in node.subgraphs.iter().enumerate().rev() {
                    self.stack.push(Emit::Node(sg.as_ref()));
                    if i > 0 {
                        self.stack.push(Emit::Text(", "));
                    }
                }
                Some(node.kind.open())
            }
        }
    }
}

impl Default for AEGraph {
    fn default() -> Self {
        Self::empty_sheet()
    }
}

impl Drop for AEGraph {
    fn drop(&mut self) {
        // Unlink uniquely owned descendants iteratively so dropping a deeply
        // nested graph does not recurse.
        let mut pending = std::mem::take(&mut self.subgraphs);
        while let Some(child) = pending.pop() {
            if let Ok(mut owned) = Arc::try_unwrap(child) {
                pending.append(&mut owned.subgraphs);
            }
        }
    }
}

impl fmt::Display for AEGraph {
    /// Renders `open child, ..., child, atom, ..., atom close`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in self.tokens() {
            f.write_str(token)?;
        }
        Ok(())
    }
}

impl PartialEq for AEGraph {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AEGraph {}

impl PartialOrd for AEGraph {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AEGraph {
    /// Byte order of the canonical text.
    fn cmp(&self, other: &Self) -> Ordering {
        if std::ptr::eq(self, other) {
            return Ordering::Equal;
        }
        self.text_bytes().cmp(other.text_bytes())
    }
}

impl Hash for AEGraph {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.text_bytes() {
            state.write_u8(byte);
        }
        state.write_u8(0xff);
    }
}

impl serde::Serialize for AEGraph {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for AEGraph {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        AEGraph::parse(&text).map_err(serde::de::Error::custom)
    }
}
