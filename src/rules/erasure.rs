//! Erasure: any element of a positive context may be removed.

use super::{applied, reject, remove_element, Rule, RuleKind};
use crate::core::AEGraph;
use crate::error::{GraphError, PathFault};
use crate::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Erasure;

impl Rule for Erasure {
    fn kind(&self) -> RuleKind {
        RuleKind::Erasure
    }

    fn candidates(&self, graph: &AEGraph) -> Vec<Path> {
        graph.possible_erasures()
    }

    fn apply(&self, graph: &AEGraph, path: &Path) -> Result<AEGraph, GraphError> {
        graph.erase(path)
    }
}

impl AEGraph {
    /// Whether elements of the context at `steps` (of `size` elements) may be
    /// erased. A sole element stays put, except on the sheet root.
    fn erasable_context(&self, steps: &[usize], size: usize) -> bool {
        self.context_polarity(steps.len()).is_positive() && (size != 1 || steps.is_empty())
    }

    /// Paths to every erasable element, sorted.
    pub fn possible_erasures(&self) -> Vec<Path> {
        let mut paths = Vec::new();
        self.walk(|node, steps| {
            if self.erasable_context(steps, node.size()) {
                paths.extend((0..node.size()).map(|i| Path::at(steps, i)));
            }
        });
        paths.sort();
        tracing::trace!(count = paths.len(), "erasure candidates");
        paths
    }

    /// Removes the element at `path` from its positive context.
    pub fn erase(&self, path: &Path) -> Result<AEGraph, GraphError> {
        let kind = RuleKind::Erasure;
        let (context, index) = self.locate(path).map_err(|fault| reject(kind, path, fault))?;
        let parent = &path.steps()[..path.len() - 1];
        if !self.erasable_context(parent, context.size()) {
            return Err(reject(kind, path, PathFault::NotApplicable(kind)));
        }

        let result = self
            .edit_context(parent, |ctx| {
                remove_element(ctx, index);
            })
            .map_err(|fault| reject(kind, path, fault))?;
        Ok(applied(kind, path, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> AEGraph {
        AEGraph::parse(text).unwrap()
    }

    #[test]
    fn only_positive_contexts() {
        let g = parse("(a, [a])");
        assert_eq!(g.possible_erasures(), vec![Path::from([0]), Path::from([1])]);
        assert_eq!(g.erase(&Path::from([1])).unwrap().repr(), "([a])");
        assert_eq!(g.erase(&Path::from([0])).unwrap().repr(), "(a)");
        assert_eq!(
            g.erase(&Path::from([0, 0])).unwrap_err(),
            GraphError::invalid_path(&Path::from([0, 0]), PathFault::NotApplicable(RuleKind::Erasure))
        );
    }

    #[test]
    fn evenly_enclosed_contexts() {
        let g = parse("([[p, q], r])");
        // [p, q] sits inside two cuts
        assert_eq!(
            g.possible_erasures(),
            vec![Path::from([0]), Path::from([0, 0, 0]), Path::from([0, 0, 1])]
        );
        assert_eq!(g.erase(&Path::from([0, 0, 1])).unwrap().repr(), "([[p], r])");
    }

    #[test]
    fn sole_element_is_kept_below_the_root() {
        let g = parse("(x, [[p]])");
        assert_eq!(g.possible_erasures(), vec![Path::from([0]), Path::from([1])]);
        assert!(g.erase(&Path::from([0, 0, 0])).is_err());

        let lone = parse("(a)");
        assert_eq!(lone.possible_erasures(), vec![Path::from([0])]);
        assert_eq!(lone.erase(&Path::from([0])).unwrap().repr(), "()");
    }

    #[test]
    fn cut_root_is_negative() {
        // The root cut encloses its own content, so [b, c] is evenly enclosed.
        let g = parse("[a, [b, c]]");
        assert_eq!(g.possible_erasures(), vec![Path::from([0, 0]), Path::from([0, 1])]);
        assert!(g.erase(&Path::from([1])).is_err());
        assert_eq!(g.erase(&Path::from([0, 1])).unwrap().repr(), "[[b], a]");
        assert!(parse("[a]").possible_erasures().is_empty());
    }

    #[test]
    fn nothing_to_erase_in_empty_sheet() {
        assert!(parse("()").possible_erasures().is_empty());
        assert!(matches!(
            parse("()").erase(&Path::from([0])),
            Err(GraphError::InvalidPath { fault: PathFault::OutOfRange { .. }, .. })
        ));
    }

    #[test]
    fn erasure_shrinks_the_graph() {
        let g = parse("(a, b, [c, [d, e]], [[f, g], h])");
        let before = g.total_atom_count() + g.total_subgraph_count();
        for path in g.possible_erasures() {
            let out = g.erase(&path).unwrap();
            assert!(out.total_atom_count() + out.total_subgraph_count() < before);
            assert!(Erasure.is_applicable(&g, &path));
        }
    }
}
