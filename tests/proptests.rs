//! Property-based tests for aegraph
//!
//! Random graphs are built through the canonical constructors, then checked
//! against the parser, the query layer, and every rule.

use aegraph::prelude::*;
use proptest::prelude::*;

// ===== Strategies for generating test data =====

/// A few atoms from a small alphabet, so copies are common.
fn arb_atoms() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e]", 0..3)
}

/// Random cuts with bounded depth.
fn arb_cut() -> impl Strategy<Value = AEGraph> {
    let leaf = arb_atoms().prop_map(|atoms| AEGraph::cut(atoms, vec![]));
    leaf.prop_recursive(4, 32, 3, |inner| {
        (arb_atoms(), prop::collection::vec(inner, 0..3))
            .prop_map(|(atoms, cuts)| AEGraph::cut(atoms, cuts))
    })
}

/// Random sheets of assertion.
fn arb_graph() -> impl Strategy<Value = AEGraph> {
    (arb_atoms(), prop::collection::vec(arb_cut(), 0..4))
        .prop_map(|(atoms, cuts)| AEGraph::sheet(atoms, cuts))
}

fn weight(graph: &AEGraph) -> usize {
    graph.total_atom_count() + graph.total_subgraph_count()
}

/// Every element path of `graph`: the insertion candidates minus the empty
/// slots.
fn element_paths(graph: &AEGraph) -> Vec<Path> {
    graph
        .possible_double_cut_insertions()
        .into_iter()
        .filter(|path| graph.element_at(path).is_some())
        .collect()
}

// ===== Property Tests =====

proptest! {
    #[test]
    fn prop_text_round_trip(g in arb_graph()) {
        let text = g.repr();
        let back = AEGraph::parse(&text).unwrap();
        prop_assert_eq!(back.repr(), text);
        prop_assert_eq!(back, g);
    }

    #[test]
    fn prop_canonicalization_is_idempotent(g in arb_graph()) {
        prop_assert!(g.is_canonical());
        let once = g.canonicalized();
        prop_assert_eq!(once.repr(), g.repr());
        prop_assert_eq!(once.canonicalized().repr(), g.repr());
    }

    #[test]
    fn prop_atom_paths_resolve(g in arb_graph(), atom in "[a-e]") {
        for path in g.paths_to_atom(&atom) {
            let mut node = g.clone();
            for &step in path.steps() {
                node = node.child(step);
            }
            prop_assert_eq!(node, AEGraph::atom_view(&atom));
        }
    }

    #[test]
    fn prop_subgraph_paths_resolve(g in arb_graph()) {
        for target in g.descendants().flat_map(|node| node.subgraphs()) {
            for path in g.paths_to_subgraph(target) {
                let found = g.element_at(&path).map(|e| e.to_graph());
                prop_assert_eq!(found.as_ref(), Some(target));
            }
        }
    }

    #[test]
    fn prop_subgraph_search_matches_text(g in arb_graph()) {
        for target in g.descendants().flat_map(|node| node.subgraphs()) {
            let expected: Vec<Path> = element_paths(&g)
                .into_iter()
                .filter(|path| match g.element_at(path) {
                    Some(Element::Cut(cut)) => cut.repr() == target.repr(),
                    _ => false,
                })
                .filter(|path| {
                    let parent = Path::from(&path.steps()[..path.len() - 1]);
                    g.context_at(&parent).map_or(false, |ctx| ctx.size() > 1)
                })
                .collect();
            prop_assert_eq!(g.paths_to_subgraph(target), expected);
        }
    }

    #[test]
    fn prop_double_cut_removes_two_cuts(g in arb_graph()) {
        for path in g.possible_double_cuts() {
            let out = g.double_cut(&path).unwrap();
            prop_assert_eq!(out.total_subgraph_count() + 2, g.total_subgraph_count());
            prop_assert_eq!(out.total_atom_count(), g.total_atom_count());
            prop_assert!(out.is_canonical());
        }
    }

    #[test]
    fn prop_double_cut_insertion_is_undone_by_removal(g in arb_graph()) {
        for path in g.possible_double_cut_insertions() {
            let wrapped = g.insert_double_cut(&path).unwrap();
            prop_assert_eq!(wrapped.total_subgraph_count(), g.total_subgraph_count() + 2);
            let undone = wrapped
                .possible_double_cuts()
                .iter()
                .any(|p| wrapped.double_cut(p).map_or(false, |out| out == g));
            prop_assert!(undone);
        }
    }

    #[test]
    fn prop_wrapping_siblings_is_undone_by_removal(g in arb_graph(), mask in any::<u8>()) {
        let picked: Vec<usize> = (0..g.size().min(8)).filter(|i| mask & (1 << i) != 0).collect();
        let wrapped = g.wrap_in_double_cut(&Path::root(), &picked).unwrap();
        prop_assert_eq!(wrapped.size(), g.size() - picked.len() + 1);
        let undone = wrapped
            .possible_double_cuts()
            .iter()
            .any(|p| wrapped.double_cut(p).map_or(false, |out| out == g));
        prop_assert!(undone);
    }

    #[test]
    fn prop_erasure_shrinks(g in arb_graph()) {
        for path in g.possible_erasures() {
            prop_assert_eq!(g.polarity_at(&path), Some(Polarity::Positive));
            let out = g.erase(&path).unwrap();
            prop_assert!(weight(&out) < weight(&g));
        }
    }

    #[test]
    fn prop_deiteration_shrinks(g in arb_graph()) {
        for path in g.possible_deiterations() {
            let out = g.deiterate(&path).unwrap();
            prop_assert!(weight(&out) < weight(&g));
            prop_assert!(out.is_canonical());
        }
    }

    #[test]
    fn prop_deiteration_check_matches_search(g in arb_graph()) {
        let found = g.possible_deiterations();
        for path in element_paths(&g) {
            prop_assert_eq!(
                Deiteration.is_applicable(&g, &path),
                found.binary_search(&path).is_ok(),
                "at {}", path
            );
        }
    }

    #[test]
    fn prop_every_candidate_applies(g in arb_graph()) {
        let moves = candidates(&g);
        for candidate in &moves {
            prop_assert!(candidate.rule.rule().is_applicable(&g, &candidate.path));
            let out = apply_candidate(&g, candidate).unwrap();
            prop_assert_eq!(out.canonicalized().repr(), out.repr());
        }
    }

    #[test]
    fn prop_serde_round_trip(g in arb_graph()) {
        let json = serde_json::to_string(&g).unwrap();
        let back: AEGraph = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, g);
    }
}
