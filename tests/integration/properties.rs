//! Property tests over generated vaults.

use std::path::{Path, PathBuf};

use proptest::prelude::*;
use zettelgraph::tree::{Entry, HierarchyBuilder};
use zettelgraph::{is_valid_identifier, next_child_id, parent_of};

/// Valid identifiers up to three segments below the root token.
fn identifier() -> impl Strategy<Value = String> {
    let segments = prop::collection::vec((0u8..6, 1u8..=12), 0..4);
    (1u8..=9, segments, prop::option::of(prop::bool::ANY)).prop_map(
        |(root, segments, role)| {
            let mut id = format!("{:02}", root);
            for (i, (letter, number)) in segments.iter().enumerate() {
                if i % 2 == 0 {
                    id.push((b'a' + letter) as char);
                } else {
                    id.push_str(&format!("{:02}", number));
                }
            }
            match role {
                Some(true) => id.push('%'),
                Some(false) => id.push('&'),
                None => {}
            }
            id
        },
    )
}

fn vault() -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::vec((identifier(), 0usize..3, prop::bool::ANY), 1..40).prop_map(|notes| {
        let mut entries = vec![Entry::directory_at("/v/sub")];
        for (i, (id, name, nested)) in notes.into_iter().enumerate() {
            let folder = if nested { "/v/sub" } else { "/v" };
            let ext = if i % 3 == 0 { "py" } else { "md" };
            entries.push(Entry::file_at(format!("{}/{} Note{}.{}", folder, id, name, ext)));
        }
        entries
    })
}

proptest! {
    #[test]
    fn generated_identifiers_are_valid(id in identifier()) {
        prop_assert!(is_valid_identifier(&id));
    }

    #[test]
    fn every_non_root_node_has_exactly_one_parent(entries in vault()) {
        let graph = HierarchyBuilder::new("/v").build(&entries);
        let root = PathBuf::from("/v");
        for node in graph.nodes() {
            if node.path == root {
                prop_assert!(graph.parent(&node.path).is_none());
                continue;
            }
            prop_assert!(graph.parent(&node.path).is_some(), "orphan: {}", node.path.display());
            let holders = graph
                .edges()
                .values()
                .filter(|children| children.contains(&node.path))
                .count();
            prop_assert_eq!(holders, 1);
        }
        prop_assert_eq!(graph.edge_count(), graph.node_count() - 1);
    }

    #[test]
    fn every_node_reaches_the_root(entries in vault()) {
        let graph = HierarchyBuilder::new("/v").build(&entries);
        for node in graph.nodes().filter(|n| n.path != Path::new("/v")) {
            let chain = graph.ancestors(&node.path);
            prop_assert_eq!(chain.last().map(|n| n.path.clone()), Some(PathBuf::from("/v")));
        }
    }

    #[test]
    fn building_is_idempotent(entries in vault()) {
        let builder = HierarchyBuilder::new("/v");
        prop_assert_eq!(builder.build(&entries).snapshot(), builder.build(&entries).snapshot());
    }

    #[test]
    fn allocated_ids_round_trip(entries in vault()) {
        let graph = HierarchyBuilder::new("/v").build(&entries);
        for node in graph.nodes() {
            let Some(structural) = node.structural_identifier() else { continue };
            match next_child_id(&graph, &node.path) {
                Ok(child) => {
                    prop_assert!(is_valid_identifier(&child));
                    prop_assert_eq!(parent_of(&child), Some(structural));
                }
                Err(e) => prop_assert!(e.to_string().contains("No free child")),
            }
        }
    }
}
