use std::path::Path;

use zettelgraph::tree::{Entry, HierarchyBuilder};
use zettelgraph::{next_child_id, parent_of, AllocationError};

#[test]
fn allocation_fills_gaps_and_round_trips() {
    let graph = HierarchyBuilder::new("/v").build(&[
        Entry::file_at("/v/01a Parent.md"),
        Entry::file_at("/v/01a01 One.md"),
        Entry::file_at("/v/01a03 Three.md"),
    ]);
    let next = next_child_id(&graph, Path::new("/v/01a Parent.md")).unwrap();
    assert_eq!(next, "01a02");
    assert_eq!(parent_of(&next), Some("01a"));
}

#[test]
fn allocation_under_surrogate_is_possible() {
    let graph = HierarchyBuilder::new("/v").build(&[Entry::file_at("/v/04b01 Deep.md")]);
    let next = next_child_id(&graph, Path::new("surrogate://04")).unwrap();
    assert_eq!(next, "04a");
}

#[test]
fn allocation_errors_are_typed() {
    let graph = HierarchyBuilder::new("/v").build(&[Entry::file_at("/v/untitled.md")]);
    let err = next_child_id(&graph, Path::new("/v/untitled.md")).unwrap_err();
    assert!(matches!(err, AllocationError::NoIdentifier(_)));
    assert!(err.to_string().contains("no identifier"));
}
