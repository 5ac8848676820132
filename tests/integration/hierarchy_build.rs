use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use zettelgraph::tree::{build, Entry, HierarchyBuilder};

fn files(paths: &[&str]) -> Vec<Entry> {
    paths.iter().map(|p| Entry::file_at(*p)).collect()
}

#[test]
fn grandchild_alone_synthesizes_surrogate_chain() {
    let graph = build("/v", &files(&["/v/01a01 Grandchild.md"]), &[] as &[&str]);

    let grandchild = Path::new("/v/01a01 Grandchild.md");
    let chain: Vec<String> = graph
        .ancestors(grandchild)
        .iter()
        .map(|n| n.path.display().to_string())
        .collect();
    assert_eq!(chain, vec!["surrogate://01a", "surrogate://01", "/v"]);

    for surrogate in graph.surrogates() {
        assert!(surrogate.extensions.is_empty());
        assert!(surrogate.is_surrogate);
    }
    assert_eq!(graph.surrogates().count(), 2);
}

#[test]
fn multi_extension_files_merge() {
    let graph = build("/v", &files(&["/v/01 Note.md", "/v/01 Note.py"]), &[] as &[&str]);
    let node = graph.node(Path::new("/v/01 Note.md")).unwrap();

    assert_eq!(
        node.extensions,
        BTreeSet::from(["md".to_string(), "py".to_string()])
    );
    assert_eq!(node.paths.len(), 2);
    assert_eq!(graph.node(Path::new("/v/01 Note.py")).unwrap().path, node.path);
    assert_eq!(graph.children(Path::new("/v")).count(), 1);
}

#[test]
fn identifier_ancestry_beats_folder_placement() {
    let entries = vec![
        Entry::directory_at("/v/archive"),
        Entry::file_at("/v/archive/01a Moved child.md"),
        Entry::file_at("/v/01 Parent.md"),
    ];
    let graph = HierarchyBuilder::new("/v").build(&entries);
    let parent = graph.parent(Path::new("/v/archive/01a Moved child.md")).unwrap();
    assert_eq!(parent.path, PathBuf::from("/v/01 Parent.md"));
}

#[test]
fn plain_files_follow_folders() {
    let entries = vec![
        Entry::directory_at("/v/inbox"),
        Entry::file_at("/v/inbox/idea.md"),
        Entry::file_at("/v/loose.md"),
    ];
    let graph = HierarchyBuilder::new("/v").build(&entries);
    assert_eq!(
        graph.parent(Path::new("/v/inbox/idea.md")).unwrap().path,
        PathBuf::from("/v/inbox")
    );
    assert_eq!(graph.parent(Path::new("/v/loose.md")).unwrap().path, PathBuf::from("/v"));
}

#[test]
fn ignored_folder_never_appears_as_parent() {
    let entries = vec![
        Entry::directory_at("/v/.git"),
        Entry::file_at("/v/.git/HEAD"),
        Entry::directory_at("/v/drafts"),
        Entry::file_at("/v/drafts/draft.md"),
    ];
    let graph = build("/v", &entries, &["**/.git/**", "drafts"]);

    assert!(!graph.contains(Path::new("/v/.git")));
    assert!(!graph.contains(Path::new("/v/.git/HEAD")));
    assert!(!graph.contains(Path::new("/v/drafts")));
    let draft = graph.parent(Path::new("/v/drafts/draft.md")).unwrap();
    assert_eq!(draft.path, PathBuf::from("/v"));
}

#[test]
fn role_nodes_hang_under_their_structural_parent() {
    let graph = build(
        "/v",
        &files(&["/v/01 Topic.md", "/v/01a% Overview.md", "/v/01a& Plan.md"]),
        &[] as &[&str],
    );
    for path in ["/v/01a% Overview.md", "/v/01a& Plan.md"] {
        let parent = graph.parent(Path::new(path)).unwrap();
        assert_eq!(parent.path, PathBuf::from("/v/01 Topic.md"));
    }
}

#[test]
fn rebuilding_is_idempotent() {
    let entries = vec![
        Entry::directory_at("/v/topics"),
        Entry::file_at("/v/topics/01b Bee.md"),
        Entry::file_at("/v/01 Root.md"),
        Entry::file_at("/v/01 Root.pdf"),
        Entry::file_at("/v/02a01 Deep.md"),
        Entry::file_at("/v/plain.txt"),
    ];
    let builder = HierarchyBuilder::new("/v").with_ignore_patterns(["*.tmp"]);
    assert_eq!(builder.build(&entries).snapshot(), builder.build(&entries).snapshot());

    let mut reversed = entries.clone();
    reversed.reverse();
    assert_eq!(builder.build(&entries).snapshot(), builder.build(&reversed).snapshot());
}
