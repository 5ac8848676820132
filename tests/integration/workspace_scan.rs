use std::fs;
use std::path::Path;

use tempfile::TempDir;
use zettelgraph::config::ZettelConfig;
use zettelgraph::identifier::is_valid_identifier;
use zettelgraph::plan::{plan_adopt, plan_move, plan_renumber, AdoptOptions};
use zettelgraph::workspace::{
    apply_plan, creation_times, scan_entries, HierarchyService, ScanOptions,
};

fn vault(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (rel, content) in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

#[test]
fn scanned_vault_builds_expected_hierarchy() {
    let dir = vault(&[
        ("01 Math.md", ""),
        ("math/01a Calculus.md", ""),
        ("math/01a Calculus.pdf", ""),
        (".git/HEAD", ""),
        ("inbox/idea.md", ""),
    ]);
    let service = HierarchyService::new(dir.path(), ZettelConfig::default()).unwrap();
    let graph = service.rebuild().unwrap();
    let root = service.root();

    let calculus = graph.node(&root.join("math/01a Calculus.md")).unwrap();
    assert_eq!(calculus.paths.len(), 2);
    assert_eq!(graph.parent(&calculus.path).unwrap().path, root.join("01 Math.md"));
    assert!(!graph.contains(&root.join(".git")));
    assert_eq!(graph.parent(&root.join("inbox/idea.md")).unwrap().path, root.join("inbox"));
}

#[test]
fn extension_filter_limits_scan() {
    let dir = vault(&[("01 Note.md", ""), ("01 Note.py", ""), ("image.png", "")]);
    let entries = scan_entries(dir.path(), &ScanOptions::with_extensions(&["md"])).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].extension.as_deref(), Some("md"));
}

#[test]
fn move_then_rebuild_reflects_new_parent() {
    let dir = vault(&[
        ("01 Math.md", ""),
        ("02 Physics.md", ""),
        ("02a Mechanics.md", "See [[02a01]]"),
        ("02a01 Newton.md", "Back to [[02a Mechanics]]"),
    ]);
    let service = HierarchyService::new(dir.path(), ZettelConfig::default()).unwrap();
    let graph = service.rebuild().unwrap();
    let root = service.root().to_path_buf();

    let plan =
        plan_move(&graph, &[root.join("02a Mechanics.md")], &root.join("01 Math.md")).unwrap();
    assert_eq!(plan.len(), 2);
    let report = apply_plan(&root, &plan).unwrap();
    assert_eq!(report.rewritten.len(), 2);

    let graph = service.rebuild().unwrap();
    let newton = root.join("01a01 Newton.md");
    assert_eq!(graph.parent(&newton).unwrap().path, root.join("01a Mechanics.md"));
    assert_eq!(
        fs::read_to_string(&newton).unwrap(),
        "Back to [[01a Mechanics]]"
    );
    assert_eq!(
        fs::read_to_string(root.join("01a Mechanics.md")).unwrap(),
        "See [[01a01]]"
    );
    assert!(!Path::new(&root.join("02a Mechanics.md")).exists());
}

#[test]
fn renumber_across_segment_kinds_keeps_the_tree_intact() {
    let dir = vault(&[
        ("01 Math.md", ""),
        ("01a Calculus.md", "Next: [[01a01 Limits]]"),
        ("01a01 Limits.md", "Deeper: [[01a01a]]"),
        ("01a01a Epsilon.md", ""),
    ]);
    let service = HierarchyService::new(dir.path(), ZettelConfig::default()).unwrap();
    let graph = service.rebuild().unwrap();
    let root = service.root().to_path_buf();

    let plan = plan_renumber(&graph, &root.join("01a Calculus.md"), "03").unwrap();
    assert!(plan
        .ops
        .iter()
        .all(|op| op.new_identifier.as_deref().map(is_valid_identifier).unwrap_or(false)));
    apply_plan(&root, &plan).unwrap();

    let graph = service.rebuild().unwrap();
    assert!(graph.surrogates().next().is_none());
    let epsilon = root.join("03a01 Epsilon.md");
    assert_eq!(graph.parent(&epsilon).unwrap().path, root.join("03a Limits.md"));
    let limits = root.join("03a Limits.md");
    assert_eq!(graph.parent(&limits).unwrap().path, root.join("03 Calculus.md"));
    assert_eq!(
        fs::read_to_string(root.join("03 Calculus.md")).unwrap(),
        "Next: [[03a Limits]]"
    );
    assert_eq!(fs::read_to_string(&limits).unwrap(), "Deeper: [[03a01]]");
}

#[test]
fn adopt_files_loose_notes_and_separates_duplicates() {
    let dir = vault(&[
        ("01 Math.md", ""),
        ("01a Calculus.md", ""),
        ("01a Algebra.md", ""),
        ("02 Projects/draft.md", ""),
        ("scratch.md", ""),
    ]);
    let service = HierarchyService::new(dir.path(), ZettelConfig::default()).unwrap();
    let graph = service.rebuild().unwrap();
    let root = service.root().to_path_buf();

    let options = AdoptOptions {
        created: creation_times(&graph),
        ..AdoptOptions::default()
    };
    let plan = plan_adopt(&graph, &options).unwrap();
    apply_plan(&root, &plan).unwrap();

    let graph = service.rebuild().unwrap();
    assert!(root.join("02 Projects/02a draft.md").exists());
    assert!(root.join("00 Inbox/00a scratch.md").exists());
    let calculus_ids: Vec<_> = graph
        .nodes()
        .filter(|n| !n.is_surrogate && !n.is_directory)
        .filter(|n| n.identifier.as_deref() == Some("01a"))
        .collect();
    assert_eq!(calculus_ids.len(), 1);
    assert!(graph.find_by_identifier("01b").is_some());
    assert!(graph
        .nodes()
        .filter(|n| !n.is_directory && !n.is_surrogate)
        .all(|n| n.identifier.is_some()));
}
