use std::fs;

use tempfile::TempDir;
use zettelgraph::tooling::cli::{CliContext, Commands, OutputFormat};

fn workspace(files: &[&str]) -> (TempDir, CliContext) {
    let temp_dir = TempDir::new().unwrap();
    for rel in files {
        fs::write(temp_dir.path().join(rel), "").unwrap();
    }
    let cli = CliContext::new(temp_dir.path().to_path_buf(), None).unwrap();
    (temp_dir, cli)
}

#[test]
fn status_json_contract_has_required_fields() {
    let (_dir, cli) = workspace(&["01 Math.md", "01a01 Limits.md", "plain.md"]);
    let output = cli
        .execute(&Commands::Status {
            format: OutputFormat::Json,
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    for key in ["nodes", "edges", "files", "directories", "surrogates", "merged"] {
        assert!(parsed.get(key).and_then(|v| v.as_u64()).is_some(), "missing {}", key);
    }
    assert_eq!(parsed["surrogates"].as_u64(), Some(1));
}

#[test]
fn check_json_contract_has_required_fields() {
    let (_dir, cli) = workspace(&[]);
    let output = cli
        .execute(&Commands::Check {
            identifier: "01a01b".to_string(),
            format: OutputFormat::Json,
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["valid"].as_bool(), Some(true));
    assert_eq!(parsed["parent"].as_str(), Some("01a01"));
    assert_eq!(parsed["ancestors"].as_array().map(|a| a.len()), Some(3));
}

#[test]
fn tree_text_lists_every_note() {
    let (_dir, cli) = workspace(&["01 Math.md", "01a Calculus.md", "02 Physics.md"]);
    let output = cli.execute(&Commands::Tree { format: OutputFormat::Text }).unwrap();
    for name in ["01 Math", "01a Calculus", "02 Physics"] {
        assert!(output.contains(name), "missing {} in\n{}", name, output);
    }
}

#[test]
fn new_note_takes_the_id_next_id_reported() {
    let (dir, cli) = workspace(&["01 Math.md", "01a Calculus.md", "01c Topology.md"]);
    let expected = cli
        .execute(&Commands::NextId {
            parent: "01 Math.md".into(),
        })
        .unwrap();
    assert_eq!(expected, "01b");

    let dry = cli
        .execute(&Commands::New {
            parent: "01 Math.md".into(),
            name: "Algebra".to_string(),
            ext: "md".to_string(),
            dry_run: true,
        })
        .unwrap();
    assert!(dry.ends_with("01b Algebra.md"));
    assert!(!dir.path().join("01b Algebra.md").exists());

    cli.execute(&Commands::New {
        parent: "01 Math.md".into(),
        name: "Algebra".to_string(),
        ext: "md".to_string(),
        dry_run: false,
    })
    .unwrap();
    assert!(dir.path().join("01b Algebra.md").exists());
}

#[test]
fn adopt_dry_run_lists_plan_without_renaming() {
    let (dir, cli) = workspace(&["01 Math.md", "loose.md"]);
    let output = cli
        .execute(&Commands::Adopt {
            inbox: Some("09 Triage".to_string()),
            dry_run: true,
        })
        .unwrap();
    assert!(output.contains("09a loose.md"), "unexpected plan:\n{}", output);
    assert!(dir.path().join("loose.md").exists());
}
