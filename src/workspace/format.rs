//! Text rendering of hierarchies, status and plans.

use crate::identifier::split_role;
use crate::plan::RenamePlan;
use crate::tree::{Graph, Node};
use crate::workspace::apply::ApplyReport;
use crate::workspace::types::{HierarchyStatus, IdentifierReport};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::cmp::Ordering;
use std::path::Path;

/// Section heading in bold and underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Identified nodes first in identifier order (case-insensitive, role markers last
/// among equals), then the rest by display name.
pub fn compare_nodes(a: &Node, b: &Node) -> Ordering {
    match (a.identifier.as_deref(), b.identifier.as_deref()) {
        (Some(x), Some(y)) => {
            let (xb, xr) = split_role(x);
            let (yb, yr) = split_role(y);
            xb.to_ascii_lowercase()
                .cmp(&yb.to_ascii_lowercase())
                .then_with(|| xr.is_some().cmp(&yr.is_some()))
                .then_with(|| a.display_name.cmp(&b.display_name))
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a
            .display_name
            .to_lowercase()
            .cmp(&b.display_name.to_lowercase())
            .then_with(|| a.path.cmp(&b.path)),
    }
}

/// Indented tree below the root. Surrogates are dimmed when `color` is set.
pub fn format_tree_text(graph: &Graph, color: bool) -> String {
    let mut out = String::new();
    out.push_str(&graph.root().display().to_string());
    out.push('\n');
    render_children(graph, graph.root(), "", color, &mut out);
    out
}

fn render_children(graph: &Graph, path: &Path, prefix: &str, color: bool, out: &mut String) {
    let mut children: Vec<&Node> = graph.children(path).collect();
    children.sort_by(|a, b| compare_nodes(a, b));

    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        let last = i + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        out.push_str(prefix);
        out.push_str(branch);
        out.push_str(&node_label(child, color));
        out.push('\n');

        let next_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
        render_children(graph, &child.path, &next_prefix, color, out);
    }
}

fn node_label(node: &Node, color: bool) -> String {
    let mut label = node.full_name();
    if node.is_directory {
        label.push('/');
    }
    if !node.extensions.is_empty() {
        let exts: Vec<&str> = node.extensions.iter().map(String::as_str).collect();
        label.push_str(&format!(" [{}]", exts.join(", ")));
    }
    if node.is_surrogate && color {
        return format!("{}", label.dimmed());
    }
    label
}

pub fn format_status_text(status: &HierarchyStatus) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Hierarchy Status")));
    out.push_str(&format!("  Root: {}\n\n", status.root));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Metric", "Count"]);
    for (metric, count) in [
        ("Nodes", status.nodes),
        ("Edges", status.edges),
        ("Files", status.files),
        ("Folders", status.directories),
        ("Surrogates", status.surrogates),
        ("Merged notes", status.merged),
        ("With identifier", status.with_identifier),
    ] {
        table.add_row(vec![metric.to_string(), count.to_string()]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

pub fn format_identifier_report(report: &IdentifierReport) -> String {
    if !report.valid {
        return format!("{}: not a valid identifier\n", report.identifier);
    }
    let mut out = format!("{}: valid\n", report.identifier);
    if let Some(role) = report.role {
        out.push_str(&format!("  Role: {}\n", role));
    }
    out.push_str(&format!(
        "  Parent: {}\n",
        report.parent.as_deref().unwrap_or("(root)")
    ));
    if !report.ancestors.is_empty() {
        out.push_str(&format!("  Ancestors: {}\n", report.ancestors.join(" > ")));
    }
    out
}

/// Rename plan as a from/to table, relative to `root` where possible.
pub fn format_plan_text(plan: &RenamePlan, root: &Path) -> String {
    if plan.is_empty() {
        return "Nothing to rename.\n".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["From", "To"]);
    for op in &plan.ops {
        table.add_row(vec![relative(&op.from, root), relative(&op.to, root)]);
    }
    format!("{}\n\nTotal: {} renames.\n", table, plan.len())
}

pub fn format_apply_report(report: &ApplyReport) -> String {
    let links: usize = report.rewritten.iter().map(|(_, n)| n).sum();
    format!(
        "Renamed {} paths; rewrote {} links in {} files.\n",
        report.renamed.len(),
        links,
        report.rewritten.len()
    )
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
