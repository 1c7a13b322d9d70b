use crate::output::print_json;
use planbook_core::district::District;
use planbook_core::hierarchy::{self, GoalNode};
use planbook_core::status;
use std::path::Path;

pub fn run(root: &Path, district: &str, json: bool) -> anyhow::Result<()> {
    let district = District::load(root, district)?;
    let tree = hierarchy::district_tree(root, &district.slug)?;

    if json {
        return print_json(&tree);
    }

    println!("{} — strategic plan status", district.name);
    if tree.is_empty() {
        println!("  (no goals yet)");
        return Ok(());
    }
    for node in &tree {
        print_node(node, 0);
    }
    Ok(())
}

fn print_node(node: &GoalNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let label = status::subtree_status(node);
    let metrics = match node.metrics.len() {
        0 => String::new(),
        1 => "  (1 metric)".to_string(),
        n => format!("  ({n} metrics)"),
    };
    println!(
        "{indent}{:<8} {}  [{}]{}",
        node.goal.goal_number, node.goal.title, label, metrics
    );
    for child in &node.children {
        print_node(child, depth + 1);
    }
}
