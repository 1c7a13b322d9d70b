use crate::error::Result;
use crate::goal::Goal;
use crate::metric::Metric;
use crate::numbering;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// GoalNode
// ---------------------------------------------------------------------------

/// One goal in the assembled plan tree, carrying its metrics and children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalNode {
    #[serde(flatten)]
    pub goal: Goal,
    pub metrics: Vec<Metric>,
    pub children: Vec<GoalNode>,
}

// ---------------------------------------------------------------------------
// Tree assembly
// ---------------------------------------------------------------------------

/// Assemble the flat goal and metric lists of one district into an ordered
/// tree of objectives → goals → sub-goals.
///
/// Pure and deterministic: equal inputs produce structurally equal trees.
/// Metrics whose goal is absent are dropped; goals whose parent is absent
/// surface as extra roots rather than disappearing.
pub fn build_tree(goals: &[Goal], metrics: &[Metric]) -> Vec<GoalNode> {
    let known: HashSet<Uuid> = goals.iter().map(|g| g.id).collect();

    let mut metrics_by_goal: HashMap<Uuid, Vec<Metric>> = HashMap::new();
    for metric in metrics {
        if known.contains(&metric.goal_id) {
            metrics_by_goal
                .entry(metric.goal_id)
                .or_default()
                .push(metric.clone());
        } else {
            tracing::debug!(metric = %metric.id, goal = %metric.goal_id, "dropping metric with no matching goal");
        }
    }
    for attached in metrics_by_goal.values_mut() {
        attached.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
        });
    }

    let mut children_of: HashMap<Uuid, Vec<&Goal>> = HashMap::new();
    let mut roots: Vec<&Goal> = Vec::new();
    for goal in goals {
        match goal.parent_id {
            Some(parent) if known.contains(&parent) => {
                children_of.entry(parent).or_default().push(goal);
            }
            Some(parent) => {
                tracing::debug!(goal = %goal.id, %parent, "goal references missing parent, keeping as root");
                roots.push(goal);
            }
            None => roots.push(goal),
        }
    }

    sort_level(&mut roots);
    roots
        .into_iter()
        .map(|g| assemble(g, &children_of, &metrics_by_goal))
        .collect()
}

fn assemble(
    goal: &Goal,
    children_of: &HashMap<Uuid, Vec<&Goal>>,
    metrics_by_goal: &HashMap<Uuid, Vec<Metric>>,
) -> GoalNode {
    let mut children: Vec<&Goal> = children_of.get(&goal.id).cloned().unwrap_or_default();
    sort_level(&mut children);
    GoalNode {
        goal: goal.clone(),
        metrics: metrics_by_goal.get(&goal.id).cloned().unwrap_or_default(),
        children: children
            .into_iter()
            .map(|c| assemble(c, children_of, metrics_by_goal))
            .collect(),
    }
}

fn sort_level(level: &mut [&Goal]) {
    level.sort_by(|a, b| {
        numbering::compare_numbers(&a.goal_number, &b.goal_number)
            .then(a.order_position.cmp(&b.order_position))
    });
}

/// Load a district's goals and metrics from the store and build its tree.
pub fn district_tree(root: &Path, district_slug: &str) -> Result<Vec<GoalNode>> {
    let goals = Goal::list(root, district_slug)?;
    let metrics = Metric::list(root, district_slug)?;
    Ok(build_tree(&goals, &metrics))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Level, MetricType};

    fn goal(number: &str, parent: Option<&Goal>) -> Goal {
        let level = match number.split('.').count() {
            1 => Level::Objective,
            2 => Level::Goal,
            _ => Level::SubGoal,
        };
        Goal::new(
            Uuid::nil(),
            parent.map(|p| p.id),
            number,
            format!("Goal {number}"),
            level,
        )
    }

    fn metric(owner: &Goal, name: &str, order: u32) -> Metric {
        let mut m = Metric::new(owner.id, name, MetricType::Percent);
        m.display_order = order;
        m
    }

    #[test]
    fn nests_children_under_parents() {
        let obj = goal("1", None);
        let child = goal("1.1", Some(&obj));
        let sub = goal("1.1.1", Some(&child));

        let tree = build_tree(&[obj.clone(), child.clone(), sub.clone()], &[]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].goal.id, obj.id);
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].children[0].goal.id, sub.id);
    }

    #[test]
    fn attaches_metrics_to_owning_goal() {
        let obj = goal("1", None);
        let child = goal("1.1", Some(&obj));
        let m1 = metric(&child, "Attendance", 1);
        let m2 = metric(&child, "Proficiency", 0);

        let tree = build_tree(&[obj, child.clone()], &[m1, m2]);
        let names: Vec<&str> = tree[0].children[0]
            .metrics
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        // Sorted by display_order, not insertion order.
        assert_eq!(names, vec!["Proficiency", "Attendance"]);
    }

    #[test]
    fn orders_siblings_numerically() {
        let obj = goal("1", None);
        let mut goals = vec![obj.clone()];
        for n in ["1.10", "1.2", "1.1", "1.9"] {
            goals.push(goal(n, Some(&obj)));
        }

        let tree = build_tree(&goals, &[]);
        let numbers: Vec<&str> = tree[0]
            .children
            .iter()
            .map(|c| c.goal.goal_number.as_str())
            .collect();
        assert_eq!(numbers, vec!["1.1", "1.2", "1.9", "1.10"]);
    }

    #[test]
    fn orphaned_metric_is_dropped_silently() {
        let obj = goal("1", None);
        let ghost = goal("9", None);
        let stray = metric(&ghost, "Stray", 0);

        let tree = build_tree(std::slice::from_ref(&obj), &[stray]);
        assert_eq!(tree.len(), 1);
        assert!(tree[0].metrics.is_empty());
    }

    #[test]
    fn orphaned_child_becomes_root() {
        let obj = goal("1", None);
        let ghost_parent = goal("2", None);
        let orphan = goal("2.1", Some(&ghost_parent));

        // ghost_parent is not part of the input set.
        let tree = build_tree(&[obj.clone(), orphan.clone()], &[]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].goal.id, obj.id);
        assert_eq!(tree[1].goal.id, orphan.id);
    }

    #[test]
    fn build_is_idempotent() {
        let obj = goal("1", None);
        let child = goal("1.1", Some(&obj));
        let m = metric(&child, "Proficiency", 0);

        let goals = vec![obj, child];
        let metrics = vec![m];
        let first = build_tree(&goals, &metrics);
        let second = build_tree(&goals, &metrics);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_yields_empty_tree() {
        assert!(build_tree(&[], &[]).is_empty());
    }
}
