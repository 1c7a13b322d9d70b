use crate::hierarchy::GoalNode;
use crate::metric::Metric;
use crate::types::MetricStatus;

/// Ratio of current to target at or above which a metric is on target.
pub const ON_TARGET_RATIO: f64 = 0.95;
/// Ratio at or above which a metric merely needs attention; below is at risk.
pub const NEEDS_ATTENTION_RATIO: f64 = 0.80;

/// Share of on-target metrics at or above which a goal is on target.
const GOAL_ON_TARGET_SHARE: (usize, usize) = (7, 10);
/// Share of non-at-risk metrics at or above which a goal needs attention.
const GOAL_NEEDS_ATTENTION_SHARE: (usize, usize) = (1, 2);

// ---------------------------------------------------------------------------
// Metric classification
// ---------------------------------------------------------------------------

/// Classify a single metric from its current/target pair. Returns `None` for
/// metrics that cannot be measured this way: missing values, a non-positive
/// target, or narrative-only content.
pub fn metric_status(metric: &Metric) -> Option<MetricStatus> {
    let current = metric.current_value?;
    let target = metric.target_value?;
    if target <= 0.0 {
        return None;
    }
    Some(classify_ratio(current / target))
}

fn classify_ratio(ratio: f64) -> MetricStatus {
    if ratio >= ON_TARGET_RATIO {
        MetricStatus::OnTarget
    } else if ratio >= NEEDS_ATTENTION_RATIO {
        MetricStatus::NeedsAttention
    } else {
        MetricStatus::AtRisk
    }
}

/// Progress toward target as a whole percentage, capped at 100 for display.
pub fn metric_progress(metric: &Metric) -> Option<u32> {
    let current = metric.current_value?;
    let target = metric.target_value?;
    if target <= 0.0 {
        return None;
    }
    Some(((current / target) * 100.0).round().min(100.0) as u32)
}

// ---------------------------------------------------------------------------
// Goal aggregation
// ---------------------------------------------------------------------------

/// Aggregate status over a goal's own metrics. A goal with no measurable
/// metrics reads as at risk (deliberate default, see DESIGN.md).
pub fn goal_status(metrics: &[Metric]) -> MetricStatus {
    let statuses: Vec<MetricStatus> = metrics.iter().filter_map(metric_status).collect();
    aggregate(&statuses)
}

/// Aggregate status over a node's metrics plus every descendant's metrics —
/// what objective cards on the dashboard display.
pub fn subtree_status(node: &GoalNode) -> MetricStatus {
    let mut statuses = Vec::new();
    collect(node, &mut statuses);
    aggregate(&statuses)
}

fn collect(node: &GoalNode, out: &mut Vec<MetricStatus>) {
    out.extend(node.metrics.iter().filter_map(metric_status));
    for child in &node.children {
        collect(child, out);
    }
}

fn aggregate(statuses: &[MetricStatus]) -> MetricStatus {
    let total = statuses.len();
    if total == 0 {
        return MetricStatus::AtRisk;
    }
    let on_target = statuses
        .iter()
        .filter(|s| **s == MetricStatus::OnTarget)
        .count();
    let needs_attention = statuses
        .iter()
        .filter(|s| **s == MetricStatus::NeedsAttention)
        .count();

    // Integer arithmetic: on_target/total >= 7/10, then (on+needs)/total >= 1/2.
    if on_target * GOAL_ON_TARGET_SHARE.1 >= total * GOAL_ON_TARGET_SHARE.0 {
        MetricStatus::OnTarget
    } else if (on_target + needs_attention) * GOAL_NEEDS_ATTENTION_SHARE.1
        >= total * GOAL_NEEDS_ATTENTION_SHARE.0
    {
        MetricStatus::NeedsAttention
    } else {
        MetricStatus::AtRisk
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
