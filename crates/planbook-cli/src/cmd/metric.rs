use crate::output::{opt, print_json, print_table};
use clap::Subcommand;
use planbook_core::{metric::Metric, status, types::MetricType};
use std::path::Path;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum MetricSubcommand {
    /// Attach a metric to a goal
    Add {
        /// District slug
        district: String,
        /// Owning goal id
        goal: Uuid,
        /// Metric name
        #[arg(long)]
        name: String,
        /// percent | number | rating | survey | narrative
        #[arg(long = "type")]
        metric_type: MetricType,
        #[arg(long)]
        current: Option<f64>,
        #[arg(long)]
        target: Option<f64>,
        #[arg(long)]
        unit: Option<String>,
        /// Feature this metric on the goal card
        #[arg(long)]
        primary: bool,
    },
    /// List metrics, optionally narrowed to one goal
    List {
        /// District slug
        district: String,
        /// Owning goal id
        #[arg(long)]
        goal: Option<Uuid>,
    },
    /// Update metric values
    Update {
        /// District slug
        district: String,
        /// Metric id
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        current: Option<f64>,
        #[arg(long)]
        target: Option<f64>,
        #[arg(long)]
        unit: Option<String>,
        /// Narrative update text
        #[arg(long)]
        narrative: Option<String>,
    },
    /// Remove a metric
    Remove {
        /// District slug
        district: String,
        /// Metric id
        id: Uuid,
    },
    /// Reorder a goal's metrics (every metric id, in desired order)
    Reorder {
        /// District slug
        district: String,
        /// Owning goal id
        goal: Uuid,
        /// Metric ids in desired order
        ids: Vec<Uuid>,
    },
}

pub fn run(root: &Path, subcmd: MetricSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        MetricSubcommand::Add {
            district,
            goal,
            name,
            metric_type,
            current,
            target,
            unit,
            primary,
        } => add(
            root, &district, goal, &name, metric_type, current, target, unit, primary, json,
        ),
        MetricSubcommand::List { district, goal } => list(root, &district, goal, json),
        MetricSubcommand::Update {
            district,
            id,
            name,
            current,
            target,
            unit,
            narrative,
        } => update(root, &district, id, name, current, target, unit, narrative, json),
        MetricSubcommand::Remove { district, id } => remove(root, &district, id, json),
        MetricSubcommand::Reorder {
            district,
            goal,
            ids,
        } => reorder(root, &district, goal, &ids, json),
    }
}

#[allow(clippy::too_many_arguments)]
fn add(
    root: &Path,
    district: &str,
    goal: Uuid,
    name: &str,
    metric_type: MetricType,
    current: Option<f64>,
    target: Option<f64>,
    unit: Option<String>,
    primary: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut metric = Metric::create(root, district, goal, name, metric_type)?;
    if current.is_some() || target.is_some() {
        metric.set_values(current, target);
    }
    if unit.is_some() {
        metric.set_unit(unit);
    }
    if primary {
        metric.set_primary(true);
    }
    metric.save(root, district)?;

    if json {
        print_json(&metric)?;
    } else {
        println!("Added metric '{}' ({})", metric.name, metric.id);
    }
    Ok(())
}

fn list(root: &Path, district: &str, goal: Option<Uuid>, json: bool) -> anyhow::Result<()> {
    planbook_core::district::District::load(root, district)?;
    let metrics = match goal {
        Some(goal_id) => Metric::list_for_goal(root, district, goal_id)?,
        None => Metric::list(root, district)?,
    };

    if json {
        return print_json(&metrics);
    }

    if metrics.is_empty() {
        println!("No metrics.");
        return Ok(());
    }

    let rows = metrics
        .iter()
        .map(|m| {
            let values = match (m.current_value, m.target_value) {
                (Some(c), Some(t)) => format!("{c} / {t}"),
                (Some(c), None) => c.to_string(),
                _ => "-".to_string(),
            };
            let label = status::metric_status(m)
                .map(|s| s.to_string())
                .unwrap_or_else(|| "no-data".to_string());
            vec![
                m.name.clone(),
                m.metric_type.to_string(),
                values,
                opt(&m.unit),
                label,
                m.id.to_string(),
            ]
        })
        .collect();
    print_table(
        &["NAME", "TYPE", "CURRENT/TARGET", "UNIT", "STATUS", "ID"],
        rows,
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn update(
    root: &Path,
    district: &str,
    id: Uuid,
    name: Option<String>,
    current: Option<f64>,
    target: Option<f64>,
    unit: Option<String>,
    narrative: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let mut metric = Metric::load(root, district, id)?;
    if let Some(name) = name {
        metric.rename(name);
    }
    if current.is_some() || target.is_some() {
        metric.set_values(
            current.or(metric.current_value),
            target.or(metric.target_value),
        );
    }
    if unit.is_some() {
        metric.set_unit(unit);
    }
    if narrative.is_some() {
        metric.set_narrative(narrative);
    }
    metric.save(root, district)?;

    if json {
        print_json(&metric)?;
    } else {
        println!("Updated metric '{}'", metric.name);
    }
    Ok(())
}

fn remove(root: &Path, district: &str, id: Uuid, json: bool) -> anyhow::Result<()> {
    Metric::delete(root, district, id)?;
    if json {
        print_json(&serde_json::json!({ "deleted": id }))?;
    } else {
        println!("Removed metric {id}");
    }
    Ok(())
}

fn reorder(
    root: &Path,
    district: &str,
    goal: Uuid,
    ids: &[Uuid],
    json: bool,
) -> anyhow::Result<()> {
    Metric::reorder(root, district, goal, ids)?;
    let metrics = Metric::list_for_goal(root, district, goal)?;

    if json {
        print_json(&metrics)?;
    } else {
        println!("Reordered {} metrics", metrics.len());
    }
    Ok(())
}
