use crate::output::{print_json, print_table};
use clap::Subcommand;
use planbook_core::{goal::Goal, numbering};
use std::path::Path;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum GoalSubcommand {
    /// Add a goal (top-level objective when --parent is omitted)
    Add {
        /// District slug
        district: String,
        /// Parent goal id
        #[arg(long)]
        parent: Option<Uuid>,
        /// Goal title
        #[arg(long)]
        title: String,
        /// Longer description
        #[arg(long)]
        description: Option<String>,
    },
    /// List a district's goals in plan order
    List {
        /// District slug
        district: String,
    },
    /// Update goal metadata
    Update {
        /// District slug
        district: String,
        /// Goal id
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Position among siblings sharing a goal number
        #[arg(long)]
        position: Option<u32>,
    },
    /// Remove a goal and everything under it
    Remove {
        /// District slug
        district: String,
        /// Goal id
        id: Uuid,
    },
    /// Preview the number the next goal would receive
    NextNumber {
        /// District slug
        district: String,
        /// Parent goal id
        #[arg(long)]
        parent: Option<Uuid>,
    },
}

pub fn run(root: &Path, subcmd: GoalSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        GoalSubcommand::Add {
            district,
            parent,
            title,
            description,
        } => add(root, &district, parent, &title, description, json),
        GoalSubcommand::List { district } => list(root, &district, json),
        GoalSubcommand::Update {
            district,
            id,
            title,
            description,
            position,
        } => update(root, &district, id, title, description, position, json),
        GoalSubcommand::Remove { district, id } => remove(root, &district, id, json),
        GoalSubcommand::NextNumber { district, parent } => {
            next_number(root, &district, parent, json)
        }
    }
}

fn add(
    root: &Path,
    district: &str,
    parent: Option<Uuid>,
    title: &str,
    description: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let goal = Goal::create_with_description(root, district, parent, title, description)?;

    if json {
        print_json(&goal)?;
    } else {
        println!(
            "Created {} {} '{}' ({})",
            goal.level.display_name().to_lowercase(),
            goal.goal_number,
            goal.title,
            goal.id
        );
    }
    Ok(())
}

fn list(root: &Path, district: &str, json: bool) -> anyhow::Result<()> {
    planbook_core::district::District::load(root, district)?;
    let goals = Goal::list(root, district)?;

    if json {
        return print_json(&goals);
    }

    if goals.is_empty() {
        println!("No goals yet. Add one with: planbook goal add {district} --title '<Title>'");
        return Ok(());
    }

    let rows = goals
        .iter()
        .map(|g| {
            vec![
                g.goal_number.clone(),
                g.level.to_string(),
                g.title.clone(),
                g.id.to_string(),
            ]
        })
        .collect();
    print_table(&["NUMBER", "LEVEL", "TITLE", "ID"], rows);
    Ok(())
}

fn update(
    root: &Path,
    district: &str,
    id: Uuid,
    title: Option<String>,
    description: Option<String>,
    position: Option<u32>,
    json: bool,
) -> anyhow::Result<()> {
    let mut goal = Goal::load(root, district, id)?;
    if let Some(title) = title {
        goal.update_title(title);
    }
    if let Some(description) = description {
        goal.set_description(description);
    }
    if let Some(position) = position {
        goal.set_order_position(position);
    }
    goal.save(root, district)?;

    if json {
        print_json(&goal)?;
    } else {
        println!("Updated goal {} '{}'", goal.goal_number, goal.title);
    }
    Ok(())
}

fn remove(root: &Path, district: &str, id: Uuid, json: bool) -> anyhow::Result<()> {
    let goal = Goal::load(root, district, id)?;
    Goal::delete(root, district, id)?;

    if json {
        print_json(&serde_json::json!({ "deleted": id }))?;
    } else {
        println!("Removed goal {} and everything under it", goal.goal_number);
    }
    Ok(())
}

fn next_number(
    root: &Path,
    district: &str,
    parent: Option<Uuid>,
    json: bool,
) -> anyhow::Result<()> {
    planbook_core::district::District::load(root, district)?;
    let number = numbering::next_goal_number(root, district, parent)?;

    if json {
        print_json(&serde_json::json!({ "goal_number": number }))?;
    } else {
        println!("{number}");
    }
    Ok(())
}
