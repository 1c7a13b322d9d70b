use crate::output::{opt, print_json, print_kv, print_table};
use clap::Subcommand;
use planbook_core::{district::District, summary};
use std::path::Path;

#[derive(Subcommand)]
pub enum DistrictSubcommand {
    /// Create a new district
    Create {
        slug: String,
        /// District display name
        #[arg(long)]
        name: String,
        /// Administrator contact email
        #[arg(long)]
        admin_email: Option<String>,
        /// Override the default primary brand color
        #[arg(long)]
        primary_color: Option<String>,
        /// Hide the public dashboard
        #[arg(long)]
        private: bool,
    },
    /// List all districts
    List,
    /// Show district details and summary counts
    Info { slug: String },
    /// Update district metadata
    Update {
        slug: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        primary_color: Option<String>,
        #[arg(long)]
        secondary_color: Option<String>,
        #[arg(long)]
        logo_url: Option<String>,
        #[arg(long)]
        admin_email: Option<String>,
        /// Toggle the public dashboard on or off
        #[arg(long)]
        public: Option<bool>,
    },
    /// Delete a district
    Delete {
        slug: String,
        /// Also delete the district's goals and metrics
        #[arg(long)]
        cascade: bool,
    },
}

pub fn run(root: &Path, subcmd: DistrictSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        DistrictSubcommand::Create {
            slug,
            name,
            admin_email,
            primary_color,
            private,
        } => create(root, &slug, &name, admin_email, primary_color, private, json),
        DistrictSubcommand::List => list(root, json),
        DistrictSubcommand::Info { slug } => info(root, &slug, json),
        DistrictSubcommand::Update {
            slug,
            name,
            primary_color,
            secondary_color,
            logo_url,
            admin_email,
            public,
        } => update(
            root,
            &slug,
            name,
            primary_color,
            secondary_color,
            logo_url,
            admin_email,
            public,
            json,
        ),
        DistrictSubcommand::Delete { slug, cascade } => delete(root, &slug, cascade, json),
    }
}

fn create(
    root: &Path,
    slug: &str,
    name: &str,
    admin_email: Option<String>,
    primary_color: Option<String>,
    private: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut district = District::create(root, slug, name)?;
    if let Some(color) = primary_color {
        district.set_primary_color(color);
    }
    if admin_email.is_some() {
        district.set_admin_email(admin_email);
    }
    if private {
        district.set_public(false);
    }
    district.save(root)?;

    if json {
        print_json(&district)?;
    } else {
        println!("Created district '{}' ({})", district.slug, district.name);
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let districts = District::list(root)?;

    if json {
        return print_json(&districts);
    }

    if districts.is_empty() {
        println!("No districts. Create one with: planbook district create <slug> --name '<Name>'");
        return Ok(());
    }

    let rows = districts
        .iter()
        .map(|d| {
            vec![
                d.slug.clone(),
                d.name.clone(),
                if d.is_public { "public" } else { "private" }.to_string(),
                d.updated_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();
    print_table(&["SLUG", "NAME", "VISIBILITY", "UPDATED"], rows);
    Ok(())
}

fn info(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let district = District::load(root, slug)?;
    let summary = summary::district_summary(root, slug)?;

    if json {
        return print_json(&serde_json::json!({
            "district": district,
            "summary": summary,
        }));
    }

    print_kv(&[
        ("slug", district.slug.clone()),
        ("name", district.name.clone()),
        ("primary color", district.primary_color.clone()),
        ("secondary color", opt(&district.secondary_color)),
        ("admin email", opt(&district.admin_email)),
        (
            "visibility",
            if district.is_public { "public" } else { "private" }.to_string(),
        ),
        ("objectives", summary.objective_count.to_string()),
        ("goals", summary.goal_count.to_string()),
        ("sub-goals", summary.sub_goal_count.to_string()),
        ("metrics", summary.metric_count.to_string()),
    ]);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn update(
    root: &Path,
    slug: &str,
    name: Option<String>,
    primary_color: Option<String>,
    secondary_color: Option<String>,
    logo_url: Option<String>,
    admin_email: Option<String>,
    public: Option<bool>,
    json: bool,
) -> anyhow::Result<()> {
    let mut district = District::load(root, slug)?;
    if let Some(name) = name {
        district.update_name(name);
    }
    if let Some(color) = primary_color {
        district.set_primary_color(color);
    }
    if secondary_color.is_some() {
        district.set_secondary_color(secondary_color);
    }
    if logo_url.is_some() {
        district.set_logo_url(logo_url);
    }
    if admin_email.is_some() {
        district.set_admin_email(admin_email);
    }
    if let Some(public) = public {
        district.set_public(public);
    }
    district.save(root)?;

    if json {
        print_json(&district)?;
    } else {
        println!("Updated district '{}'", district.slug);
    }
    Ok(())
}

fn delete(root: &Path, slug: &str, cascade: bool, json: bool) -> anyhow::Result<()> {
    District::delete(root, slug, cascade)?;
    if json {
        print_json(&serde_json::json!({ "deleted": slug }))?;
    } else {
        println!("Deleted district '{slug}'");
    }
    Ok(())
}
