mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{district::DistrictSubcommand, goal::GoalSubcommand, metric::MetricSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "planbook",
    about = "Strategic plan builder — manage districts, goals, and metrics",
    version,
    propagate_version = true
)]
struct Cli {
    /// Store root (default: auto-detect from .planbook/ or .git/)
    #[arg(long, global = true, env = "PLANBOOK_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a planbook store in the current directory
    Init {
        /// Organization name (defaults to the directory name)
        #[arg(long)]
        organization: Option<String>,
    },

    /// Start the JSON API server
    Serve {
        /// Port to listen on (0 picks a free port)
        #[arg(long, default_value = "8643")]
        port: u16,
        /// Don't open a browser automatically
        #[arg(long)]
        no_open: bool,
    },

    /// Manage districts
    District {
        #[command(subcommand)]
        subcommand: DistrictSubcommand,
    },

    /// Manage goals
    Goal {
        #[command(subcommand)]
        subcommand: GoalSubcommand,
    },

    /// Manage metrics
    Metric {
        #[command(subcommand)]
        subcommand: MetricSubcommand,
    },

    /// Show a district's plan tree with status labels
    Status {
        /// District slug
        district: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root_path = cli.root.as_deref();
    let root = root::resolve_root(root_path);

    let result = match cli.command {
        Commands::Init { organization } => cmd::init::run(&root, organization.as_deref()),
        Commands::Serve { port, no_open } => cmd::serve::run(&root, port, no_open),
        Commands::District { subcommand } => cmd::district::run(&root, subcommand, cli.json),
        Commands::Goal { subcommand } => cmd::goal::run(&root, subcommand, cli.json),
        Commands::Metric { subcommand } => cmd::metric::run(&root, subcommand, cli.json),
        Commands::Status { district } => cmd::status::run(&root, &district, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
