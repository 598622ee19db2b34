mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::recent::RecentSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "specboard",
    about = "Live progress dashboard for spec-kit projects",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from specs/ or .specify/)
    #[arg(long, global = true, env = "SPECBOARD_ROOT")]
    root: Option<PathBuf>,

    /// Config file (default: ~/.specboard/config.yaml)
    #[arg(long, global = true, env = "SPECBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the project and list its features
    Scan,

    /// Show one feature in detail
    Feature {
        /// Feature directory name, e.g. 001-user-auth
        id: String,
    },

    /// Show dashboard metrics
    Metrics,

    /// Toggle a checkbox line in a markdown file
    Toggle {
        file: PathBuf,
        /// Zero-based line index
        #[arg(allow_negative_numbers = true)]
        line: i64,
    },

    /// Stream project updates as files change
    Watch,

    /// Start the HTTP API server
    Serve {
        /// Port to listen on (default: server.port from config)
        #[arg(long)]
        port: Option<u16>,

        /// Open a browser once listening
        #[arg(long)]
        open: bool,
    },

    /// Manage the recent-projects list
    Recent {
        #[command(subcommand)]
        subcommand: Option<RecentSubcommand>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } | Commands::Watch => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = specboard_core::config::Config::resolve(cli.config.as_deref())
        .map_err(anyhow::Error::from)
        .and_then(|config| match cli.command {
            Commands::Scan => cmd::scan::run(&root, cli.json),
            Commands::Feature { id } => cmd::feature::run(&root, &id, cli.json),
            Commands::Metrics => cmd::metrics::run(&root, cli.json),
            Commands::Toggle { file, line } => cmd::toggle::run(&file, line, cli.json),
            Commands::Watch => cmd::watch::run(&root, &config, cli.json),
            Commands::Serve { port, open } => cmd::serve::run(config, port, open),
            Commands::Recent { subcommand } => cmd::recent::run(&root, &config, subcommand, cli.json),
        });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
