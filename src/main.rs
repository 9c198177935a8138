use std::env;

use clap::{Parser, Subcommand};
use tasktree::error::Result;
use tasktree::store::repo;
use tasktree::{commands, shell};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(
    name = "tasktree",
    version,
    about = "Hierarchical to-do tracker with an interactive shell"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new .tasks/ store in the current directory
    Init,
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Init) => commands::init::run(&env::current_dir()?),
        None => shell::run_interactive(&repo::find_repo_root()?),
    }
}

fn main() {
    // Off unless RUST_LOG asks for it; unusable filters are ignored.
    let filter = env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
