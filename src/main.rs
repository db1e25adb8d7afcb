//! Wanderer - self-propagating discovery agent
//!
//! Picks a random npm package whose source lives on GitHub, mirrors that
//! repository onto its own working tree and merges the published versions of
//! its organization's other repositories into its `package.json`.

use clap::Parser;

mod cli;
mod commands;
mod config;
mod error;
mod hash;
mod hosting;
mod http;
mod logging;
mod manifest;
mod merge;
mod pipeline;
mod progress;
mod random;
mod registry;
mod selector;
mod sync;

use cli::{Cli, Commands};
use error::Result;

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        root,
        control_dir,
        command,
        ..
    } = cli;

    match command {
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(&args),
        Commands::Run(args) => {
            let root = commands::resolve_root(root, &commands::current_dir()?)?;
            commands::run::run(&root, control_dir, args).await
        }
        Commands::Merge(args) => {
            let root = commands::resolve_root(root, &commands::current_dir()?)?;
            commands::merge::run(&root, control_dir, args).await
        }
        Commands::Pick(args) => {
            let root = commands::resolve_root(root, &commands::current_dir()?)?;
            commands::pick::run(&root, control_dir, args).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = dispatch(cli).await {
        tracing::debug!(error = ?e, "run failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
