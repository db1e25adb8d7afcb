//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Identity, ListingMode, SettingsOverrides};

/// Wanderer - self-propagating discovery agent
///
/// Finds a registry package hosted on GitHub, mirrors its repository onto the
/// agent's tree and merges the organization's sibling packages into the
/// agent's package.json.
#[derive(Parser, Debug)]
#[command(
    name = "wanderer",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Self-propagating discovery agent",
    long_about = "Self-propagating discovery agent.\n\n\
                  Wanderer picks a random package from the npm registry whose repository is \
                  hosted on GitHub, replaces its own working tree with that repository (keeping \
                  its control directory), and then adds every sibling package of its organization \
                  to its package.json.\n\n\
                  Only one wanderer may run against a tree at a time; concurrent runs are not \
                  detected.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  wanderer run --owner acme --repo acme/agent --github $TOKEN\n    \
                  wanderer pick --seed 42\n    \
                  wanderer merge --owner acme --repo acme/agent\n    \
                  wanderer completions zsh"
)]
pub struct Cli {
    /// Agent root (defaults to the enclosing git repository)
    #[arg(long, short = 'r', global = true)]
    pub root: Option<PathBuf>,

    /// Control directory, relative to the root; never mirrored
    #[arg(long, global = true, value_name = "DIR")]
    pub control_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover a repository, mirror it and merge sibling manifests
    Run(RunArgs),

    /// Merge sibling manifests into the current tree only
    Merge(MergeArgs),

    /// Discover a repository and print it without cloning
    Pick(PickArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Who the agent is on the hosting platform
#[derive(Args, Debug, Clone)]
pub struct IdentityArgs {
    /// Organization whose repositories are merged as dependencies
    #[arg(long)]
    pub owner: String,

    /// The agent's own repository as OWNER/NAME
    #[arg(long)]
    pub repo: String,

    /// Access token for the hosting API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github: String,
}

impl IdentityArgs {
    pub fn identity(&self) -> Identity {
        Identity {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            token: self.github.clone(),
        }
    }
}

/// How the registry is searched
#[derive(Args, Debug, Clone, Default)]
pub struct DiscoveryArgs {
    /// Where the global package listing comes from
    #[arg(long, value_enum)]
    pub listing: Option<ListingMode>,

    /// Number of packages in the global listing
    #[arg(long, value_name = "N")]
    pub page_size: Option<u32>,

    /// Seed for a reproducible traversal order
    #[arg(long)]
    pub seed: Option<u64>,

    /// Registry base URL
    #[arg(long, value_name = "URL")]
    pub registry_url: Option<String>,

    /// Package metadata API base URL
    #[arg(long, value_name = "URL")]
    pub metadata_url: Option<String>,

    /// Registry web front-end URL, scraped by --listing scrape
    #[arg(long, value_name = "URL")]
    pub frontend_url: Option<String>,
}

/// Hosting platform endpoints
#[derive(Args, Debug, Clone, Default)]
pub struct HostingArgs {
    /// Hosting REST API base URL
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Raw file host base URL
    #[arg(long, value_name = "URL")]
    pub raw_url: Option<String>,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Run with the token from the environment:\n    \
                  GITHUB_TOKEN=... wanderer run --owner acme --repo acme/agent\n\n\
                  Scrape the registry front-end instead of searching:\n    \
                  wanderer run --owner acme --repo acme/agent --listing scrape\n\n\
                  Keep extra paths out of the mirror:\n    \
                  wanderer run --owner acme --repo acme/agent --exclude notes --exclude .env")]
pub struct RunArgs {
    #[command(flatten)]
    pub identity: IdentityArgs,

    #[command(flatten)]
    pub discovery: DiscoveryArgs,

    #[command(flatten)]
    pub hosting: HostingArgs,

    /// Additional path to keep out of the mirror (repeatable)
    #[arg(long, value_name = "PATH")]
    pub exclude: Vec<PathBuf>,
}

/// Arguments for the merge command
#[derive(Parser, Debug)]
pub struct MergeArgs {
    #[command(flatten)]
    pub identity: IdentityArgs,

    #[command(flatten)]
    pub hosting: HostingArgs,
}

/// Arguments for the pick command
#[derive(Parser, Debug)]
pub struct PickArgs {
    #[command(flatten)]
    pub discovery: DiscoveryArgs,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    wanderer completions bash > ~/.bash_completion.d/wanderer\n\n\
                  Generate zsh completions:\n    wanderer completions zsh > ~/.zfunc/_wanderer")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(value_enum, ignore_case = true)]
    pub shell: clap_complete::Shell,
}

/// Layer command-line values over the configuration file
pub fn overrides(
    control_dir: Option<PathBuf>,
    discovery: Option<&DiscoveryArgs>,
    hosting: Option<&HostingArgs>,
    exclude: &[PathBuf],
) -> SettingsOverrides {
    let discovery = discovery.cloned().unwrap_or_default();
    let hosting = hosting.cloned().unwrap_or_default();
    SettingsOverrides {
        control_dir,
        listing: discovery.listing,
        page_size: discovery.page_size,
        seed: discovery.seed,
        exclude: exclude.to_vec(),
        registry_url: discovery.registry_url,
        metadata_url: discovery.metadata_url,
        frontend_url: discovery.frontend_url,
        api_url: hosting.api_url,
        raw_url: hosting.raw_url,
    }
}
