//! Otto CLI entry point.

use clap::{Parser, Subcommand};
use otto::commands;
use otto_common::OttoConfig;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "otto")]
#[command(about = "Otto: your native file utility agent", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a file to another format
    Convert {
        input_file: PathBuf,
        target_format: String,
    },

    /// Organize the files in a folder
    Organize {
        path: PathBuf,

        /// Specific instructions for the plan (uses the LLM)
        #[arg(long, short = 'i', default_value = "")]
        instructions: String,

        /// Apply the plan instead of previewing it
        #[arg(long)]
        confirm: bool,
    },

    /// Summarize files
    Summarize {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Rename files with suggested names
    Rename {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Apply the renames instead of previewing them
        #[arg(long)]
        confirm: bool,
    },

    /// Ask for a snippet and run it
    Ask {
        query: String,
        paths: Vec<PathBuf>,
    },

    /// Download and install a tool into the managed bin directory
    Install { tool: String },

    /// Turn a request into a JSON plan (machine-readable stdout)
    Dispatch {
        agent: String,
        query: String,
        paths: Vec<PathBuf>,
    },

    /// Execute a JSON plan
    Execute { plan: String },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr: stdout belongs to command output, and dispatch
    // in particular promises a single clean JSON line there.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("otto=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = OttoConfig::from_env();
    if let Err(e) = config.ensure_dirs() {
        tracing::warn!("Could not create data directories: {}", e);
    }

    let result = match Cli::parse().command {
        Commands::Convert {
            input_file,
            target_format,
        } => commands::convert::run(&input_file, &target_format, &config).await,
        Commands::Organize {
            path,
            instructions,
            confirm,
        } => commands::organize::run(&path, &instructions, confirm, &config).await,
        Commands::Summarize { paths } => commands::summarize::run(&paths, &config).await,
        Commands::Rename { paths, confirm } => {
            commands::rename::run(&paths, confirm, &config).await
        }
        Commands::Ask { query, paths } => commands::ask::run(&query, &paths, &config).await,
        Commands::Install { tool } => commands::install::run(&tool, &config).await,
        Commands::Dispatch {
            agent,
            query,
            paths,
        } => commands::dispatch::run(&agent, &query, &paths, &config).await,
        Commands::Execute { plan } => commands::execute::run(&plan, &config).await,
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
