//! interleave CLI — run the study tools from a shell or over stdio.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "interleave", version, about = "Interleaved-practice study tools")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store study state as JSON files in this directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Seed the random sequencer for reproducible output
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available tools
    Tools {
        /// Print full definitions with input schemas as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the interleaving pattern catalog
    Patterns {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Call one tool and print its response
    Call {
        /// Tool name (see `interleave tools`)
        tool: String,

        /// Arguments as a JSON object
        #[arg(long, conflicts_with = "args_file")]
        args: Option<String>,

        /// Read arguments from a JSON file
        #[arg(long)]
        args_file: Option<PathBuf>,
    },

    /// Answer line-delimited JSON tool requests on stdin
    Serve,

    /// Create a starter interleave.toml
    Init,
}

#[tokio::main]
async fn main() {
    // stdout carries tool output, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("interleave=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = commands::ServiceOptions {
        config: cli.config,
        data_dir: cli.data_dir,
        seed: cli.seed,
    };

    let result = match cli.command {
        Commands::Tools { json } => commands::tools::execute(json),
        Commands::Patterns { json } => commands::patterns::execute(json),
        Commands::Call {
            tool,
            args,
            args_file,
        } => commands::call::execute(&options, tool, args, args_file).await,
        Commands::Serve => commands::serve::execute(&options).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
