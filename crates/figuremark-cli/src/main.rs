//! FigureMark CLI - captioned figures for Markdown.
//!
//! Provides commands for:
//! - `convert`: Convert a single file or stdin
//! - `build`: Convert a documentation tree into an output directory

mod commands;
mod document;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, ConvertArgs};
use output::Output;

/// FigureMark - captioned HTML figures from fenced Markdown blocks.
#[derive(Parser)]
#[command(name = "figuremark", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one Markdown file (or stdin) unconditionally.
    Convert(ConvertArgs),
    /// Convert every enabled Markdown file under the source directory.
    Build(BuildArgs),
}

impl Commands {
    /// Log level enabled by `--verbose`.
    ///
    /// Per-figure records are DEBUG, per-document records are INFO.
    fn verbose_level(&self) -> Option<&'static str> {
        match self {
            Self::Convert(args) if args.verbose => Some("debug"),
            Self::Build(args) if args.verbose => Some("info"),
            _ => None,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose picks a level per command, otherwise use RUST_LOG or default to WARN
    let filter = cli
        .command
        .verbose_level()
        .map_or_else(EnvFilter::from_default_env, EnvFilter::new);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Convert(args) => args.execute(),
        Commands::Build(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
