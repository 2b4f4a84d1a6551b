//! mdwalk CLI - Markdown tree renderer.
//!
//! Provides commands for:
//! - `render`: Render a markdown file as a text preview, JSON layout or AST outline
//! - `ast`: Print the syntax tree of a markdown file

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AstArgs, RenderArgs};
use output::Output;

/// mdwalk - Markdown tree renderer.
#[derive(Parser)]
#[command(name = "mdwalk", version, about)]
struct Cli {
    /// Enable verbose output (show render diagnostics as logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown file.
    Render(RenderArgs),
    /// Print the syntax tree of a markdown file.
    Ast(AstArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG (errors only when unset)
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(cli.verbose),
        Commands::Ast(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
