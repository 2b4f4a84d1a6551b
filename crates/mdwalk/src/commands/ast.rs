//! `mdwalk ast` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdwalk_ast::parse_with;
use mdwalk_config::{CliSettings, Config};

use super::read_input;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the ast command.
#[derive(Args)]
pub(crate) struct AstArgs {
    /// Path to the markdown file, or `-` for stdin.
    input: PathBuf,

    /// Path to configuration file (default: auto-discover mdwalk.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable tables, strikethrough and task lists.
    #[arg(long)]
    no_gfm: bool,
}

impl AstArgs {
    /// Execute the ast command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or reading the input fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            gfm: self.no_gfm.then_some(false),
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let markdown = read_input(&self.input)?;
        let doc = parse_with(&markdown, &config.parse_options());
        output.document(&doc.dump())?;
        Ok(())
    }
}
