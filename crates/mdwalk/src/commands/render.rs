//! `mdwalk render` command implementation.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use mdwalk_ast::parse_with;
use mdwalk_config::{CliSettings, Config, OutputFormat};
use mdwalk_renderer::{Diagnostic, Layout, LayoutBuilder, Renderer};
use serde::Serialize;

use super::read_input;
use crate::error::CliError;
use crate::output::Output;

/// Output format selectable on the command line.
#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
    Ast,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
            FormatArg::Ast => Self::Ast,
        }
    }
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Path to the markdown file, or `-` for stdin.
    input: PathBuf,

    /// Path to configuration file (default: auto-discover mdwalk.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (overrides config).
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Maximum nesting depth (overrides config).
    #[arg(long)]
    max_depth: Option<usize>,

    /// Mark the last paragraph as fading out (overrides config).
    #[arg(long)]
    fade_out: bool,

    /// Disable tables, strikethrough and task lists.
    #[arg(long)]
    no_gfm: bool,

    /// Fail when rendering reports misplaced nodes.
    #[arg(long)]
    strict: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// With `verbose`, diagnostics already reach the log as warnings and are
    /// not repeated.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, reading the input or
    /// serialization fails, or if `--strict` is set and diagnostics were
    /// reported.
    pub(crate) fn execute(self, verbose: bool) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            format: self.format.map(OutputFormat::from),
            max_depth: self.max_depth,
            fade_out_trailing_paragraph: self.fade_out.then_some(true),
            gfm: self.no_gfm.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let markdown = read_input(&self.input)?;
        let rendered = render_document(&markdown, &config)?;
        output.document(&rendered.text)?;

        for warning in diagnostic_warnings(&rendered.diagnostics, verbose) {
            output.warning(&warning);
        }
        if !rendered.diagnostics.is_empty() {
            output.info(&format!(
                "{} node(s) rendered with diagnostics",
                rendered.diagnostics.len()
            ));
            if self.strict {
                return Err(CliError::Validation(
                    "document contains misplaced nodes".to_owned(),
                ));
            }
        }

        Ok(())
    }
}

/// Formatted output of one document.
struct Rendered {
    text: String,
    diagnostics: Vec<Diagnostic>,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    layout: &'a Layout,
    diagnostics: &'a [Diagnostic],
}

/// Warning lines printed for `diagnostics`. Verbose runs log them instead.
fn diagnostic_warnings(diagnostics: &[Diagnostic], verbose: bool) -> Vec<String> {
    if verbose {
        return Vec::new();
    }
    diagnostics
        .iter()
        .map(|diagnostic| format!("warning: {diagnostic}"))
        .collect()
}

fn render_document(markdown: &str, config: &Config) -> Result<Rendered, CliError> {
    let doc = parse_with(markdown, &config.parse_options());
    let renderer = Renderer::<LayoutBuilder>::new().with_max_depth(config.render.max_depth);
    let result = renderer.render_layout(&doc);

    let text = match config.output.format {
        OutputFormat::Text => result.layout.to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(&JsonOutput {
            layout: &result.layout,
            diagnostics: &result.diagnostics,
        })?,
        OutputFormat::Ast => doc.dump(),
    };

    Ok(Rendered {
        text,
        diagnostics: result.diagnostics,
    })
}
