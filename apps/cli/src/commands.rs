//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use lattice_core::{
    CheckReport, GenerateConfig, GenerateReport, GraphSummary, ProgressReporter, check, generate,
};
use lattice_shared::{LatticeConfig, LatticeError, init_config, load_config};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// lattice: turn a blog feed into an interactive knowledge graph.
#[derive(Parser)]
#[command(
    name = "lattice",
    version,
    about = "Turn an RSS or Atom feed into a self-contained, interactive knowledge graph page.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ./lattice.toml or ~/.lattice/lattice.toml.
    #[arg(long, global = true, env = "LATTICE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Inputs shared by `generate` and `check`.
#[derive(clap::Args)]
pub(crate) struct InputArgs {
    /// Feed document (RSS or Atom).
    #[arg(long)]
    pub rss: Option<PathBuf>,

    /// Cross-link file (.json or .toml). A missing file means no declared links.
    #[arg(long)]
    pub crosslinks: Option<PathBuf>,

    /// Suggest cross-links from shared keywords when none are declared.
    #[arg(long)]
    pub auto_crosslinks: bool,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build the graph page from a feed.
    Generate {
        #[command(flatten)]
        inputs: InputArgs,

        /// Where to write the page.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a feed and cross-link file without writing anything.
    Check {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "lattice=info",
        1 => "lattice=debug",
        _ => "lattice=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Generate { inputs, output } => cmd_generate(config_path, &inputs, output),
        Command::Check { inputs } => cmd_check(config_path, &inputs),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Resolved configuration with command-line overrides applied.
fn resolve_config(
    config_path: Option<&Path>,
    inputs: &InputArgs,
    output: Option<PathBuf>,
) -> Result<GenerateConfig> {
    let settings = load_config(config_path).wrap_err("failed to load configuration")?;
    let mut config = GenerateConfig::from_config(settings);

    if let Some(rss) = &inputs.rss {
        config.feed_path = rss.clone();
    }
    if let Some(crosslinks) = &inputs.crosslinks {
        config.crosslinks_path = crosslinks.clone();
    }
    if let Some(output) = output {
        config.output_path = output;
    }
    config.auto_crosslinks |= inputs.auto_crosslinks;

    Ok(config)
}

fn cmd_generate(
    config_path: Option<&Path>,
    inputs: &InputArgs,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = resolve_config(config_path, inputs, output)?;

    info!(
        feed = %config.feed_path.display(),
        output = %config.output_path.display(),
        auto_crosslinks = config.auto_crosslinks,
        "generating graph page"
    );

    let reporter = CliProgress::new();
    let result = generate(&config, &reporter);
    reporter.finish();
    let report = result.wrap_err_with(|| {
        format!(
            "failed to generate {} from {}",
            config.output_path.display(),
            config.feed_path.display()
        )
    })?;

    println!();
    println!("  Graph page written!");
    print_summary(&report.summary, report.mode, report.feed_format);
    print_dropped(&report.skipped, &report.warnings);
    println!("  Output:      {}", report.artifact.path.display());
    println!("  Size:        {} bytes", report.artifact.size_bytes);
    println!("  SHA-256:     {}", report.artifact.sha256);
    println!("  Time:        {:.2}s", report.elapsed.as_secs_f64());
    println!();
    Ok(())
}

fn cmd_check(config_path: Option<&Path>, inputs: &InputArgs) -> Result<()> {
    let config = resolve_config(config_path, inputs, None)?;

    let reporter = CliProgress::new();
    let result = check(&config, &reporter);
    reporter.finish();
    let report: CheckReport = result
        .wrap_err_with(|| format!("check failed for {}", config.feed_path.display()))?;

    println!();
    println!("  Inputs look good.");
    print_summary(&report.summary, report.mode, report.feed_format);
    print_dropped(&report.skipped, &report.warnings);
    println!("  Time:        {:.2}s", report.elapsed.as_secs_f64());
    println!();
    Ok(())
}

fn print_summary(
    summary: &GraphSummary,
    mode: impl std::fmt::Display,
    format: impl std::fmt::Display,
) {
    println!("  Feed:        {format}");
    println!("  Posts:       {}", summary.posts);
    println!("  Domains:     {}", summary.hubs);
    println!("  Cross-links: {} ({mode})", summary.cross_links);
}

fn print_dropped(skipped: &[LatticeError], warnings: &[LatticeError]) {
    if !skipped.is_empty() {
        println!("  Skipped:     {} feed entries", skipped.len());
        for reason in skipped {
            println!("    - {reason}");
        }
    }
    if !warnings.is_empty() {
        println!("  Dropped:     {} cross-links", warnings.len());
        for reason in warnings {
            println!("    - {reason}");
        }
    }
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn dropped(&self, reason: &LatticeError) {
        self.spinner.set_message(format!("Dropped: {reason}"));
    }

    fn done(&self, _report: &GenerateReport) {
        self.finish();
    }
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

fn cmd_config_init(config_path: Option<&Path>) -> Result<()> {
    let path = init_config(config_path)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config: LatticeConfig = load_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_flags_parse() {
        let cli = Cli::try_parse_from([
            "lattice",
            "-vv",
            "--log-format",
            "json",
            "generate",
            "--rss",
            "feed.xml",
            "--output",
            "out.html",
            "--auto-crosslinks",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.log_format, LogFormat::Json));
        match cli.command {
            Command::Generate { inputs, output } => {
                assert_eq!(inputs.rss, Some(PathBuf::from("feed.xml")));
                assert_eq!(output, Some(PathBuf::from("out.html")));
                assert!(inputs.auto_crosslinks);
                assert!(inputs.crosslinks.is_none());
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn command_line_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_file = dir.path().join("lattice.toml");
        std::fs::write(
            &config_file,
            "[paths]\nfeed = \"from-config.xml\"\noutput = \"from-config.html\"\n",
        )
        .unwrap();

        let inputs = InputArgs {
            rss: Some(PathBuf::from("cli.xml")),
            crosslinks: None,
            auto_crosslinks: false,
        };
        let config = resolve_config(Some(&config_file), &inputs, None).unwrap();

        assert_eq!(config.feed_path, PathBuf::from("cli.xml"));
        assert_eq!(config.output_path, PathBuf::from("from-config.html"));
        assert_eq!(config.crosslinks_path, PathBuf::from("crosslinks.json"));
        assert!(!config.auto_crosslinks);
    }
}
