use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use tacscope_core::config::{Config, CONFIG_FILE_NAME};
use tacscope_core::cost;
use tacscope_core::metrics::ComparisonResult;
use tacscope_core::tagger;

use tacscope_report::{html, json, markdown, text};

#[derive(Parser)]
#[command(name = "tacscope")]
#[command(about = "Highlight C-like source and compare the estimated cost of three-address code")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Config file for `compare` thresholds (defaults to .tacscope.toml in the current directory or an ancestor)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Tag a source file lexically and render it with highlighting
    Highlight {
        /// Source file, or '-' for stdin
        file: PathBuf,
        #[arg(long, value_enum, default_value = "ansi")]
        format: HighlightFormat,
        /// Prefix each line with its number (ansi only)
        #[arg(long)]
        line_numbers: bool,
    },
    /// Estimate the cost of a TAC listing line by line
    Analyze {
        /// TAC file, or '-' for stdin
        file: PathBuf,
        #[arg(long, value_enum, default_value = "text")]
        format: ReportFormat,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Compare TAC before and after optimization; exit 1 if below --min-reduction
    Compare {
        /// TAC before optimization, or '-' for stdin
        before: PathBuf,
        /// TAC after optimization, or '-' for stdin
        after: PathBuf,
        #[arg(long, value_enum, default_value = "text")]
        format: ReportFormat,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
        /// Minimum cost reduction percentage required to pass
        #[arg(long, value_name = "PCT")]
        min_reduction: Option<f64>,
    },
    /// Create a default .tacscope.toml configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum HighlightFormat {
    Ansi,
    Html,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
    Markdown,
}

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Highlight {
            file,
            format,
            line_numbers,
        } => cmd_highlight(&file, format, line_numbers),
        Commands::Analyze {
            file,
            format,
            compact,
        } => cmd_analyze(&file, format, compact),
        Commands::Compare {
            before,
            after,
            format,
            compact,
            min_reduction,
        } => cmd_compare(&before, &after, format, compact, min_reduction, config_path),
        Commands::Init { force } => cmd_init(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(2);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_highlight(path: &Path, format: HighlightFormat, line_numbers: bool) -> Result<()> {
    let source = read_input(path)?;
    let spans = tagger::tag(&source);
    tracing::debug!("tagged {} spans from {}", spans.len(), path.display());

    let output = match format {
        HighlightFormat::Ansi => {
            let mut out = text::format_highlight(&spans, line_numbers);
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out
        }
        HighlightFormat::Html => html::render_block(&spans),
        HighlightFormat::Json => format!("{}\n", json::format_spans(&spans, false)),
    };
    print!("{output}");
    Ok(())
}

fn cmd_analyze(path: &Path, format: ReportFormat, compact: bool) -> Result<()> {
    let code = read_input(path)?;
    let result = cost::analyze(code.as_str());

    let report = match format {
        ReportFormat::Text => text::format_analysis(&result),
        ReportFormat::Json => format!("{}\n", json::format_analysis(&result, compact)),
        ReportFormat::Markdown => markdown::format_analysis(&result),
    };
    print!("{report}");
    Ok(())
}

fn cmd_compare(
    before_path: &Path,
    after_path: &Path,
    format: ReportFormat,
    compact: bool,
    min_reduction: Option<f64>,
    config_path: Option<&Path>,
) -> Result<()> {
    if is_stdin(before_path) && is_stdin(after_path) {
        anyhow::bail!("only one of BEFORE and AFTER can be read from stdin");
    }
    if let Some(min) = min_reduction {
        if !min.is_finite() || min < 0.0 {
            anyhow::bail!("--min-reduction must be a non-negative percentage, got {min}");
        }
    }

    let config = load_config(config_path)?;
    let before = read_input(before_path)?;
    let after = read_input(after_path)?;
    let cmp = cost::compare(before.as_str(), after.as_str());

    match min_reduction.or(config.rules.min_cost_reduction) {
        Some(min) => {
            let (report, passed) = format_check(&cmp, min, format, compact);
            print!("{report}");
            if !passed {
                process::exit(1);
            }
        }
        None => {
            let report = match format {
                ReportFormat::Text => text::format_comparison(&cmp),
                ReportFormat::Json => format!("{}\n", json::format_comparison(&cmp, compact)),
                ReportFormat::Markdown => markdown::format_comparison(&cmp),
            };
            print!("{report}");
        }
    }
    Ok(())
}

fn format_check(
    cmp: &ComparisonResult,
    min: f64,
    format: ReportFormat,
    compact: bool,
) -> (String, bool) {
    match format {
        ReportFormat::Text => text::format_check(cmp, min),
        ReportFormat::Json => {
            let (report, passed) = json::format_check(cmp, min, compact);
            (format!("{report}\n"), passed)
        }
        ReportFormat::Markdown => {
            let passed = cmp.meets_reduction(min);
            let verdict = if passed {
                "**CHECK PASSED**".to_string()
            } else {
                format!(
                    "**CHECK FAILED**: cost reduction {:.1}% is below the required {min:.1}%",
                    cmp.cost_reduction_pct
                )
            };
            (
                format!("{}\n{verdict}\n", markdown::format_comparison(cmp)),
                passed,
            )
        }
    }
}

fn cmd_init(force: bool) -> Result<()> {
    let target = PathBuf::from(CONFIG_FILE_NAME);
    if target.exists() && !force {
        anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
    }
    std::fs::write(&target, Config::default_toml())
        .with_context(|| format!("failed to write {CONFIG_FILE_NAME}"))?;
    println!("Created {CONFIG_FILE_NAME} with default configuration.");
    Ok(())
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(p) => Config::load(p),
        None => {
            let cwd = std::env::current_dir().context("failed to resolve current directory")?;
            Ok(Config::load_or_default(&cwd))
        }
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_input(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
