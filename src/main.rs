// SPDX-License-Identifier: PMPL-1.0-or-later
//! wcag-engine CLI - WCAG compliance scoring from the command line

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wcag_engine::analyzers::ContrastEvaluator;
use wcag_engine::announce::{AnnouncementQueue, LiveAnnouncement, TracingSpeaker};
use wcag_engine::report::{generate_report, OutputFormat};
use wcag_engine::theme::{builtin_themes, validate_theme};
use wcag_engine::{load_config, scanner, Catalog, Config, WcagLevel};

/// WCAG compliance evaluation engine
#[derive(Parser)]
#[command(name = "wcag-engine")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the contrast of one color pair
    Contrast {
        /// Foreground color (#rgb, #rrggbb, rgb(), or a CSS name)
        foreground: String,

        /// Background color
        background: String,

        /// Configuration file
        #[arg(long, default_value = "wcag-engine.toml")]
        config: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: SimpleFormatArg,
    },

    /// Run every evaluator over a scan description
    Scan {
        /// Scan description (JSON)
        file: PathBuf,

        /// Configuration file
        #[arg(long, default_value = "wcag-engine.toml")]
        config: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// List the WCAG criteria in the built-in catalog
    Catalog {
        /// Only criteria at or below this level
        #[arg(long)]
        level: Option<WcagLevelArg>,
    },

    /// Validate the built-in high contrast themes
    Themes {
        /// Output format
        #[arg(long, default_value = "text")]
        format: SimpleFormatArg,
    },

    /// Replay announcements through the priority queue
    Announce {
        /// Announcements (JSON array)
        file: PathBuf,

        /// Configuration file
        #[arg(long, default_value = "wcag-engine.toml")]
        config: PathBuf,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },
}

/// WCAG conformance level CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum WcagLevelArg {
    /// Level A - minimum
    A,
    /// Level AA - standard
    Aa,
    /// Level AAA - enhanced
    Aaa,
}

impl From<WcagLevelArg> for WcagLevel {
    fn from(arg: WcagLevelArg) -> Self {
        match arg {
            WcagLevelArg::A => WcagLevel::A,
            WcagLevelArg::Aa => WcagLevel::AA,
            WcagLevelArg::Aaa => WcagLevel::AAA,
        }
    }
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI
    Sarif,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Sarif => OutputFormat::Sarif,
        }
    }
}

/// Output format for commands without a SARIF rendering
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SimpleFormatArg {
    Text,
    Json,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("wcag_engine=debug")
    } else {
        EnvFilter::new("wcag_engine=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Contrast { foreground, background, config, format } => {
            init_logging(false);
            let config = load_config(&config)?;
            let check = ContrastEvaluator::new(config.contrast)
                .evaluate_str(&foreground, &background)?;
            match format {
                SimpleFormatArg::Json => println!("{}", serde_json::to_string_pretty(&check)?),
                SimpleFormatArg::Text => {
                    println!("{} on {}", check.foreground, check.background);
                    println!("Ratio: {:.2}:1", check.ratio);
                    println!("AA:    {}", if check.wcag_aa { "pass" } else { "fail" });
                    println!("AAA:   {}", if check.wcag_aaa { "pass" } else { "fail" });
                    println!("Score: {:.0}", check.score);
                    println!("{}", check.recommendation.message());
                }
            }
        }

        Commands::Scan { file, config, format, output, verbose } => {
            init_logging(verbose);
            let config = load_config(&config)?;
            let input = scanner::load_scan_input(&file)
                .with_context(|| format!("reading scan input {}", file.display()))?;
            let scan = scanner::run_scan(&input, &config);
            let report = generate_report(&scan, format.into());
            write_output(&report, output.as_deref())?;

            if !scan.aggregate.meets(config.compliance.required_level) {
                std::process::exit(1);
            }
        }

        Commands::Catalog { level } => {
            init_logging(false);
            let catalog = Catalog::wcag21();
            let max = level.map_or(WcagLevel::AAA, WcagLevel::from);
            println!("{} ({} criteria)", catalog.version, catalog.len());
            for c in catalog.up_to_level(max) {
                println!(
                    "{:<7} {:<3} {:<14} {}",
                    c.id,
                    c.level.to_string(),
                    c.principle.to_string(),
                    c.title
                );
            }
        }

        Commands::Themes { format } => {
            init_logging(false);
            let evaluator = ContrastEvaluator::default();
            let reports: Vec<_> = builtin_themes()
                .iter()
                .map(|t| (t, validate_theme(t, &evaluator)))
                .collect();
            match format {
                SimpleFormatArg::Json => {
                    let json: Vec<_> = reports.iter().map(|(_, r)| r).collect();
                    println!("{}", serde_json::to_string_pretty(&json)?);
                }
                SimpleFormatArg::Text => {
                    for (theme, report) in &reports {
                        println!(
                            "{:<16} avg {:>5.2}:1  {}",
                            theme.name,
                            report.average_ratio,
                            if report.compliant { "AA compliant" } else { "NOT compliant" }
                        );
                    }
                }
            }
        }

        Commands::Announce { file, config, verbose } => {
            init_logging(verbose);
            let config = load_config(&config)?;
            replay_announcements(&file, &config)?;
        }
    }

    Ok(())
}

/// Feed announcements in file order; an idle queue speaks immediately
fn replay_announcements(path: &Path, config: &Config) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading announcements {}", path.display()))?;
    let announcements: Vec<LiveAnnouncement> = serde_json::from_str(&content)?;

    let queue = AnnouncementQueue::new(Arc::new(TracingSpeaker), &config.announcements);
    for announcement in announcements {
        queue.enqueue(announcement);
        if queue.active().is_none() {
            queue.dequeue_next();
        }
    }
    while queue.dequeue_next().is_some() {}
    queue.complete_active();

    for record in queue.history() {
        println!(
            "{:<10} {:<9} {}",
            format!("{:?}", record.status).to_lowercase(),
            format!("{:?}", record.announcement.priority).to_lowercase(),
            record.announcement.message
        );
    }
    Ok(())
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
