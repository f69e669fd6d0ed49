use crate::config::Config;
use crate::keys::KeySynthesizer;
use crate::report::{CommandTagParser, ReportAggregator, ReportFormat, Workbook};
use crate::scanner::{ArtifactLocator, DirectoryClassifier};
use crate::ui;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "rfid-catalog")]
#[command(
    version,
    about = "Catalog RFID tag dumps and generate missing key files",
    long_about = None
)]
pub struct Args {
    /// Root of the tag tree (default: parent directory)
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Configuration file (default: ./rfid-catalog.toml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (suppress output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run (show what would be done)
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List tag directories and the artifacts they hold
    Scan,

    /// Generate key.bin files for directories that only have dump.json
    Keys,

    /// Parse every dump.bin and write a report
    Report {
        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format (json or text)
        #[arg(short, long)]
        format: Option<ReportFormat>,
    },
}

impl Args {
    /// Log filter used when RUST_LOG is unset.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

pub fn run(args: Args) -> Result<()> {
    let mut config = Config::discover(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(root) = &args.root {
        config.root = root.clone();
    }

    if !config.root.is_dir() {
        anyhow::bail!("Tag root is not a directory: {}", config.root.display());
    }

    match &args.command {
        Some(Commands::Scan) => scan(&config, &args)?,
        Some(Commands::Keys) => generate_keys(&config, &args)?,
        Some(Commands::Report { output, format }) => {
            if let Some(output) = output {
                config.report.output = output.clone();
            }
            if let Some(format) = format {
                config.report.format = *format;
            }
            build_report(&config, &args)?;
        }
        None => {
            generate_keys(&config, &args)?;
            if config.parser.command.is_some() {
                build_report(&config, &args)?;
            } else {
                log::info!("No tag parser configured, skipping report");
            }
        }
    }

    Ok(())
}

fn classifier(config: &Config) -> DirectoryClassifier {
    DirectoryClassifier::with_excluded(config.exclude.iter().cloned())
}

fn scan(config: &Config, args: &Args) -> Result<()> {
    let locator = ArtifactLocator::new(config.match_policy());
    let mut entries = Vec::new();

    for dir in classifier(config).scan(&config.root)? {
        match locator.locate(&dir) {
            Ok(artifacts) => entries.push((dir, artifacts)),
            Err(e) => eprintln!("{} {}", "✗".red(), e),
        }
    }

    if !args.quiet {
        ui::print_scan(&entries);
    }
    Ok(())
}

fn generate_keys(config: &Config, args: &Args) -> Result<()> {
    if !args.quiet {
        println!("{}", "Searching for directories missing key.bin...".bold());
    }

    let synthesizer = KeySynthesizer::new(classifier(config), config.match_policy())
        .with_progress(ui::progress_bar(args.quiet));
    let summary = synthesizer
        .run(&config.root, args.dry_run)
        .with_context(|| format!("Failed to scan {}", config.root.display()))?;

    if !args.quiet {
        if summary.attempted() == 0 && summary.planned.is_empty() {
            println!("No directories need a key file.");
        } else {
            ui::print_synthesis_summary(&summary);
        }
    }
    Ok(())
}

fn build_report(config: &Config, args: &Args) -> Result<()> {
    let program = config
        .parser
        .command
        .as_deref()
        .context("No tag parser configured; set [parser] command in the config file")?;
    let parser = CommandTagParser::new(program, config.parser.args.clone());

    let aggregator = ReportAggregator::new(classifier(config), config.layout)
        .with_progress(ui::progress_bar(args.quiet));
    let report = aggregator.aggregate(&config.root, &parser);

    if args.dry_run {
        log::info!("Dry run, report not written");
        return Ok(());
    }

    Workbook::from_report(&report)
        .export(&config.report.output, config.report.format)
        .context("Failed to write report")?;

    if !args.quiet {
        ui::print_report_summary(&report, &config.report.output);
    }
    Ok(())
}
