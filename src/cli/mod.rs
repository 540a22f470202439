//! CLI command definitions and handlers

mod analyze;
mod export;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use bpmn_analysis::config::{load_config, Config};
use bpmn_analysis::UnresolvedPolicy;

/// Structural checks and complexity scoring for XPDL process models
#[derive(Parser, Debug)]
#[command(name = "bpmn-analysis", version)]
#[command(after_help = "\
Examples:
  bpmn-analysis analyze orders.xpdl                  Issue table per process
  bpmn-analysis analyze *.xpdl --format summary      File, process id and ';' summary per process
  bpmn-analysis analyze orders.xpdl --format json    Full report as JSON
  bpmn-analysis export orders.xpdl --split           One .nt file per process")]
pub struct Cli {
    /// Config file (default: ./bpmn-analysis.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Worker threads for batch analysis (0 = one per CPU)
    #[arg(long, global = true)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate process structure and compute the CSC score
    Analyze {
        /// XPDL documents to analyze
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format: text, summary, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "summary", "json"])]
        format: String,

        /// Transitions with unknown endpoints: skip them, or reject the process
        #[arg(long, value_parser = ["skip", "fail-fast"])]
        policy: Option<String>,

        /// Exit with code 1 when any process has issues or is rejected
        #[arg(long)]
        fail_on_issues: bool,
    },

    /// Write the process structure as N-Triples
    Export {
        /// XPDL document to export
        file: PathBuf,

        /// Directory for the .nt files (default: next to the input)
        #[arg(long, short = 'o')]
        output_dir: Option<PathBuf>,

        /// One file per process instead of one per document
        #[arg(long)]
        split: bool,

        /// Transitions with unknown endpoints: leave them out, or fail the export
        #[arg(long, value_parser = ["skip", "fail-fast"])]
        policy: Option<String>,
    },
}

fn parse_policy(raw: &str) -> UnresolvedPolicy {
    match raw {
        "fail-fast" => UnresolvedPolicy::FailFast,
        _ => UnresolvedPolicy::Skip,
    }
}

/// Run the parsed command; returns the process exit code
pub fn run(cli: Cli) -> Result<i32> {
    let mut config: Config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(workers) = cli.workers {
        config.batch.workers = workers;
    }

    match cli.command {
        Commands::Analyze {
            files,
            format,
            policy,
            fail_on_issues,
        } => {
            if let Some(policy) = policy.as_deref() {
                config.analysis.unresolved_transitions = parse_policy(policy);
            }
            analyze::run(&files, &format, fail_on_issues, &config)
        }
        Commands::Export {
            file,
            output_dir,
            split,
            policy,
        } => {
            if let Some(policy) = policy.as_deref() {
                config.analysis.unresolved_transitions = parse_policy(policy);
            }
            export::run(&file, output_dir.as_deref(), split, &config)
        }
    }
}
