//! Chit fund CLI
//!
//! Command-line surface: global flags, subcommands and the runner that
//! wires configuration, logging and the command handlers together.

use crate::cli_config;
use crate::commands::{self, CommandContext};
use crate::error::CliResult;
use crate::logic::{self, OutputFormat};
use crate::output::ConsoleOutput;
use crate::prompt::StdinPrompt;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use lib_chitfund::{Amount, DurationUnit, FundRegistry};
use serde_json::Value;
use tracing::debug;

/// Rotating savings fund manager
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(name = "chitfund")]
pub struct ChitFundCli {
    /// Directory holding one subdirectory per fund
    #[arg(short, long, env = "CHITFUND_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "CHITFUND_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, env = "CHITFUND_VERBOSE")]
    pub verbose: bool,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", env = "CHITFUND_FORMAT")]
    pub format: String,

    /// Without a subcommand the interactive main menu opens
    #[command(subcommand)]
    pub command: Option<FundCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FundCommand {
    /// Create a new fund; missing values are asked for interactively
    Create(CreateArgs),

    /// List all funds
    List,

    /// Show round progress of one fund
    Status {
        /// Fund name
        name: String,
    },

    /// Open a fund's interactive menu
    Load {
        /// Fund name (chosen from a list when omitted)
        name: Option<String>,
    },
}

/// Fund creation arguments
#[derive(Args, Debug, Clone, Default)]
pub struct CreateArgs {
    /// Fund name
    pub name: Option<String>,

    /// Contribution each member pays per round
    #[arg(short, long)]
    pub amount: Option<Amount>,

    /// Cadence of contributions (weekly, monthly)
    #[arg(short = 'u', long, value_parser = parse_duration_unit_arg)]
    pub duration_unit: Option<DurationUnit>,

    /// Number of periods in the fund's duration
    #[arg(short = 'n', long)]
    pub duration_count: Option<u32>,

    /// Initial members, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub members: Vec<String>,
}

fn parse_duration_unit_arg(value: &str) -> std::result::Result<DurationUnit, String> {
    logic::parse_duration_unit(value).map_err(|e| e.to_string())
}

/// Main CLI runner
pub fn run_cli() -> Result<()> {
    let cli = ChitFundCli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = cli_config::load_config(cli.config.as_deref())?;
    let format = logic::parse_output_format(&cli.format)?;
    let data_dir = logic::resolve_data_dir(cli.data_dir.as_deref(), config.data_dir.as_deref())?;
    debug!(format = format.as_str(), "Using fund data directory {}", data_dir.display());

    let context = CommandContext {
        registry: FundRegistry::new(data_dir),
        format,
        defaults: config.defaults.unwrap_or_default(),
    };

    let mut prompt = StdinPrompt;
    let output = ConsoleOutput;
    let mut rng = rand::thread_rng();

    commands::fund::handle_fund_command(cli.command, &context, &mut prompt, &output, &mut rng)
        .map_err(anyhow::Error::from)
}

/// Format output based on CLI format preference
pub fn format_output(data: &Value, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Table => {
            if let Some(obj) = data.as_object() {
                let mut result = String::new();
                for (key, value) in obj {
                    result.push_str(&format!("{:<20} {}\n", key, plain(value)));
                }
                Ok(result)
            } else if let Some(array) = data.as_array() {
                let mut result = String::new();
                for (i, item) in array.iter().enumerate() {
                    result.push_str(&format!("[{}] {}\n", i + 1, plain(item)));
                }
                Ok(result)
            } else {
                Ok(plain(data))
            }
        }
    }
}

/// Strings without quotes, lists joined by commas
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        Value::Array(items) if items.is_empty() => "-".to_string(),
        Value::Array(items) => items.iter().map(plain).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}
