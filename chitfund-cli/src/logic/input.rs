//! Pure parsing of user-typed values
//!
//! Every parser returns `CliError::InvalidInput` on bad input; interactive
//! callers re-prompt instead of failing.

use lib_chitfund::{Amount, DurationUnit};
use crate::error::{CliError, CliResult};

/// Output format for listing and status commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        }
    }
}

/// Validate output format
pub fn parse_output_format(format: &str) -> CliResult<OutputFormat> {
    match format.trim().to_lowercase().as_str() {
        "table" => Ok(OutputFormat::Table),
        "json" => Ok(OutputFormat::Json),
        other => Err(CliError::UnsupportedFormat(other.to_string())),
    }
}

/// Contribution amount: a positive whole number
pub fn parse_amount(input: &str) -> CliResult<Amount> {
    let trimmed = input.trim();
    let amount: Amount = trimmed
        .parse()
        .map_err(|_| CliError::InvalidInput(format!("'{}' is not a whole number", trimmed)))?;
    if amount == 0 {
        return Err(CliError::InvalidInput(
            "Amount must be greater than zero".to_string(),
        ));
    }
    Ok(amount)
}

/// Duration count: a positive whole number
pub fn parse_duration_count(input: &str) -> CliResult<u32> {
    let trimmed = input.trim();
    let count: u32 = trimmed
        .parse()
        .map_err(|_| CliError::InvalidInput(format!("'{}' is not a whole number", trimmed)))?;
    if count == 0 {
        return Err(CliError::InvalidInput(
            "Duration must be greater than zero".to_string(),
        ));
    }
    Ok(count)
}

/// Number of members to enter; zero is allowed (enroll later)
pub fn parse_member_count(input: &str) -> CliResult<usize> {
    let trimmed = input.trim();
    trimmed
        .parse()
        .map_err(|_| CliError::InvalidInput(format!("'{}' is not a whole number", trimmed)))
}

pub fn parse_duration_unit(input: &str) -> CliResult<DurationUnit> {
    input
        .parse()
        .map_err(|_| CliError::InvalidInput(format!(
            "'{}' is not a duration. Choose 1) Weekly or 2) Monthly",
            input.trim()
        )))
}

/// Comma-separated member names, blanks dropped
pub fn parse_roster(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pick an entry from a numbered list (1-based) or by exact name
pub fn parse_selection(input: &str, options: &[String]) -> CliResult<String> {
    let trimmed = input.trim();
    if let Ok(index) = trimmed.parse::<usize>() {
        return options
            .get(index.wrapping_sub(1))
            .cloned()
            .ok_or_else(|| CliError::InvalidInput(format!(
                "Choose a number between 1 and {}",
                options.len()
            )));
    }
    options
        .iter()
        .find(|option| option.as_str() == trimmed)
        .cloned()
        .ok_or_else(|| CliError::InvalidInput(format!("No fund named '{}'", trimmed)))
}
