//! Command handlers (imperative shell)
//!
//! - `fund`: create, list, status and load, plus the main menu
//! - `session`: the loaded-fund menu and the completion menu

pub mod fund;
pub mod session;

use crate::cli_config::FundDefaults;
use crate::logic::OutputFormat;
use lib_chitfund::FundRegistry;

/// Everything a handler needs besides input and output
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub registry: FundRegistry,
    pub format: OutputFormat,
    pub defaults: FundDefaults,
}
