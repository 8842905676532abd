//! Chit fund CLI library
//!
//! Interactive and scriptable front end for managing rotating savings
//! funds stored on disk by `lib-chitfund`.
//!
//! ## Architecture
//!
//! This crate follows the **Functional Core, Imperative Shell** (FCIS) architecture pattern:
//!
//! - **Functional Core** (`logic/` module): Pure parsing, menus and rendering
//! - **Imperative Shell** (`commands/` module): Prompts, fund engine calls, printing
//! - **Error Handling** (`error/` module): Structured, domain-specific error types
//! - **Output Abstraction** (`output/` module): Testable printing interface
//! - **Input Abstraction** (`prompt/` module): Scriptable line input

pub mod argument_parsing;
pub mod cli_config;
pub mod commands;

pub mod error;
pub mod logic;
pub mod output;
pub mod prompt;

pub use argument_parsing::{format_output, run_cli, ChitFundCli, CreateArgs, FundCommand};
pub use error::{CliError, CliResult};
pub use output::Output;
pub use prompt::Prompt;
