//! Pure functional business logic
//!
//! Parsing, validation and rendering without side effects. The command
//! layer composes these with the engine, prompts and output.

pub mod input;
pub mod menu;
pub mod paths;
pub mod render;

// Re-export commonly used types
pub use input::{OutputFormat, parse_output_format, parse_amount, parse_duration_count, parse_duration_unit, parse_member_count, parse_roster, parse_selection};
pub use menu::{MainMenuChoice, FundMenuCommand, CompletionChoice, parse_main_menu, parse_fund_command, parse_completion_choice};
pub use paths::{normalize_path, expand_home_directory, resolve_data_dir};
