//! Menu parsing for the interactive shell
//!
//! Pure functions: text in, command out. Numbered choices and command words
//! are both accepted.

/// Top-level menu (no fund loaded)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuChoice {
    CreateFund,
    LoadFund,
    ViewFunds,
    Exit,
    Empty,
    Unknown,
}

pub fn parse_main_menu(input: &str) -> MainMenuChoice {
    match input.trim().to_lowercase().as_str() {
        "" => MainMenuChoice::Empty,
        "1" | "create" | "create-fund" => MainMenuChoice::CreateFund,
        "2" | "load" | "load-fund" => MainMenuChoice::LoadFund,
        "3" | "view" | "list" | "view-funds" => MainMenuChoice::ViewFunds,
        "4" | "exit" | "quit" => MainMenuChoice::Exit,
        _ => MainMenuChoice::Unknown,
    }
}

pub fn main_menu_text() -> String {
    "Chit Fund Manager
  1) create    - Create a new fund
  2) load      - Load an existing fund
  3) view      - View all funds
  4) exit      - Exit"
        .to_string()
}

/// Commands available inside a loaded fund
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundMenuCommand {
    AddMember(Option<String>),
    Collect(Option<String>),
    Payout,
    Status,
    Members,
    History,
    Help,
    Exit,
    Empty,
    Unknown,
}

/// Split off an optional member name argument
fn argument(rest: &str) -> Option<String> {
    let rest = rest.trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

/// Parse a fund menu line such as `collect Asha` or `3`
pub fn parse_fund_command(input: &str) -> FundMenuCommand {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return FundMenuCommand::Empty;
    }

    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (trimmed, ""),
    };

    match word.to_lowercase().as_str() {
        "1" | "add" | "add-member" => FundMenuCommand::AddMember(argument(rest)),
        "2" | "collect" | "collect-contribution" => FundMenuCommand::Collect(argument(rest)),
        "3" | "payout" => FundMenuCommand::Payout,
        "4" | "status" => FundMenuCommand::Status,
        "5" | "members" => FundMenuCommand::Members,
        "6" | "history" => FundMenuCommand::History,
        "help" | "?" => FundMenuCommand::Help,
        "7" | "exit" | "quit" | "back" => FundMenuCommand::Exit,
        _ => FundMenuCommand::Unknown,
    }
}

pub fn fund_menu_text(fund_name: &str) -> String {
    format!(
        "Fund: {}
  1) add [name]      - Enroll a new member (before the first contribution)
  2) collect [name]  - Collect a member's contribution
  3) payout          - Pay the pool to a random eligible member
  4) status          - Show round progress
  5) members         - List members and balances
  6) history         - Show the transaction log
  7) exit            - Leave this fund",
        fund_name
    )
}

pub fn fund_prompt(fund_name: &str) -> String {
    format!("chitfund:{}> ", fund_name)
}

/// Choices offered once a fund has completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionChoice {
    Restart,
    EditAndRestart,
    EndFund,
    Back,
    Unknown,
}

pub fn parse_completion_choice(input: &str) -> CompletionChoice {
    match input.trim().to_lowercase().as_str() {
        "1" | "restart" => CompletionChoice::Restart,
        "2" | "edit" => CompletionChoice::EditAndRestart,
        "3" | "end" => CompletionChoice::EndFund,
        "4" | "back" | "exit" => CompletionChoice::Back,
        _ => CompletionChoice::Unknown,
    }
}

pub fn completion_menu_text() -> String {
    "The fund has completed all rounds.
  1) restart  - Start again with the same members
  2) edit     - Change the terms and members, then start again
  3) end      - End the fund (records are kept)
  4) back     - Leave the fund without changes"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_main_menu() {
        assert_eq!(parse_main_menu("1"), MainMenuChoice::CreateFund);
        assert_eq!(parse_main_menu("load"), MainMenuChoice::LoadFund);
        assert_eq!(parse_main_menu(" VIEW "), MainMenuChoice::ViewFunds);
        assert_eq!(parse_main_menu("quit"), MainMenuChoice::Exit);
        assert_eq!(parse_main_menu(""), MainMenuChoice::Empty);
        assert_eq!(parse_main_menu("9"), MainMenuChoice::Unknown);
    }

    #[test]
    fn test_parse_fund_command_with_argument() {
        assert_eq!(
            parse_fund_command("collect Mary Ann"),
            FundMenuCommand::Collect(Some("Mary Ann".to_string()))
        );
        assert_eq!(
            parse_fund_command("1 Dev"),
            FundMenuCommand::AddMember(Some("Dev".to_string()))
        );
        assert_eq!(parse_fund_command("collect"), FundMenuCommand::Collect(None));
    }

    #[test]
    fn test_parse_fund_command_words() {
        assert_eq!(parse_fund_command("payout"), FundMenuCommand::Payout);
        assert_eq!(parse_fund_command("STATUS"), FundMenuCommand::Status);
        assert_eq!(parse_fund_command("7"), FundMenuCommand::Exit);
        assert_eq!(parse_fund_command("   "), FundMenuCommand::Empty);
        assert_eq!(parse_fund_command("dance"), FundMenuCommand::Unknown);
    }

    #[test]
    fn test_parse_completion_choice() {
        assert_eq!(parse_completion_choice("1"), CompletionChoice::Restart);
        assert_eq!(parse_completion_choice("edit"), CompletionChoice::EditAndRestart);
        assert_eq!(parse_completion_choice("3"), CompletionChoice::EndFund);
        assert_eq!(parse_completion_choice("exit"), CompletionChoice::Back);
        assert_eq!(parse_completion_choice("again"), CompletionChoice::Unknown);
    }

    #[test]
    fn test_menu_texts() {
        assert!(main_menu_text().contains("create"));
        assert!(fund_menu_text("Family").contains("Fund: Family"));
        assert!(completion_menu_text().contains("restart"));
        assert_eq!(fund_prompt("Family"), "chitfund:Family> ");
    }
}
