//! Scripted end-to-end runs of the chitfund command handlers
//!
//! Each test drives `handle_fund_command` with a `ScriptedPrompt`, captures
//! output with `MockOutput` and checks the fund directory afterwards.

use chitfund_cli::cli_config::FundDefaults;
use chitfund_cli::commands::fund::handle_fund_command;
use chitfund_cli::commands::CommandContext;
use chitfund_cli::logic::OutputFormat;
use chitfund_cli::output::testing::MockOutput;
use chitfund_cli::prompt::ScriptedPrompt;
use chitfund_cli::{CreateArgs, FundCommand};
use lib_chitfund::{DurationUnit, FundPhase, FundRegistry, FundTerms, TransactionKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

fn context(tmp: &TempDir, format: OutputFormat) -> CommandContext {
    CommandContext {
        registry: FundRegistry::new(tmp.path().join("funds")),
        format,
        defaults: FundDefaults::default(),
    }
}

fn run(ctx: &CommandContext, command: Option<FundCommand>, answers: &[&str]) -> MockOutput {
    let mut prompt = ScriptedPrompt::new(answers.iter().copied());
    let output = MockOutput::new();
    let mut rng = StdRng::seed_from_u64(42);
    handle_fund_command(command, ctx, &mut prompt, &output, &mut rng).unwrap();
    output
}

#[test]
fn main_menu_runs_a_fund_to_its_end() {
    let tmp = TempDir::new().unwrap();
    let ctx = context(&tmp, OutputFormat::Table);

    let output = run(
        &ctx,
        None,
        &[
            "1", "Family", "100", "2", "3", "3", "Asha", "Ben", "Chitra",
            "collect Asha", "collect Ben", "collect Chitra", "payout",
            "collect Asha", "collect Ben", "collect Chitra", "payout",
            "collect Asha", "collect Ben", "collect Chitra", "payout",
            "end",
        ],
    );

    output.expect_message("Fund 'Family' created");
    output.expect_message("Round 3 payout");
    output.expect_message("Fund 'Family' ended");

    let engine = ctx.registry.open_fund("Family").unwrap();
    assert_eq!(engine.phase(), FundPhase::Completed);
    assert_eq!(engine.state().paid_members.len(), 3);
    let payouts = engine
        .transactions()
        .iter()
        .filter(|t| t.kind == TransactionKind::Payout)
        .count();
    assert_eq!(payouts, 3);
    let net: i64 = engine.members().iter().map(|m| m.balance).sum();
    assert_eq!(net, 0);
}

#[test]
fn main_menu_reprompts_and_returns_after_leaving_a_fund() {
    let tmp = TempDir::new().unwrap();
    let ctx = context(&tmp, OutputFormat::Table);

    let output = run(
        &ctx,
        None,
        &[
            "hello", "create", "../escape", "Office", "ten", "10", "monthly", "0", "6", "1", "Asha",
            "exit", "3", "4",
        ],
    );

    output.expect_error("Unknown choice 'hello'");
    output.expect_error("Invalid fund name");
    output.expect_error("'ten' is not a whole number");
    output.expect_error("Duration must be greater than zero");
    output.expect_message("Office");
    assert!(ctx.registry.exists("Office"));
    assert_eq!(ctx.registry.list_funds().unwrap(), vec!["Office"]);
}

#[test]
fn load_subcommand_resumes_state_from_disk() {
    let tmp = TempDir::new().unwrap();
    let ctx = context(&tmp, OutputFormat::Table);
    let names: Vec<String> = ["Asha", "Ben"].iter().map(|n| n.to_string()).collect();
    let mut engine = ctx
        .registry
        .create_fund("Family", FundTerms::new(25, DurationUnit::Weekly, 4), &names)
        .unwrap();
    engine.collect_contribution("Asha").unwrap();
    drop(engine);

    let output = run(
        &ctx,
        Some(FundCommand::Load { name: Some("Family".to_string()) }),
        &["collect Asha", "collect Ben", "payout", "exit"],
    );

    output.expect_error("already contributed");
    output.expect_message("receives 50");
    let engine = ctx.registry.open_fund("Family").unwrap();
    assert_eq!(engine.state().current_round, 1);
    assert_eq!(engine.transactions().len(), 3);
}

#[test]
fn create_subcommand_with_flags_is_non_interactive() {
    let tmp = TempDir::new().unwrap();
    let ctx = context(&tmp, OutputFormat::Table);
    let args = CreateArgs {
        name: Some("Club".to_string()),
        amount: Some(500),
        duration_unit: Some(DurationUnit::Monthly),
        duration_count: Some(12),
        members: vec!["Asha".to_string(), "Ben".to_string()],
    };

    let output = run(&ctx, Some(FundCommand::Create(args)), &[]);

    output.expect_message("2 member(s), 2 round(s)");
    let engine = ctx.registry.open_fund("Club").unwrap();
    assert_eq!(engine.fund().contribution_amount, 500);
}

#[test]
fn list_and_status_as_json() {
    let tmp = TempDir::new().unwrap();
    let ctx = context(&tmp, OutputFormat::Json);
    let names: Vec<String> = ["Asha", "Ben"].iter().map(|n| n.to_string()).collect();
    ctx.registry
        .create_fund("Family", FundTerms::new(100, DurationUnit::Monthly, 2), &names)
        .unwrap();

    let output = run(&ctx, Some(FundCommand::List), &[]);
    let listing: serde_json::Value = serde_json::from_str(&output.messages()[0]).unwrap();
    assert_eq!(listing[0]["name"], "Family");

    let output = run(&ctx, Some(FundCommand::Status { name: "Family".to_string() }), &[]);
    let status: serde_json::Value = serde_json::from_str(&output.messages()[0]).unwrap();
    assert_eq!(status["fund"], "Family");
    assert_eq!(status["pool"], 200);
}

#[test]
fn end_of_input_exits_cleanly() {
    let tmp = TempDir::new().unwrap();
    let ctx = context(&tmp, OutputFormat::Table);

    let output = run(&ctx, None, &["1", "Half"]);

    assert!(output.errors().is_empty());
    assert!(!ctx.registry.exists("Half"));
}
