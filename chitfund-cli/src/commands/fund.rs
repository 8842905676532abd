//! Fund commands: create, list, status, load and the main menu

use rand::RngCore;
use tracing::{debug, info};

use crate::argument_parsing::{format_output, CreateArgs, FundCommand};
use crate::commands::session::{run_fund_session, SessionExit};
use crate::commands::CommandContext;
use crate::error::{CliError, CliResult};
use crate::logic::{self, render, MainMenuChoice, OutputFormat};
use crate::output::Output;
use crate::prompt::{ask_parsed, Prompt};
use lib_chitfund::{
    validate_member_name, Amount, DurationUnit, FundEngine, FundError, FundRegistry, FundTerms,
    JsonFileStore,
};

/// Dispatch a parsed subcommand; no subcommand opens the main menu
pub fn handle_fund_command(
    command: Option<FundCommand>,
    ctx: &CommandContext,
    prompt: &mut dyn Prompt,
    output: &dyn Output,
    rng: &mut dyn RngCore,
) -> CliResult<()> {
    let result = match command {
        None => run_main_menu(ctx, prompt, output, rng),
        Some(FundCommand::Create(args)) => create_fund(args, ctx, prompt, output).map(|_| ()),
        Some(FundCommand::List) => view_funds(ctx, output),
        Some(FundCommand::Status { name }) => show_status(&name, ctx, output),
        Some(FundCommand::Load { name }) => {
            run_load_choice(name, ctx, prompt, output, rng).map(|_| ())
        }
    };

    match result {
        Err(CliError::InputClosed) => {
            debug!("input closed, leaving");
            Ok(())
        }
        other => other,
    }
}

// ============================================================================
// MAIN MENU
// ============================================================================

/// Top-level loop: create, load, view, exit.
///
/// Leaving a fund returns here; ending a fund or closing input ends the loop.
pub fn run_main_menu(
    ctx: &CommandContext,
    prompt: &mut dyn Prompt,
    output: &dyn Output,
    rng: &mut dyn RngCore,
) -> CliResult<()> {
    output.print(&logic::menu::main_menu_text())?;
    loop {
        let line = match prompt.read_line("chitfund> ")? {
            Some(line) => line,
            None => return Ok(()),
        };

        let outcome = match logic::parse_main_menu(&line) {
            MainMenuChoice::CreateFund => run_create_choice(ctx, prompt, output, rng),
            MainMenuChoice::LoadFund => run_load_choice(None, ctx, prompt, output, rng),
            MainMenuChoice::ViewFunds => view_funds(ctx, output).map(|_| SessionExit::Exited),
            MainMenuChoice::Exit => return Ok(()),
            MainMenuChoice::Empty => continue,
            MainMenuChoice::Unknown => {
                output.error(&format!("Unknown choice '{}'. Choose 1-4.", line.trim()))?;
                continue;
            }
        };

        match outcome {
            Ok(SessionExit::FundEnded) => return Ok(()),
            Ok(SessionExit::Exited) => output.print(&logic::menu::main_menu_text())?,
            Err(CliError::InputClosed) => return Ok(()),
            Err(e) => output.error(&e.to_string())?,
        }
    }
}

fn run_create_choice(
    ctx: &CommandContext,
    prompt: &mut dyn Prompt,
    output: &dyn Output,
    rng: &mut dyn RngCore,
) -> CliResult<SessionExit> {
    let mut engine = create_fund(CreateArgs::default(), ctx, prompt, output)?;
    run_fund_session(&mut engine, prompt, output, rng, ctx.format)
}

fn run_load_choice(
    name: Option<String>,
    ctx: &CommandContext,
    prompt: &mut dyn Prompt,
    output: &dyn Output,
    rng: &mut dyn RngCore,
) -> CliResult<SessionExit> {
    let mut engine = load_fund(name, ctx, prompt, output)?;
    run_fund_session(&mut engine, prompt, output, rng, ctx.format)
}

// ============================================================================
// CREATE
// ============================================================================

/// Create a fund from flags, asking for whatever is missing.
///
/// Duration falls back to the configured defaults before prompting. When
/// name, amount and duration all come from flags the roster is taken from
/// `--members` as given (possibly empty) and nothing is asked.
pub fn create_fund(
    args: CreateArgs,
    ctx: &CommandContext,
    prompt: &mut dyn Prompt,
    output: &dyn Output,
) -> CliResult<FundEngine<JsonFileStore>> {
    let duration_unit = args.duration_unit.or(ctx.defaults.duration_unit()?);
    let duration_count = args.duration_count.or(ctx.defaults.duration_count()?);
    let fully_specified = args.name.is_some()
        && args.amount.is_some()
        && duration_unit.is_some()
        && duration_count.is_some();

    let name = match args.name {
        Some(name) => name,
        None => ask_parsed(prompt, output, "Fund name: ", |answer| {
            parse_new_fund_name(&ctx.registry, answer)
        })?,
    };
    let contribution_amount = match args.amount {
        Some(amount) => amount,
        None => ask_amount(prompt, output)?,
    };
    let duration_unit = match duration_unit {
        Some(unit) => unit,
        None => ask_duration_unit(prompt, output)?,
    };
    let duration_count = match duration_count {
        Some(count) => count,
        None => ask_duration_count(prompt, output)?,
    };
    let terms = FundTerms::new(contribution_amount, duration_unit, duration_count);

    let flagged: Vec<String> = args.members.iter().flat_map(|m| logic::parse_roster(m)).collect();
    let roster = if !flagged.is_empty() || fully_specified {
        flagged
    } else {
        ask_roster(prompt, output)?
    };

    let engine = ctx.registry.create_fund(&name, terms, &roster)?;
    info!(fund = %name, members = roster.len(), "fund created");

    let fund = engine.fund();
    output.success(&format!(
        "Fund '{}' created: {} per round, {} x{}, {} member(s), {} round(s)",
        fund.name,
        fund.contribution_amount,
        fund.duration_unit,
        fund.duration_count,
        engine.members().len(),
        fund.total_rounds
    ))?;
    Ok(engine)
}

/// A name that is valid and not yet taken in the registry
fn parse_new_fund_name(registry: &FundRegistry, input: &str) -> CliResult<String> {
    let name = input.trim();
    registry.fund_dir(name)?;
    if registry.exists(name) {
        return Err(CliError::InvalidInput(format!(
            "A fund named '{}' already exists",
            name
        )));
    }
    Ok(name.to_string())
}

fn ask_amount(prompt: &mut dyn Prompt, output: &dyn Output) -> CliResult<Amount> {
    ask_parsed(prompt, output, "Contribution amount per round: ", logic::parse_amount)
}

fn ask_duration_unit(prompt: &mut dyn Prompt, output: &dyn Output) -> CliResult<DurationUnit> {
    ask_parsed(
        prompt,
        output,
        "Duration unit (1) Weekly, 2) Monthly): ",
        logic::parse_duration_unit,
    )
}

fn ask_duration_count(prompt: &mut dyn Prompt, output: &dyn Output) -> CliResult<u32> {
    ask_parsed(prompt, output, "Duration count: ", logic::parse_duration_count)
}

/// Ask for amount and duration
pub(crate) fn ask_terms(prompt: &mut dyn Prompt, output: &dyn Output) -> CliResult<FundTerms> {
    let contribution_amount = ask_amount(prompt, output)?;
    let duration_unit = ask_duration_unit(prompt, output)?;
    let duration_count = ask_duration_count(prompt, output)?;
    Ok(FundTerms::new(contribution_amount, duration_unit, duration_count))
}

/// Ask how many members, then each name. Blank and repeated names are asked again.
pub(crate) fn ask_roster(prompt: &mut dyn Prompt, output: &dyn Output) -> CliResult<Vec<String>> {
    let count = ask_parsed(prompt, output, "Number of members: ", logic::parse_member_count)?;

    let mut roster: Vec<String> = Vec::new();
    for position in 1..=count {
        let question = format!("Name of member {}: ", position);
        let name = ask_parsed(prompt, output, &question, |answer| {
            let name = answer.trim();
            validate_member_name(name)?;
            let lowered = name.to_lowercase();
            if roster.iter().any(|existing| existing.to_lowercase() == lowered) {
                return Err(FundError::DuplicateMemberName(name.to_string()).into());
            }
            Ok(name.to_string())
        })?;
        roster.push(name);
    }
    Ok(roster)
}

// ============================================================================
// LIST / STATUS / LOAD
// ============================================================================

/// Print every fund with its progress
pub fn view_funds(ctx: &CommandContext, output: &dyn Output) -> CliResult<()> {
    let summaries = ctx.registry.summaries()?;
    if summaries.is_empty() {
        return output.info(&format!(
            "No funds found in {}",
            ctx.registry.base_dir().display()
        ));
    }

    match ctx.format {
        OutputFormat::Table => output.print(render::summaries_table(&summaries).trim_end()),
        OutputFormat::Json => output.print_json(&render::summaries_value(&summaries)),
    }
}

/// Print round progress of one fund
pub fn show_status(name: &str, ctx: &CommandContext, output: &dyn Output) -> CliResult<()> {
    let engine = ctx.registry.open_fund(name)?;
    let value = render::status_value(engine.ledger());
    output.print(format_output(&value, ctx.format)?.trim_end())
}

/// Open a fund by name, or let the user pick one from the listing
pub fn load_fund(
    name: Option<String>,
    ctx: &CommandContext,
    prompt: &mut dyn Prompt,
    output: &dyn Output,
) -> CliResult<FundEngine<JsonFileStore>> {
    let name = match name {
        Some(name) => name,
        None => {
            let names = ctx.registry.list_funds()?;
            if names.is_empty() {
                return Err(CliError::NoFunds(
                    ctx.registry.base_dir().display().to_string(),
                ));
            }
            output.header("Funds")?;
            for (index, fund) in names.iter().enumerate() {
                output.print(&format!("  {}) {}", index + 1, fund))?;
            }
            ask_parsed(prompt, output, "Select a fund: ", |answer| {
                logic::parse_selection(answer, &names)
            })?
        }
    };

    let engine = ctx.registry.open_fund(&name)?;
    debug!(fund = %name, phase = %engine.phase(), "fund loaded");
    output.success(&format!("Loaded fund '{}'", name))?;
    Ok(engine)
}
