//! Interactive session for one loaded fund
//!
//! Architecture: Functional Core, Imperative Shell (FCIS)
//!
//! - **Pure Logic**: menu parsing and rendering live in `logic::menu` and `logic::render`
//! - **Imperative Shell**: this loop; it reads lines, calls the engine and prints results
//!
//! Once the fund reaches its completed phase the completion menu replaces
//! the fund menu until the user restarts, edits, ends or leaves the fund.

use rand::RngCore;
use serde_json::json;
use tracing::debug;

use crate::argument_parsing::format_output;
use crate::commands::fund::{ask_roster, ask_terms};
use crate::error::{CliError, CliResult};
use crate::logic::menu::{completion_menu_text, fund_menu_text, fund_prompt};
use crate::logic::{parse_completion_choice, parse_fund_command, render};
use crate::logic::{CompletionChoice, FundMenuCommand, OutputFormat};
use crate::output::Output;
use crate::prompt::{ask_text, Prompt};
use lib_chitfund::{CompletionAction, FundEngine, FundPhase, FundStore, LifecycleOutcome};

/// How a fund session finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExit {
    /// The user left the fund (or input closed); the fund is unchanged
    Exited,
    /// The fund was ended from the completion menu
    FundEnded,
}

/// Run the fund menu until the user leaves or ends the fund
pub fn run_fund_session<S: FundStore>(
    engine: &mut FundEngine<S>,
    prompt: &mut dyn Prompt,
    output: &dyn Output,
    rng: &mut dyn RngCore,
    format: OutputFormat,
) -> CliResult<SessionExit> {
    let name = engine.fund().name.clone();
    output.print(&fund_menu_text(&name))?;

    loop {
        if engine.phase() == FundPhase::Completed {
            match run_completion_menu(engine, prompt, output)? {
                Some(LifecycleOutcome::Ended) => return Ok(SessionExit::FundEnded),
                Some(LifecycleOutcome::Restarted) => {
                    output.print(&fund_menu_text(&name))?;
                    continue;
                }
                None => return Ok(SessionExit::Exited),
            }
        }

        let line = match prompt.read_line(&fund_prompt(&name))? {
            Some(line) => line,
            None => return Ok(SessionExit::Exited),
        };

        let command = parse_fund_command(&line);
        debug!(fund = %name, ?command, "fund menu command");
        match command {
            FundMenuCommand::Exit => return Ok(SessionExit::Exited),
            FundMenuCommand::Empty => {}
            FundMenuCommand::Help => output.print(&fund_menu_text(&name))?,
            FundMenuCommand::Unknown => {
                output.error(&format!("Unknown command: {}", line.trim()))?;
                output.print("Type 'help' for available commands")?;
            }
            other => match dispatch_command(engine, other, prompt, output, rng, format) {
                Ok(()) => {}
                Err(CliError::InputClosed) => return Ok(SessionExit::Exited),
                Err(e) => report_error(output, &e)?,
            },
        }
    }
}

/// Completion conditions are shown as warnings; the completion menu follows
fn report_error(output: &dyn Output, error: &CliError) -> CliResult<()> {
    if error.is_fund_completion() {
        output.warning(&error.to_string())
    } else {
        output.error(&error.to_string())
    }
}

fn dispatch_command<S: FundStore>(
    engine: &mut FundEngine<S>,
    command: FundMenuCommand,
    prompt: &mut dyn Prompt,
    output: &dyn Output,
    rng: &mut dyn RngCore,
    format: OutputFormat,
) -> CliResult<()> {
    match command {
        FundMenuCommand::AddMember(name) => {
            let name = match name {
                Some(name) => name,
                None => ask_text(prompt, output, "Member name: ")?,
            };
            let member = engine.add_member(&name)?;
            output.success(&format!(
                "Enrolled {} as member #{} ({} round(s) in total)",
                member.name,
                member.id,
                engine.fund().total_rounds
            ))
        }
        FundMenuCommand::Collect(name) => {
            let name = match name {
                Some(name) => name,
                None => {
                    let pending: Vec<&str> = engine
                        .pending_contributors()
                        .into_iter()
                        .map(|m| m.name.as_str())
                        .collect();
                    if !pending.is_empty() {
                        output.info(&format!("Pending: {}", pending.join(", ")))?;
                    }
                    ask_text(prompt, output, "Member name: ")?
                }
            };
            let receipt = engine.collect_contribution(&name)?;
            output.success(&format!(
                "Recorded {} from {} for round {}",
                receipt.transaction.amount, receipt.member.name, receipt.transaction.round
            ))?;
            if receipt.round_complete {
                output.info(&format!(
                    "All members have contributed for round {}. Ready for payout.",
                    receipt.transaction.round
                ))
            } else {
                output.info(&format!("{} contribution(s) still pending", receipt.pending))
            }
        }
        FundMenuCommand::Payout => {
            let receipt = engine.payout_money(rng)?;
            output.success(&format!(
                "Round {} payout: {} receives {}",
                receipt.round, receipt.winner.name, receipt.pool
            ))?;
            if receipt.fund_completed {
                output.info("Every round has been paid out.")?;
            }
            Ok(())
        }
        FundMenuCommand::Status => {
            let value = render::status_value(engine.ledger());
            output.print(format_output(&value, format)?.trim_end())
        }
        FundMenuCommand::Members => match format {
            OutputFormat::Table => output.print(render::members_table(engine.ledger()).trim_end()),
            OutputFormat::Json => output.print_json(&json!(engine.members())),
        },
        FundMenuCommand::History => match format {
            OutputFormat::Table => output.print(render::history_table(engine.ledger()).trim_end()),
            OutputFormat::Json => output.print_json(&json!(engine.transactions())),
        },
        FundMenuCommand::Help
        | FundMenuCommand::Exit
        | FundMenuCommand::Empty
        | FundMenuCommand::Unknown => Ok(()),
    }
}

/// Offer restart, edit or end. `None` means the user left without acting.
fn run_completion_menu<S: FundStore>(
    engine: &mut FundEngine<S>,
    prompt: &mut dyn Prompt,
    output: &dyn Output,
) -> CliResult<Option<LifecycleOutcome>> {
    let name = engine.fund().name.clone();
    output.header(&format!("{} completed", name))?;
    output.print(&completion_menu_text())?;

    loop {
        let line = match prompt.read_line("completion> ")? {
            Some(line) => line,
            None => return Ok(None),
        };

        let action = match parse_completion_choice(&line) {
            CompletionChoice::Restart => CompletionAction::RestartPreservingMembers,
            CompletionChoice::EditAndRestart => {
                output.info("Enter the new terms and members")?;
                let edited = ask_terms(prompt, output)
                    .and_then(|terms| ask_roster(prompt, output).map(|roster| (terms, roster)));
                match edited {
                    Ok((terms, roster)) => CompletionAction::EditAndRestart { terms, roster },
                    Err(CliError::InputClosed) => return Ok(None),
                    Err(e) => return Err(e),
                }
            }
            CompletionChoice::EndFund => CompletionAction::EndFund,
            CompletionChoice::Back => return Ok(None),
            CompletionChoice::Unknown => {
                output.error(&format!("Unknown choice '{}'. Choose 1-4.", line.trim()))?;
                continue;
            }
        };

        match engine.apply(action) {
            Ok(LifecycleOutcome::Restarted) => {
                output.success(&format!(
                    "Fund '{}' restarted: {} member(s), {} round(s)",
                    name,
                    engine.members().len(),
                    engine.fund().total_rounds
                ))?;
                return Ok(Some(LifecycleOutcome::Restarted));
            }
            Ok(LifecycleOutcome::Ended) => {
                output.success(&format!("Fund '{}' ended. Records are kept on disk.", name))?;
                return Ok(Some(LifecycleOutcome::Ended));
            }
            Err(e) => output.error(&e.to_string())?,
        }
    }
}
