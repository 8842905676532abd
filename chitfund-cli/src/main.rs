//! Chit fund command-line interface
//!
//! Entry point for the chitfund binary. Parses command-line arguments
//! and delegates to the appropriate command handler.

use chitfund_cli::run_cli;

fn main() -> anyhow::Result<()> {
    run_cli()
}
