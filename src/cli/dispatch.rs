// src/cli/dispatch.rs
//! Routes parsed commands to their handlers.

use super::args::Commands;
use super::handlers::{handle_check, handle_fix, handle_init};
use crate::exit::DocwrightExit;
use anyhow::Result;

/// Executes the parsed command.
///
/// # Errors
/// Returns error if the command handler fails.
pub fn execute(command: Commands) -> Result<DocwrightExit> {
    match command {
        Commands::Fix(args) => handle_fix(&args),
        Commands::Check {
            targets,
            config,
            json,
        } => handle_check(&targets, config.as_deref(), json),
        Commands::Init { path } => handle_init(&path),
    }
}
