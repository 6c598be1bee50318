use clap::Parser;
use colored::Colorize;
use docwright_core::cli::{self, Cli};
use docwright_core::exit::DocwrightExit;

fn main() -> DocwrightExit {
    let cli = Cli::parse();

    match cli::dispatch::execute(cli.command) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            DocwrightExit::Error
        }
    }
}
