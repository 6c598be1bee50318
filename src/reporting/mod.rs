// src/reporting/mod.rs
//! User-facing output: colored console reports or JSON documents.

pub mod console;

pub use console::{print_batch, print_check, print_file};

use anyhow::Result;

/// Prints any serializable value as pretty JSON on stdout.
///
/// # Errors
/// Returns error if serialization fails.
pub fn print_json<T: serde::Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{json}");
    Ok(())
}

pub(crate) fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
