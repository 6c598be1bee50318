pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod exit;
pub mod generate;
pub mod heuristics;
pub mod lang;
pub mod logging;
pub mod model;
pub mod parser;
pub mod processor;
pub mod reporting;
pub mod rewrite;
pub mod tokens;
