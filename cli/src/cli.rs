//! CLI argument definitions for lexis.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Translate messages against self-healing catalogues.
#[derive(Parser, Debug, Clone)]
#[command(name = "lexis")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Translate a message into Spanish:\n",
    "    $ lexis translate app \"Hello {name}\" -l es -p name=Ana\n\n",
    "  Register a message for every supported language:\n",
    "    $ lexis register billing Invoice\n\n",
    "  Show a catalogue:\n",
    "    $ lexis show billing -l fa\n\n",
    "  Print the layout conventions for Persian:\n",
    "    $ lexis table layouts -l fa",
))]
pub struct Cli {
    /// Configuration file [default: ./lexis.toml when present].
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Override the configured system root.
    #[arg(short, long, value_name = "DIR", global = true)]
    pub root: Option<Utf8PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Translate and format a message.
    Translate(TranslateArgs),

    /// Register a message in every language's catalogue.
    Register(RegisterArgs),

    /// List supported languages.
    Languages,

    /// Print a category's catalogue.
    Show(ShowArgs),

    /// Print a per-language lookup table.
    Table(TableArgs),
}

/// Arguments for the translate command.
#[derive(Args, Debug, Clone)]
pub struct TranslateArgs {
    /// Message category.
    pub category: String,

    /// Message in the source language.
    pub message: String,

    /// Target language [default: LEXIS_LANGUAGE, then configuration].
    #[arg(short, long, value_name = "LANG")]
    pub language: Option<String>,

    /// Message parameter (can be repeated).
    #[arg(short, long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,
}

/// Arguments for the register command.
#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    /// Message category.
    pub category: String,

    /// Message to register.
    pub message: String,
}

/// Arguments for the show command.
#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Message category.
    pub category: String,

    /// Catalogue language [default: LEXIS_LANGUAGE, then configuration].
    #[arg(short, long, value_name = "LANG")]
    pub language: Option<String>,
}

/// Lookup tables shipped beside the language list.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Layout conventions such as text direction.
    Layouts,
    /// Date and calendar conventions.
    Dates,
}

/// Arguments for the table command.
#[derive(Args, Debug, Clone)]
pub struct TableArgs {
    /// Table to read.
    #[arg(value_enum)]
    pub table: TableKind,

    /// Language whose entry to print [default: list the covered languages].
    #[arg(short, long, value_name = "LANG")]
    pub language: Option<String>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
