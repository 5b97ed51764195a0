use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use secretforge::config::RngBackend;
use secretforge::Strategy;

use crate::logging::LogArgs;

#[derive(Debug, Parser)]
#[command(name = "secretforge", about = "Generate passwords and passphrases")]
pub struct Cli {
    /// Configuration file path (default: /etc/secretforge.toml)
    #[arg(long = "config", global = true)]
    pub config_file: Option<PathBuf>,

    /// Random source backend
    #[arg(long = "rng", value_enum, global = true)]
    pub rng: Option<RngBackend>,

    /// Write output to a file instead of stdout
    #[arg(short = 'o', long = "output-file", global = true)]
    pub output_file: Option<PathBuf>,

    #[command(flatten)]
    pub log: LogArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate passwords from character classes
    Password(PasswordArgs),
    /// Generate passphrases from words or syllables
    Passphrase(PassphraseArgs),
    /// Infer a password spec from a sample and report its strength
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
pub struct PasswordArgs {
    /// Length in characters
    #[arg(short = 'l', long)]
    pub length: Option<usize>,

    /// Comma-separated classes: lower, upper, digit, space, special
    #[arg(long, value_delimiter = ',')]
    pub classes: Option<Vec<String>>,

    /// Additional custom class (repeatable)
    #[arg(long)]
    pub custom: Vec<String>,

    /// Characters that must appear
    #[arg(short = 'i', long, default_value = "")]
    pub include: String,

    /// Characters that must not appear
    #[arg(short = 'e', long, default_value = "")]
    pub exclude: String,

    /// Use every pool character at most once
    #[arg(long)]
    pub no_repeat: bool,

    /// Number of passwords to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,

    /// Print entropy, keyspace and crack-time estimates
    #[arg(long)]
    pub stats: bool,
}

#[derive(Debug, Args)]
pub struct PassphraseArgs {
    /// Number of words
    #[arg(short = 'w', long)]
    pub words: Option<usize>,

    /// Word separator (a single character)
    #[arg(short = 's', long)]
    pub separator: Option<String>,

    /// Where words come from
    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,

    /// Word that must appear (repeatable)
    #[arg(short = 'i', long)]
    pub include: Vec<String>,

    /// Word that must not appear (repeatable)
    #[arg(short = 'e', long)]
    pub exclude: Vec<String>,

    /// Replace the built-in word list with a file
    #[arg(long)]
    pub word_list: Option<PathBuf>,

    /// Replace the built-in syllable list with a file
    #[arg(long)]
    pub syllable_list: Option<PathBuf>,

    /// Number of passphrases to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,

    /// Print entropy, keyspace and crack-time estimates
    #[arg(long)]
    pub stats: bool,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Example secret to derive a spec from
    pub sample: String,
}
