//! CLI argument definitions for `dbf-dump`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dbf-dump",
    version,
    about = "Dump XBase (DBF) tables as text",
    long_about = "Print the records of one or more DBF files.\n\n\
                  Records are written one per line with fields joined by a separator,\n\
                  or as a table with --table. Deleted records are not printed."
)]
pub struct Cli {
    /// DBF files to dump.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Output record separator (\n, \r and \t are unescaped).
    #[arg(short = 'r', long = "rs", value_name = "SEP", default_value = "\\n")]
    pub record_separator: String,

    /// Output field separator (\n, \r and \t are unescaped).
    #[arg(short = 'f', long = "fs", value_name = "SEP", default_value = ":")]
    pub field_separator: String,

    /// Comma-separated list of fields to print (default: all).
    #[arg(short = 'F', long = "fields", value_name = "LIST")]
    pub fields: Option<String>,

    /// Text to print for null values.
    #[arg(short = 'u', long = "undef", value_name = "TEXT", default_value = "")]
    pub undef: String,

    /// Print a table instead of separated lines.
    #[arg(short = 't', long = "table")]
    pub table: bool,

    /// Decode character fields with this encoding (default: raw bytes).
    #[arg(short = 'e', long = "encoding", value_name = "NAME")]
    pub encoding: Option<String>,

    /// Write output to a file instead of stdout.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
