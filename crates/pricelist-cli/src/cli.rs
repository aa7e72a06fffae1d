//! CLI argument definitions for the price-list importer.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use pricelist_core::DuplicateStrategy;
use pricelist_cli::settings::{parse_assignment, parse_column_assignment, parse_delimiter};
use pricelist_model::{CanonicalField, ColumnSelector};

#[derive(Parser)]
#[command(
    name = "pricelist",
    version,
    about = "Import supplier price lists into a product catalog",
    long_about = "Import supplier price lists into a product catalog.\n\n\
                  Reads plain CSV exports and row-typed (H/F/P) order guides,\n\
                  maps their columns onto catalog fields, validates every row\n\
                  and writes new and changed products to a JSON catalog."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include cell values in trace-level logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Mapping template store.
    #[arg(
        long = "templates",
        value_name = "PATH",
        default_value = "templates.json",
        global = true
    )]
    pub templates: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import a price list into the catalog.
    Import(ImportArgs),

    /// Show the detected format and ranked column suggestions for a file.
    Suggest(SourceArgs),

    /// Manage saved mapping templates.
    #[command(subcommand)]
    Templates(TemplatesCommand),
}

/// How to read and map a file.
#[derive(Args)]
pub struct SourceArgs {
    /// Price list to read (CSV or other delimited text).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// JSON file with import options.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Minimum score (0-100) for a column to be suggested.
    #[arg(long = "threshold", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub threshold: Option<u8>,

    /// Field delimiter (a character, or tab/comma/semicolon/pipe). Sniffed when omitted.
    #[arg(long = "delimiter", value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Text encoding label (utf-8, windows-1252, utf-16le...). Detected when omitted.
    #[arg(long = "encoding", value_name = "LABEL")]
    pub encoding: Option<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Catalog file to update.
    #[arg(long = "catalog", value_name = "PATH", default_value = "catalog.json")]
    pub catalog: PathBuf,

    /// Apply a saved mapping template.
    #[arg(long = "template", value_name = "NAME")]
    pub template: Option<String>,

    /// Save the final mapping under this name.
    #[arg(long = "save-template", value_name = "NAME")]
    pub save_template: Option<String>,

    /// Map a field to a column by header (sku=SUPC) or 0-based index (sku=#2).
    ///
    /// Bare digits name a header first and fall back to that position when no
    /// header matches.
    #[arg(long = "map", value_name = "FIELD=COLUMN", value_parser = parse_column_assignment)]
    pub map: Vec<(CanonicalField, ColumnSelector)>,

    /// Value for a field the file lacks or leaves blank (e.g. category=Produce).
    #[arg(long = "default", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub defaults: Vec<(CanonicalField, String)>,

    /// Column that supplies the unit price.
    #[arg(long = "price-column", value_name = "COLUMN")]
    pub price_column: Option<ColumnSelector>,

    /// What to do with products already in the catalog.
    #[arg(long = "strategy", default_value = "update-all")]
    pub strategy: DuplicateStrategy,

    /// Validate and report without writing the catalog.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print every row's outcome, not only the problem rows.
    #[arg(long = "all-rows")]
    pub all_rows: bool,
}

#[derive(Subcommand)]
pub enum TemplatesCommand {
    /// List saved template names.
    List,

    /// Print a saved template as JSON.
    Show {
        #[arg(value_name = "NAME")]
        name: String,
    },
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
