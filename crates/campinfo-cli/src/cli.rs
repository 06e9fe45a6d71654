//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use campinfo_model::DEFAULT_FOLDER_COLUMN;

#[derive(Parser)]
#[command(
    name = "campinfo",
    version,
    about = "Fill an XML template once per row of a campsite CSV export",
    long_about = "Fill an XML template once per row of a campsite CSV export.\n\n\
                  Each row becomes a numbered XML file (1.xml, 2.xml, ...) in\n\
                  xml_<template>_<data> below the output root. Image cells are\n\
                  turned into href attributes below the images root."
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
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert every CSV row into an XML document.
    Convert(ConvertArgs),

    /// Print the effective column rules.
    Rules(RulesArgs),
}

#[derive(Args)]
pub struct ConvertArgs {
    /// The XML file to be used as the template for the data.
    #[arg(short = 't', long = "template", value_name = "FILE")]
    pub template: PathBuf,

    /// The CSV file containing the data to be processed with the template.
    #[arg(short = 'd', long = "data", value_name = "FILE")]
    pub data: PathBuf,

    /// Root for all included images, as a file:/// URL or an absolute path.
    #[arg(short = 'i', long = "imagesroot", value_name = "URL")]
    pub images_root: String,

    /// Column holding a relative folder for row-specific pictures.
    #[arg(
        short = 'c',
        long = "foldercolumn",
        value_name = "COLUMN",
        default_value = DEFAULT_FOLDER_COLUMN
    )]
    pub folder_column: String,

    /// Directory in which the xml_<template>_<data> folder is created.
    #[arg(long = "output-root", value_name = "DIR", default_value = ".")]
    pub output_root: PathBuf,

    /// TOML file overriding the default column rules.
    #[arg(long = "rules", value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Fail when a column has no element in the template.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Convert every row but write no files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Do not rewrite the data file to add a UTF-8 byte order mark.
    #[arg(long = "no-bom-fix")]
    pub no_bom_fix: bool,
}

#[derive(Args)]
pub struct RulesArgs {
    /// TOML file overriding the default column rules.
    #[arg(long = "rules", value_name = "FILE")]
    pub rules: Option<PathBuf>,
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
