//! CLI argument definitions for the e-invoice field engine.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use einvoice_engine::NumericPolicy;
use einvoice_model::CountryCode;

#[derive(Parser)]
#[command(
    name = "einvoice",
    version,
    about = "E-invoice form engine - resolve country schemas into input fields",
    long_about = "Resolve a country's e-invoice schema into the ordered list of form fields,\n\
                  build the payload behind them, and present server validation errors."
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

    /// Include field values in trace logs (redacted by default).
    #[arg(long = "log-values", global = true)]
    pub log_values: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve a schema and list its input fields.
    Fields(FormArgs),

    /// Resolve a schema, apply edits, and print the payload.
    Payload(FormArgs),

    /// Render a server validation error file as display lines.
    Errors(ErrorsArgs),

    /// List countries with a schema in the schema directory.
    Countries(CountriesArgs),
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["schema", "country"])
))]
pub struct FormArgs {
    /// Schema document to resolve.
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Country whose schema is loaded from the schema directory.
    #[arg(long = "country", value_name = "CC")]
    pub country: Option<CountryCode>,

    /// Schema directory (default: $EINVOICE_SCHEMA_DIR, then the bundled schemas).
    #[arg(long = "schema-dir", value_name = "DIR")]
    pub schema_dir: Option<PathBuf>,

    /// Engine configuration file (JSON).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Deactivate an optional field. May be repeated.
    #[arg(long = "remove", value_name = "KEY")]
    pub remove: Vec<String>,

    /// Set a field from text input. May be repeated.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    /// How unparsable numeric input is handled (overrides the config file).
    #[arg(long = "numeric-policy", value_enum)]
    pub numeric_policy: Option<NumericPolicyArg>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct ErrorsArgs {
    /// JSON body returned by the save endpoint.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct CountriesArgs {
    /// Schema directory (default: $EINVOICE_SCHEMA_DIR, then the bundled schemas).
    #[arg(long = "schema-dir", value_name = "DIR")]
    pub schema_dir: Option<PathBuf>,
}

/// Parse a `KEY=VALUE` pair. The value may be empty or contain `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

/// CLI numeric policy choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum NumericPolicyArg {
    Reject,
    Zero,
    KeepRaw,
}

impl From<NumericPolicyArg> for NumericPolicy {
    fn from(value: NumericPolicyArg) -> Self {
        match value {
            NumericPolicyArg::Reject => Self::Reject,
            NumericPolicyArg::Zero => Self::Zero,
            NumericPolicyArg::KeepRaw => Self::KeepRaw,
        }
    }
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
