//! cimi-utils cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; cimi-utils ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Copy one field from the source document into the target document
    ///
    /// Prints the resulting target document
    CopyField(CopyFieldCommand),

    /// Copy all top level attributes not named in the exclusion set
    ///
    /// Prints the resulting target document
    CopyExtra(CopyExtraCommand),

    /// Check a document for attributes not accounted for by the exclusion set
    ///
    /// Prints `true` or `false` and exits with 1 when extra attributes were found
    HasExtra(HasExtraCommand),

    /// Remove attributes with the given names at any depth
    #[command(alias = "strip-field")]
    Strip(StripCommand),

    /// Pick the response content type for an Accept header
    Negotiate(NegotiateCommand),

    /// Normalize a backend lifecycle state
    State(StateCommand),

    /// Show the response for an API error kind
    Error(ErrorCommand),

    /// Forward a request to a backend resource and report whether it exists
    Probe(ProbeCommand),
}

#[derive(Parser, Debug)]
pub struct CopyFieldCommand {
    #[clap(flatten)]
    pub output: OutputArgs,

    /// Document to write into
    pub target: PathBuf,

    /// Document to read from
    pub source: PathBuf,

    /// Where to write in the target, e.g. /server/name
    pub target_path: String,

    /// What to read from the source, e.g. /meta/name
    pub source_path: String,
}

#[derive(Parser, Debug)]
pub struct CopyExtraCommand {
    #[clap(flatten)]
    pub output: OutputArgs,

    /// Document to write into
    pub target: PathBuf,

    /// Document to read from
    pub source: PathBuf,

    /// Exclusion set document
    #[clap(short = 'x', long = "exclude")]
    pub exclude: PathBuf,
}

#[derive(Parser, Debug)]
pub struct HasExtraCommand {
    /// Document to check
    pub source: PathBuf,

    /// Exclusion set document
    #[clap(short = 'x', long = "exclude")]
    pub exclude: PathBuf,
}

#[derive(Parser, Debug)]
pub struct StripCommand {
    #[clap(flatten)]
    pub output: OutputArgs,

    /// Document to strip
    pub document: PathBuf,

    /// Attribute names to remove
    #[arg(required = true)]
    pub members: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct NegotiateCommand {
    /// Accept header value, e.g. "application/xml;q=0.9, */*;q=0.1"
    pub accept: String,
}

#[derive(Parser, Debug)]
pub struct StateCommand {
    pub kind: StateKind,

    /// State as reported by the backend
    pub state: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StateKind {
    Machine,
    Volume,
    Image,
}

impl From<StateKind> for cimi_utils::state::ResourceKind {
    fn from(value: StateKind) -> Self {
        match value {
            StateKind::Machine => Self::Machine,
            StateKind::Volume => Self::Volume,
            StateKind::Image => Self::Image,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ErrorCommand {
    /// Error kind, e.g. NotFound
    pub kind: cimi_utils::error_table::ErrorKind,
}

#[derive(Parser, Debug)]
pub struct ProbeCommand {
    #[clap(flatten)]
    pub output: OutputArgs,

    /// Backend host
    #[clap(long = "host")]
    pub host: String,

    /// Backend port
    #[clap(long = "port")]
    pub port: u16,

    #[clap(long = "scheme", default_value = "http")]
    pub scheme: String,

    /// Path of the inbound request
    #[clap(long = "path", default_value = "/")]
    pub path: String,

    /// Request method [default: GET]
    #[clap(short = 'X', long = "method")]
    pub method: Option<String>,

    /// Inbound request header, "name: value"
    ///
    /// Can be specified multiple times.
    #[clap(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Query string to append, without the leading '?'
    #[clap(long = "query")]
    pub query: Option<String>,

    /// Request body
    #[clap(long = "body")]
    pub body: Option<String>,

    /// Read the response body of successful requests
    #[clap(long = "fetch-body")]
    pub fetch_body: bool,
}

fn parse_header(header: &str) -> Result<(String, String), String> {
    let (name, value) = header
        .split_once(':')
        .ok_or_else(|| format!("expected \"name: value\", got {header:?}"))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}
