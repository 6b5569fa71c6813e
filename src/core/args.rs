use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::kv::{ToValue, Value};

use crate::convert::Mode;

#[derive(Parser, Debug, PartialEq)]
#[command(version, about)]
pub struct CliArgs {
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Serve the upload form and the conversion endpoint.
    Serve,
    /// Convert a CSV file once and exit.
    Convert(ConvertArgs),
}

#[derive(Args, Debug, PartialEq)]
pub struct ConvertArgs {
    pub csv: PathBuf,
    pub output: PathBuf,
    /// Existing replication document to update.
    #[arg(long)]
    pub json: Option<PathBuf>,
    #[arg(long, default_value = "replace")]
    pub mode: Mode,
    /// Treat the first CSV row as data instead of a header.
    #[arg(long)]
    pub no_header: bool,
}

impl ToValue for CliArgs {
    fn to_value(&self) -> Value<'_> {
        Value::from_debug(self)
    }
}
