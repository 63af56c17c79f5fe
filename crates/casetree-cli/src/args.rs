use crate::types::{LogLevel, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "casetree")]
#[command(about = "Explore case hierarchies as an expandable table", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    /// Explorer settings (TOML). Defaults apply when omitted or missing.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Normalize a fetch payload and print the case tree")]
    Show {
        /// JSON payload file, or `-` for stdin
        payload: PathBuf,

        /// Logical fields to show instead of the configured columns
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Start with every row collapsed
        #[arg(long)]
        collapsed: bool,
    },

    #[command(about = "List the fields columns can be bound to")]
    Catalog,

    #[command(about = "Edit the column configuration, then print the rebuilt tree")]
    Configure {
        /// JSON payload file, or `-` for stdin
        payload: PathBuf,

        /// Append a column bound to FIELD, optionally labelled
        #[arg(long, value_name = "FIELD[=LABEL]")]
        add: Vec<String>,

        /// Remove a column by its current 1-based id
        #[arg(long, value_name = "ID")]
        remove: Vec<u32>,

        #[arg(long, value_name = "ID=LABEL")]
        rename: Vec<FieldAssignment>,

        #[arg(long, value_name = "ID=FIELD")]
        set_field: Vec<FieldAssignment>,

        /// Keep collapsed rows collapsed across the rebuild
        #[arg(long)]
        preserve_expansion: bool,
    },
}

/// `ID=VALUE` pair targeting one draft column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAssignment {
    pub id: u32,
    pub value: String,
}

impl FromStr for FieldAssignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected ID=VALUE, got '{}'", s))?;
        let id = id
            .trim()
            .parse()
            .map_err(|_| format!("invalid column id '{}'", id))?;
        Ok(Self {
            id,
            value: value.to_string(),
        })
    }
}
