mod commands;
mod error_presentation;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use dbfixture_core::{DEFAULT_MIN_COLUMN_WIDTH, DatabaseOperation, Query};
use dbfixture_formats::Format;
use tracing_subscriber::EnvFilter;

use crate::error_presentation::render_runtime_error;

#[derive(Debug, Parser)]
#[command(
    name = "dbfixture",
    version,
    about = "Load, export, show, and check database fixtures"
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug); RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Snapshot tables and query results of a SQLite database into a data set file.
    Export(ExportArgs),
    /// Apply a data set file to a SQLite database.
    Load(LoadArgs),
    /// Print a data set file as fixed-width tables.
    Show(ShowArgs),
    /// Run a YAML fixture case file against a SQLite database.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct DatabaseArgs {
    /// Path of the SQLite database file.
    database: String,

    /// Enforce (`on`) or ignore (`off`) foreign keys on every connection.
    #[arg(long, value_name = "on|off")]
    foreign_keys: Option<String>,
}

#[derive(Debug, Args)]
struct ExportArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Table to export; repeatable. Without tables or queries, every table is exported.
    #[arg(long = "table", value_name = "NAME")]
    tables: Vec<String>,

    /// Query whose rows become table NAME; repeatable.
    #[arg(long = "query", value_name = "NAME=SQL", value_parser = parse_query)]
    queries: Vec<Query>,

    /// Output file (flat XML) or directory (CSV).
    #[arg(short, long)]
    output: PathBuf,

    /// Output format; defaults to flat-xml for `.xml` paths and csv otherwise.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
}

#[derive(Debug, Args)]
struct LoadArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Data set file or CSV directory.
    input: PathBuf,

    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    #[arg(long, value_enum, default_value_t = OperationArg::CleanInsert)]
    operation: OperationArg,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Data set file or CSV directory.
    input: PathBuf,

    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    #[arg(long, default_value_t = DEFAULT_MIN_COLUMN_WIDTH)]
    min_width: usize,
}

#[derive(Debug, Args)]
struct CheckArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// YAML file of named fixture cases.
    cases: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Csv,
    FlatXml,
    Xml,
    Xlsx,
}

impl From<FormatArg> for Format {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => Self::Csv,
            FormatArg::FlatXml => Self::FlatXml,
            FormatArg::Xml => Self::Xml,
            FormatArg::Xlsx => Self::Spreadsheet,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OperationArg {
    CleanInsert,
    Insert,
    DeleteAll,
}

impl From<OperationArg> for DatabaseOperation {
    fn from(value: OperationArg) -> Self {
        match value {
            OperationArg::CleanInsert => Self::CleanInsert,
            OperationArg::Insert => Self::Insert,
            OperationArg::DeleteAll => Self::DeleteAll,
        }
    }
}

fn parse_query(raw: &str) -> Result<Query, String> {
    let Some((name, sql)) = raw.split_once('=') else {
        return Err(format!("expected NAME=SQL, got `{raw}`"));
    };
    let name = name.trim();
    let sql = sql.trim();
    if name.is_empty() || sql.is_empty() {
        return Err(format!(
            "expected NAME=SQL with both parts non-empty, got `{raw}`"
        ));
    }
    Ok(Query::new(name, sql))
}

fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match cli.command {
        Command::Export(args) => commands::export(args),
        Command::Load(args) => commands::load(args),
        Command::Show(args) => commands::show(args),
        Command::Check(args) => commands::check(args),
    };

    if let Err(error) = outcome {
        let code = error.exit_code();
        eprintln!("{}", render_runtime_error(error));
        std::process::exit(code);
    }
}
