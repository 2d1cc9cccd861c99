use std::{fs, path::Path};

use dbfixture_core::{
    ConnectionConfig, DataSet, DatabaseOperation, Exporter, Loader, RenderOptions,
    render_data_set,
};
use dbfixture_formats::Format;
use dbfixture_sqlite::{FOREIGN_KEYS_KEY, SqliteProvider};
use dbfixture_testkit::{TestResult, load_fixture_cases_from_str, run_fixture_cases};
use tracing::info;

use crate::{
    CheckArgs, DatabaseArgs, ExportArgs, FormatArg, LoadArgs, ShowArgs,
    error_presentation::{CliError, CliResult},
};

const EXPORT_CONTEXT: &str = "while exporting data set";
const LOAD_CONTEXT: &str = "while loading data set";
const SHOW_CONTEXT: &str = "while showing data set";
const CHECK_CONTEXT: &str = "while checking fixture cases";

pub(crate) fn export(args: ExportArgs) -> CliResult<()> {
    let provider = provider(&args.database);
    let exporter = Exporter::for_db(&provider);
    let exported = if args.tables.is_empty() && args.queries.is_empty() {
        exporter.all()
    } else {
        let names: Vec<&str> = args.tables.iter().map(String::as_str).collect();
        exporter.select(&args.queries, &names)
    };
    let data_set = exported.map_err(CliError::core(EXPORT_CONTEXT))?;

    let format = args
        .format
        .map(Format::from)
        .unwrap_or_else(|| export_format_for(&args.output));
    dbfixture_formats::write(format, &data_set, &args.output)
        .map_err(CliError::core(EXPORT_CONTEXT))?;

    println!(
        "exported {} tables to {} ({format})",
        data_set.len(),
        args.output.display()
    );
    Ok(())
}

pub(crate) fn load(args: LoadArgs) -> CliResult<()> {
    let data_set = read_data_set(&args.input, args.format, LOAD_CONTEXT)?;
    let operation = DatabaseOperation::from(args.operation);
    let provider = provider(&args.database);
    Loader::for_db(&provider)
        .execute(operation, &data_set)
        .map_err(CliError::core(LOAD_CONTEXT))?;

    println!(
        "applied {operation} with {} tables to {}",
        data_set.len(),
        provider.database()
    );
    Ok(())
}

pub(crate) fn show(args: ShowArgs) -> CliResult<()> {
    let data_set = read_data_set(&args.input, args.format, SHOW_CONTEXT)?;
    let options = RenderOptions {
        min_column_width: args.min_width,
        ..RenderOptions::default()
    };
    print!("{}", render_data_set(&data_set, &options));
    Ok(())
}

pub(crate) fn check(args: CheckArgs) -> CliResult<()> {
    let yaml = fs::read_to_string(&args.cases).map_err(|source| CliError::ReadFile {
        path: args.cases.clone(),
        source,
    })?;
    let cases = load_fixture_cases_from_str(&yaml).map_err(CliError::core(CHECK_CONTEXT))?;
    let provider = provider(&args.database);

    let results = run_fixture_cases(&provider, &cases);
    let mut failed = 0;
    for (name, result) in &results {
        match result {
            TestResult::Passed => println!("ok   {name}"),
            TestResult::Failed(message) => {
                failed += 1;
                println!("FAIL {name}: {message}");
            }
        }
    }

    info!(total = results.len(), failed, "checked fixture cases");
    if failed > 0 {
        return Err(CliError::FailedCases {
            failed,
            total: results.len(),
        });
    }
    Ok(())
}

fn provider(args: &DatabaseArgs) -> SqliteProvider {
    let mut config = ConnectionConfig::new(args.database.as_str());
    if let Some(switch) = args.foreign_keys.as_deref() {
        config = config.with_extra(FOREIGN_KEYS_KEY, switch);
    }
    SqliteProvider::new(&config)
}

fn read_data_set(
    input: &Path,
    format: Option<FormatArg>,
    context: &'static str,
) -> CliResult<DataSet> {
    let format = match format {
        Some(format) => Format::from(format),
        None => Format::from_path(input).ok_or_else(|| CliError::UndetectedFormat {
            path: input.to_path_buf(),
        })?,
    };
    dbfixture_formats::load(format, input).map_err(CliError::core(context))
}

fn export_format_for(output: &Path) -> Format {
    match Format::from_path(output) {
        Some(Format::FlatXml) => Format::FlatXml,
        _ => Format::Csv,
    }
}
