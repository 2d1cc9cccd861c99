use std::{io, path::PathBuf};

use miette::Report;

pub(crate) type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug)]
pub(crate) enum CliError {
    UndetectedFormat {
        path: PathBuf,
    },
    ReadFile {
        path: PathBuf,
        source: io::Error,
    },
    FailedCases {
        failed: usize,
        total: usize,
    },
    Core {
        context: &'static str,
        source: dbfixture_core::Error,
    },
}

impl CliError {
    pub(crate) fn core(context: &'static str) -> impl FnOnce(dbfixture_core::Error) -> Self {
        move |source| Self::Core { context, source }
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::UndetectedFormat { .. } => 2,
            _ => 1,
        }
    }
}

pub(crate) fn render_runtime_error(error: CliError) -> String {
    match error {
        CliError::UndetectedFormat { path } => format!(
            "[usage] cannot detect the data set format of `{}`; pass --format",
            path.display()
        ),
        CliError::ReadFile { path, source } => {
            let context = format!("while reading fixture cases `{}`", path.display());
            let report = report_with_context(source, context);
            format!("[io] {report}")
        }
        CliError::FailedCases { failed, total } => {
            format!("[assertion] {failed} of {total} fixture cases failed")
        }
        CliError::Core { context, source } => {
            let category = core_category(&source);
            let report = report_with_context(source, context);
            format!("[{category}] {report}")
        }
    }
}

/// Typed errors already embed their sources in their messages, so only the
/// top-level message is carried under the context.
fn report_with_context<E, C>(source: E, context: C) -> Report
where
    E: std::error::Error,
    C: Into<String>,
{
    let anyhow_error = anyhow::Error::msg(source.to_string()).context(context.into());
    miette::miette!("{anyhow_error:#}")
}

fn core_category(error: &dbfixture_core::Error) -> &'static str {
    match error {
        dbfixture_core::Error::DataSet(_) | dbfixture_core::Error::Cursor(_) => "data",
        dbfixture_core::Error::Assertion(_) => "assertion",
        dbfixture_core::Error::Connection(_) => "connection",
        dbfixture_core::Error::Format(dbfixture_core::FormatError::Io { .. }) => "io",
        dbfixture_core::Error::Format(_) => "format",
    }
}
