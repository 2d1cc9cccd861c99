use std::collections::BTreeMap;

use dbfixture_core::{ConnectionProvider, FormatError, Loader, Result};
use serde::Deserialize;
use serde_yaml::Value as YamlValue;
use tracing::{debug, info};

use crate::yaml_data_set::{FORMAT, load_data_set_from_value, parse_yaml_error};

const FIXTURE_CASE_SOURCE_LABEL: &str = "yaml fixture case";

/// One named case of a fixture file:
///
/// ```yaml
/// inserts_users:
///   setup:
///     users: { columns: [id, name], rows: [[1, Alice]] }
///   expected:
///     users: { columns: [name], rows: [[Alice]] }
///   sort_by: [name]
/// ```
///
/// `setup` is clean-inserted, then every `expected` table is asserted against
/// the database table of the same name, or against the rows of `query` when
/// one is given. `error`, when present, expects the run to fail with exactly
/// that message.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureCase {
    pub setup: YamlValue,
    pub expected: YamlValue,
    pub query: Option<String>,
    pub sort_by: Vec<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    Passed,
    Failed(String),
}

impl TestResult {
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

pub fn load_fixture_cases_from_str(yaml: &str) -> Result<BTreeMap<String, FixtureCase>> {
    serde_yaml::from_str(yaml).map_err(|source| parse_yaml_error(FIXTURE_CASE_SOURCE_LABEL, source))
}

pub fn run_fixture_case(provider: &dyn ConnectionProvider, case: &FixtureCase) -> TestResult {
    match evaluate_expected_error(case, run_fixture_case_flow(provider, case)) {
        Ok(()) => TestResult::Passed,
        Err(error) => TestResult::Failed(error.to_string()),
    }
}

/// Runs every case in name order.
pub fn run_fixture_cases(
    provider: &dyn ConnectionProvider,
    cases: &BTreeMap<String, FixtureCase>,
) -> Vec<(String, TestResult)> {
    cases
        .iter()
        .map(|(name, case)| {
            let result = run_fixture_case(provider, case);
            info!(case = %name, passed = result.is_passed(), "ran fixture case");
            (name.clone(), result)
        })
        .collect()
}

fn run_fixture_case_flow(provider: &dyn ConnectionProvider, case: &FixtureCase) -> Result<()> {
    let setup = load_data_set_from_value(&case.setup)?;
    let expected = load_data_set_from_value(&case.expected)?;
    if case.query.is_some() && expected.len() != 1 {
        return Err(runner_assertion_error(format!(
            "`query` needs exactly one expected table, found {}",
            expected.len()
        )));
    }

    let loader = Loader::for_db(provider);
    loader.clean_insert(&setup)?;

    for table in &expected {
        debug!(table = table.name(), "asserting expected table");
        match case.query.as_deref() {
            Some(sql) => loader.assert_query_table(table, sql, &case.sort_by)?,
            None => loader.assert_table(table, &case.sort_by)?,
        };
    }
    Ok(())
}

fn evaluate_expected_error(case: &FixtureCase, execution_result: Result<()>) -> Result<()> {
    let Some(expected_error) = case.error.as_deref() else {
        return execution_result;
    };

    match execution_result {
        Ok(()) => Err(runner_assertion_error(format!(
            "expected error: {expected_error}, but got no error"
        ))),
        Err(actual_error) => {
            let actual_error = actual_error.to_string();
            if actual_error == expected_error {
                Ok(())
            } else {
                Err(runner_assertion_error(format!(
                    "expected error: {expected_error}, but got: {actual_error}"
                )))
            }
        }
    }
}

fn runner_assertion_error(message: impl Into<String>) -> dbfixture_core::Error {
    FormatError::malformed(FORMAT, FIXTURE_CASE_SOURCE_LABEL, message).into()
}
