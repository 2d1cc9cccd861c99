mod yaml_data_set;
mod yaml_runner;

pub use yaml_data_set::{load_data_set_from_str, load_data_set_from_value};
pub use yaml_runner::{
    FixtureCase, TestResult, load_fixture_cases_from_str, run_fixture_case, run_fixture_cases,
};
