use std::collections::BTreeSet;

use tracing::debug;

use crate::{AssertionError, Table, column::fold_name};

/// Compares two tables that were already projected and normalized the same way.
///
/// The structural check (column set and row count) runs first and stops the
/// comparison on failure. Cells are then compared row by row in `expected`'s
/// column order; the first mismatch is reported together with the number of
/// further mismatching cells.
pub fn assert_equal(expected: &Table, actual: &Table) -> Result<(), AssertionError> {
    if !same_structure(expected, actual) {
        return Err(AssertionError::StructureMismatch {
            table: expected.name().to_string(),
            expected_columns: expected.metadata().column_names(),
            actual_columns: actual.metadata().column_names(),
            expected_rows: expected.row_count(),
            actual_rows: actual.row_count(),
        });
    }

    let actual_indexes: Vec<usize> = expected
        .columns()
        .iter()
        .filter_map(|column| actual.metadata().column_index(&column.name))
        .collect();

    let mut first_mismatch = None;
    let mut additional = 0;
    for (row, (expected_row, actual_row)) in expected.rows().zip(actual.rows()).enumerate() {
        for (column, expected_value) in expected_row.iter().enumerate() {
            let actual_value = &actual_row[actual_indexes[column]];
            if expected_value.matches(actual_value) {
                continue;
            }

            if first_mismatch.is_some() {
                additional += 1;
            } else {
                first_mismatch = Some((row, column, expected_value, actual_value));
            }
        }
    }

    let Some((row, column, expected_value, actual_value)) = first_mismatch else {
        debug!(
            table = expected.name(),
            rows = expected.row_count(),
            "tables are equal"
        );
        return Ok(());
    };

    Err(AssertionError::CellMismatch {
        table: expected.name().to_string(),
        row,
        column: expected.columns()[column].name.clone(),
        expected: expected_value.clone(),
        actual: actual_value.clone(),
        additional,
    })
}

fn same_structure(expected: &Table, actual: &Table) -> bool {
    expected.row_count() == actual.row_count()
        && folded_column_set(expected) == folded_column_set(actual)
}

fn folded_column_set(table: &Table) -> BTreeSet<String> {
    table
        .columns()
        .iter()
        .map(|column| fold_name(&column.name))
        .collect()
}
