use tracing::debug;

use crate::{Column, DataSetError, Table, TableMetadata};

/// Restricts `source` to `reference_columns`, in the reference order.
///
/// Row count and row order are preserved. Column definitions come from
/// `source`, so the actual side keeps its own type tags.
pub fn project(source: &Table, reference_columns: &[Column]) -> Result<Table, DataSetError> {
    let names: Vec<&str> = reference_columns
        .iter()
        .map(|column| column.name.as_str())
        .collect();
    project_names(source, &names)
}

pub fn project_names<S>(source: &Table, column_names: &[S]) -> Result<Table, DataSetError>
where
    S: AsRef<str>,
{
    let metadata = source.metadata();
    let indexes = column_names
        .iter()
        .map(|name| metadata.require_column(name.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let columns = indexes
        .iter()
        .map(|&index| metadata.columns()[index].clone())
        .collect();
    let projected_metadata = TableMetadata::new(metadata.name(), columns)?;

    let rows = source
        .raw_rows()
        .iter()
        .map(|row| indexes.iter().map(|&index| row[index].clone()).collect())
        .collect();

    debug!(
        table = metadata.name(),
        from = metadata.columns().len(),
        to = indexes.len(),
        "projected table columns"
    );
    Ok(source.derive(projected_metadata, rows))
}
