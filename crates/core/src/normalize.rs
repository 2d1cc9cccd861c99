use std::cmp::Ordering;

use tracing::debug;

use crate::{DataSetError, Table, Value};

/// Stably sorts rows by the tuple of values at `sort_columns`, left to right.
///
/// An empty key list returns an unchanged copy, which means the caller
/// accepts native order. Expected and actual tables must be sorted with the
/// same key before they are compared.
pub fn sort_by<S>(source: &Table, sort_columns: &[S]) -> Result<Table, DataSetError>
where
    S: AsRef<str>,
{
    let metadata = source.metadata();
    let keys = sort_columns
        .iter()
        .map(|name| metadata.require_column(name.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = source.raw_rows().to_vec();
    if !keys.is_empty() {
        rows.sort_by(|left, right| compare_keys(&keys, left, right));
    }

    debug!(
        table = metadata.name(),
        keys = keys.len(),
        rows = rows.len(),
        "normalized table row order"
    );
    Ok(source.derive(metadata.clone(), rows))
}

fn compare_keys(keys: &[usize], left: &[Value], right: &[Value]) -> Ordering {
    keys.iter()
        .map(|&index| left[index].compare(&right[index]))
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}
