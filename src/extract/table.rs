use super::category::Category;
use super::element::ElementRecord;
use super::parameters::require_parameter_container;
use crate::error::ExplorerError;
use crate::model::{Cell, Table};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Builds one row per element, in element order, with one column per
/// parameter name seen (first-seen order).
///
/// With `parameters` given, only those names become columns. A row lacking
/// a column's parameter gets [`Cell::Absent`]. An element without a
/// parameter container fails the whole table.
pub fn materialize(
    category: &Category<'_>,
    parameters: Option<&[String]>,
) -> Result<Table, ExplorerError> {
    let filter: Option<BTreeSet<String>> = parameters.map(|p| p.iter().cloned().collect());
    let row_count = category.len();

    let mut names: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut columns: Vec<Vec<Cell>> = Vec::new();

    for (row, node) in category.elements.iter().enumerate() {
        let record = ElementRecord::new(node)?;
        require_parameter_container(category, node)?;
        let set = record
            .parameters(filter.as_ref())
            .map_err(|e| ExplorerError::UnsupportedElementShape {
                category: category.name.to_string(),
                element: record.label(),
                reason: e.to_string(),
            })?;

        for (name, value) in set {
            let col = match index.get(&name) {
                Some(&col) => col,
                None => {
                    index.insert(name.clone(), names.len());
                    names.push(name);
                    columns.push(vec![Cell::Absent; row_count]);
                    columns.len() - 1
                }
            };
            columns[col][row] = Cell::Value(value);
        }
    }

    let mut table = Table::new(row_count);
    for (name, cells) in names.into_iter().zip(columns) {
        table.push_column(name, cells);
    }

    debug!(
        category = category.name,
        rows = table.row_count(),
        columns = table.column_count(),
        "materialized table"
    );
    Ok(table)
}
