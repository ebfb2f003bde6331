use super::node::Scalar;
use serde_json::Value;
use std::fmt;

/// One table cell. `Absent` means the row's element does not carry the
/// column's parameter, which is different from a present zero or null.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Absent,
    Value(Scalar),
}

impl Cell {
    #[must_use]
    pub fn is_zero_like(&self) -> bool {
        match self {
            Cell::Absent => true,
            Cell::Value(s) => s.is_zero_like(),
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Absent => Value::Null,
            Cell::Value(s) => s.to_json(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Absent => Ok(()),
            Cell::Value(s) => s.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    /// All cells absent, empty or zero.
    #[must_use]
    pub fn is_uninformative(&self) -> bool {
        self.cells.iter().all(Cell::is_zero_like)
    }
}

/// Column-major table with one row per source element.
///
/// Every column holds exactly `row_count` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    #[must_use]
    pub fn new(row_count: usize) -> Self {
        Self {
            columns: Vec::new(),
            row_count,
        }
    }

    /// Appends a column, padding or truncating it to `row_count` with
    /// absent cells.
    pub fn push_column(&mut self, name: impl Into<String>, mut cells: Vec<Cell>) {
        cells.resize(self.row_count, Cell::Absent);
        self.columns.push(Column {
            name: name.into(),
            cells,
        });
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count == 0 || self.columns.is_empty()
    }

    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.columns.get(column).and_then(|c| c.cells.get(row))
    }

    /// Cells of one row, in column order.
    #[must_use]
    pub fn row(&self, row: usize) -> Vec<&Cell> {
        self.columns.iter().filter_map(|c| c.cells.get(row)).collect()
    }

    /// Rebuilds the table with the columns in the given order.
    pub(crate) fn with_columns(row_count: usize, columns: Vec<Column>) -> Self {
        Self { columns, row_count }
    }

    pub(crate) fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn push_column_pads_with_absent() {
        let mut table = Table::new(3);
        table.push_column("Höhe", vec![Cell::Value(Scalar::Float(2.5))]);

        assert_eq!(
            table.column("Höhe").unwrap().cells,
            vec![Cell::Value(Scalar::Float(2.5)), Cell::Absent, Cell::Absent]
        );
    }

    #[test]
    fn row_collects_cells_across_columns() {
        let mut table = Table::new(2);
        table.push_column("A", vec![Cell::Value(Scalar::Int(1)), Cell::Absent]);
        table.push_column(
            "B",
            vec![Cell::Absent, Cell::Value(Scalar::Text("x".into()))],
        );

        assert_eq!(
            table.row(1),
            vec![&Cell::Absent, &Cell::Value(Scalar::Text("x".into()))]
        );
        assert_eq!(table.column_names(), vec!["A", "B"]);
    }

    #[test]
    fn absent_cell_is_zero_like_but_distinct_from_zero() {
        assert!(Cell::Absent.is_zero_like());
        assert!(Cell::Value(Scalar::Int(0)).is_zero_like());
        assert_ne!(Cell::Absent, Cell::Value(Scalar::Int(0)));
    }
}
