use crate::model::{Column, Table};

/// Identity column kept in front of everything else.
pub const NAME_COLUMN: &str = "Name";

/// Reorders columns so data-bearing ones come first.
///
/// Output order is `Name` (if present), then columns with at least one
/// non-zero value, then columns that are entirely absent, empty or zero.
/// Relative order inside each group is preserved and no cell changes.
#[must_use]
pub fn clean(table: Table) -> Table {
    let row_count = table.row_count();
    let mut name: Option<Column> = None;
    let mut informative = Vec::new();
    let mut uninformative = Vec::new();

    for column in table.into_columns() {
        if column.name == NAME_COLUMN && name.is_none() {
            name = Some(column);
        } else if column.is_uninformative() {
            uninformative.push(column);
        } else {
            informative.push(column);
        }
    }

    let columns = name
        .into_iter()
        .chain(informative)
        .chain(uninformative)
        .collect();
    Table::with_columns(row_count, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, Scalar};
    use pretty_assertions::assert_eq;

    fn int(i: i64) -> Cell {
        Cell::Value(Scalar::Int(i))
    }

    fn text(s: &str) -> Cell {
        Cell::Value(Scalar::Text(s.to_string()))
    }

    fn sample() -> Table {
        let mut table = Table::new(3);
        table.push_column("X", vec![int(0), int(0), int(0)]);
        table.push_column("Y", vec![int(1), int(0), int(0)]);
        table.push_column("Z", vec![Cell::Value(Scalar::Null), text(""), int(0)]);
        table
    }

    #[test]
    fn informative_columns_move_ahead() {
        assert_eq!(clean(sample()).column_names(), vec!["Y", "X", "Z"]);
    }

    #[test]
    fn name_is_pinned_first_even_when_empty() {
        let mut table = sample();
        table.push_column("Name", vec![Cell::Absent, Cell::Absent, Cell::Absent]);

        let cleaned = clean(table);

        assert_eq!(cleaned.column_names(), vec!["Name", "Y", "X", "Z"]);
    }

    #[test]
    fn cleaning_twice_changes_nothing() {
        let mut table = sample();
        table.push_column("Name", vec![text("a"), text("b"), text("c")]);
        table.push_column("W", vec![Cell::Absent, int(4), Cell::Absent]);

        let once = clean(table);
        let twice = clean(once.clone());

        assert_eq!(once, twice);
    }

    #[test]
    fn cells_travel_with_their_column() {
        let table = sample();
        let cleaned = clean(table.clone());

        assert_eq!(cleaned.row_count(), table.row_count());
        for column in table.columns() {
            assert_eq!(cleaned.column(&column.name), Some(column));
        }
    }

    #[test]
    fn absent_only_column_is_uninformative() {
        let mut table = Table::new(2);
        table.push_column("Leer", vec![Cell::Absent, Cell::Absent]);
        table.push_column("Bool", vec![Cell::Value(Scalar::Bool(true)), int(0)]);

        assert_eq!(clean(table).column_names(), vec!["Bool", "Leer"]);
    }
}
