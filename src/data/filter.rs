use std::collections::{BTreeMap, BTreeSet};

use super::model::Table;

// ---------------------------------------------------------------------------
// FilterSpec: which values are permitted per categorical column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of permitted values,
/// stored lower-cased. A column absent from the map, or mapped to an empty
/// set, imposes no constraint. Built fresh per user interaction.
pub type FilterSpec = BTreeMap<String, BTreeSet<String>>;

/// Build a [`FilterSpec`] entry set from user-facing value labels.
pub fn allowed_values<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().to_lowercase())
        .collect()
}

/// Apply categorical constraints to a table.
///
/// A row passes a column constraint when:
/// * the constraint set is empty → passes (no restriction)
/// * the column does not exist in the table → passes (constraint ignored;
///   dataset configs are applied defensively across heterogeneous files)
/// * the cell's lower-cased string form is in the permitted set → passes
///
/// Missing cells never match a constrained column. Constraints combine with
/// logical AND. Row order and every column of the input are preserved.
pub fn apply_filter(table: &Table, spec: &FilterSpec) -> Table {
    let active: Vec<(&str, &BTreeSet<String>)> = spec
        .iter()
        .filter(|(col, allowed)| !allowed.is_empty() && table.has_column(col))
        .map(|(col, allowed)| (col.as_str(), allowed))
        .collect();

    if active.is_empty() {
        return table.clone();
    }

    let keep: Vec<usize> = (0..table.n_rows())
        .filter(|&row| {
            active.iter().all(|&(col, allowed)| {
                table
                    .cell(row, col)
                    .and_then(|cell| cell.filter_key())
                    .is_some_and(|key| allowed.contains(&key))
            })
        })
        .collect();

    table.select_rows(&keep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn sample() -> Table {
        Table::from_rows(
            &["Model", "Scenario", "2020"],
            vec![
                vec![s("A"), s("Low"), CellValue::Integer(10)],
                vec![s("A"), s("High"), CellValue::Integer(15)],
                vec![s("B"), s("Low"), CellValue::Integer(20)],
                vec![s("B"), CellValue::Missing, CellValue::Integer(25)],
            ],
        )
    }

    #[test]
    fn filters_are_case_insensitive_and_anded() {
        let t = sample();
        let mut spec = FilterSpec::new();
        spec.insert("Scenario".into(), allowed_values(["LOW"]));
        spec.insert("Model".into(), allowed_values(["b"]));
        let out = apply_filter(&t, &spec);
        assert_eq!(out.n_rows(), 1);
        assert_eq!(out.cell(0, "Model"), Some(&s("B")));
    }

    #[test]
    fn empty_set_and_unknown_column_impose_no_constraint() {
        let t = sample();
        let mut spec = FilterSpec::new();
        spec.insert("Scenario".into(), BTreeSet::new());
        spec.insert("NoSuchColumn".into(), allowed_values(["x"]));
        let out = apply_filter(&t, &spec);
        assert_eq!(out.n_rows(), t.n_rows());
        assert_eq!(out.column_names(), t.column_names());
    }

    #[test]
    fn missing_cells_never_match_a_constrained_column() {
        let t = sample();
        let mut spec = FilterSpec::new();
        spec.insert("Scenario".into(), allowed_values(["low", "high"]));
        let out = apply_filter(&t, &spec);
        // Row with a missing Scenario is excluded.
        assert_eq!(out.n_rows(), 3);
    }

    #[test]
    fn filtering_is_idempotent() {
        let t = sample();
        let mut spec = FilterSpec::new();
        spec.insert("Scenario".into(), allowed_values(["Low"]));
        let once = apply_filter(&t, &spec);
        let twice = apply_filter(&once, &spec);
        assert_eq!(once, twice);
    }

    #[test]
    fn row_order_is_preserved() {
        let t = sample();
        let mut spec = FilterSpec::new();
        spec.insert("Scenario".into(), allowed_values(["Low"]));
        let out = apply_filter(&t, &spec);
        assert_eq!(out.cell(0, "Model"), Some(&s("A")));
        assert_eq!(out.cell(1, "Model"), Some(&s("B")));
    }
}
