use crate::data::model::{CellValue, Table};

use super::PipelineError;
use super::columns::parse_year_label;

// ---------------------------------------------------------------------------
// Long-form rows: one row per (entity, year) pair
// ---------------------------------------------------------------------------

/// One long-format row: identifier cells (aligned with
/// [`LongFrame::id_columns`]), the year, and the coerced value.
/// A value that failed numeric coercion is `None`, never an error.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    pub ids: Vec<CellValue>,
    pub year: i32,
    pub value: Option<f64>,
}

/// A sequence of long rows plus the identifier column names they share.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongFrame {
    pub id_columns: Vec<String>,
    pub rows: Vec<LongRow>,
}

impl LongFrame {
    /// Index of an identifier column by name.
    pub fn id_index(&self, name: &str) -> Option<usize> {
        self.id_columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append another frame's rows (same identifier layout expected).
    pub fn extend(&mut self, other: LongFrame) {
        self.rows.extend(other.rows);
    }
}

// ---------------------------------------------------------------------------
// Melt: wide → long reshape
// ---------------------------------------------------------------------------

/// Reshape a wide table into long form: one output row per
/// (input row × year column), year-major.
///
/// Identifier cells are copied verbatim; Year is the integer parse of the
/// year-column label; Value is the numeric coercion of the cell (ints,
/// floats and numeric strings; anything else becomes missing).
///
/// Output length is exactly `rows × year_columns`.
pub fn melt(
    table: &Table,
    identifier_columns: &[String],
    year_columns: &[String],
) -> Result<LongFrame, PipelineError> {
    let id_cols: Vec<&crate::data::model::Column> = identifier_columns
        .iter()
        .map(|name| {
            table
                .column(name)
                .ok_or_else(|| PipelineError::MissingColumn(name.clone()))
        })
        .collect::<Result<_, _>>()?;

    let n_rows = table.n_rows();
    let mut rows = Vec::with_capacity(n_rows * year_columns.len());

    for year_name in year_columns {
        let Some(year) = parse_year_label(year_name) else {
            log::warn!("year column '{year_name}' does not parse as an integer; skipped");
            continue;
        };
        let year_col = table
            .column(year_name)
            .ok_or_else(|| PipelineError::MissingColumn(year_name.clone()))?;

        for row in 0..n_rows {
            rows.push(LongRow {
                ids: id_cols.iter().map(|c| c.cells[row].clone()).collect(),
                year,
                value: year_col.cells[row].coerce_f64(),
            });
        }
    }

    Ok(LongFrame {
        id_columns: identifier_columns.to_vec(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn sample() -> Table {
        Table::from_rows(
            &["Model", "Scenario", "2020", "2025"],
            vec![
                vec![s("A"), s("Low"), CellValue::Integer(10), s("20")],
                vec![s("A"), s("High"), CellValue::Float(15.0), s("bad")],
                vec![s("B"), s("Low"), CellValue::Missing, CellValue::Integer(35)],
            ],
        )
    }

    fn ids() -> Vec<String> {
        vec!["Model".to_string(), "Scenario".to_string()]
    }

    fn years() -> Vec<String> {
        vec!["2020".to_string(), "2025".to_string()]
    }

    #[test]
    fn melt_emits_rows_times_year_columns() {
        let frame = melt(&sample(), &ids(), &years()).unwrap();
        assert_eq!(frame.len(), 3 * 2);
    }

    #[test]
    fn values_are_coerced_and_bad_cells_become_missing() {
        let frame = melt(&sample(), &ids(), &years()).unwrap();
        // Year-major: 2020 rows first.
        assert_eq!(frame.rows[0].year, 2020);
        assert_eq!(frame.rows[0].value, Some(10.0));
        // Numeric string coerces.
        let a_low_2025 = frame
            .rows
            .iter()
            .find(|r| r.year == 2025 && r.ids[1] == s("Low") && r.ids[0] == s("A"))
            .unwrap();
        assert_eq!(a_low_2025.value, Some(20.0));
        // Malformed text degrades to missing, never an error.
        let a_high_2025 = frame
            .rows
            .iter()
            .find(|r| r.year == 2025 && r.ids[1] == s("High"))
            .unwrap();
        assert_eq!(a_high_2025.value, None);
    }

    #[test]
    fn identifier_cells_are_copied_verbatim() {
        let frame = melt(&sample(), &ids(), &years()).unwrap();
        assert!(frame.rows.iter().all(|r| r.ids.len() == 2));
        assert_eq!(frame.id_index("Scenario"), Some(1));
    }

    #[test]
    fn empty_table_melts_to_empty_frame() {
        let t = Table::from_rows(&["Model", "2020"], vec![]);
        let frame = melt(&t, &["Model".to_string()], &["2020".to_string()]).unwrap();
        assert!(frame.is_empty());
    }

    #[test]
    fn missing_identifier_column_errors() {
        let err = melt(&sample(), &["Region".to_string()], &years()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn(_)));
    }
}
