use crate::data::model::Table;

use super::PipelineError;
use super::columns::{classify, sorted_years};

// ---------------------------------------------------------------------------
// YearRange – a closed [start, end] interval of years
// ---------------------------------------------------------------------------

/// A closed year interval. `start <= end` is enforced by clamping at
/// construction: an inverted range collapses to `(start, start)` with a
/// warning, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    start: i32,
    end: i32,
    clamped: bool,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        if start > end {
            log::warn!("year range {start}..{end} is inverted; clamping end to {start}");
            return YearRange {
                start,
                end: start,
                clamped: true,
            };
        }
        YearRange {
            start,
            end,
            clamped: false,
        }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    /// Whether the range was inverted at construction and had to be clamped.
    /// Surfaced to the user as a warning.
    pub fn was_clamped(&self) -> bool {
        self.clamped
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

// ---------------------------------------------------------------------------
// Year-range projection
// ---------------------------------------------------------------------------

/// Restrict a wide table to `identifier_columns` (in the given order)
/// followed by the year columns inside `range`, ascending by year.
///
/// Identifier columns are structural: a missing one is a configuration bug
/// and fails with [`PipelineError::MissingColumn`]. (Filter columns, by
/// contrast, are incidental and silently ignored when absent.)
pub fn project_years(
    table: &Table,
    identifier_columns: &[String],
    range: YearRange,
) -> Result<Table, PipelineError> {
    let mut out = Table::new();

    for name in identifier_columns {
        let col = table
            .column(name)
            .ok_or_else(|| PipelineError::MissingColumn(name.clone()))?;
        out.push_column(col.clone());
    }

    let classes = classify(&table.column_names(), &Default::default());
    for (year, name) in sorted_years(&classes.year_columns) {
        if range.contains(year) {
            if let Some(col) = table.column(&name) {
                out.push_column(col.clone());
            }
        }
    }

    Ok(out)
}
