use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Column classification: identifiers vs. year-series columns
// ---------------------------------------------------------------------------

/// Partition of a table's column names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnClasses {
    /// Categorical / descriptor columns, in table order.
    pub identifiers: Vec<String>,
    /// Year-series columns, in table order (unsorted; see [`sorted_years`]).
    pub year_columns: Vec<String>,
    /// Columns removed before classification.
    pub excluded: Vec<String>,
}

/// A column is a year column iff its trimmed label is non-empty and entirely
/// decimal digits. Purely numeric identifier codes match too; the convention
/// is kept as found in the source files.
pub fn is_year_label(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}

/// Parse a year-column label to its integer value.
pub fn parse_year_label(name: &str) -> Option<i32> {
    name.trim().parse::<i32>().ok()
}

/// Deterministically partition column names. Names in `exclude` are removed
/// first; excluding a name that is not present is a no-op. Pure function.
pub fn classify(column_names: &[String], exclude: &BTreeSet<String>) -> ColumnClasses {
    let mut classes = ColumnClasses::default();
    for name in column_names {
        if exclude.contains(name) {
            classes.excluded.push(name.clone());
        } else if is_year_label(name) {
            classes.year_columns.push(name.clone());
        } else {
            classes.identifiers.push(name.clone());
        }
    }
    classes
}

/// Year columns sorted ascending by integer value, for deterministic
/// range slicing. Labels that fail to parse are dropped.
pub fn sorted_years(year_columns: &[String]) -> Vec<(i32, String)> {
    let mut years: Vec<(i32, String)> = year_columns
        .iter()
        .filter_map(|name| parse_year_label(name).map(|y| (y, name.clone())))
        .collect();
    years.sort_by_key(|(y, _)| *y);
    years
}
