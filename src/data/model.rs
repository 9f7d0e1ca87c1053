use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a table column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes found in pathway files.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Missing,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Missing => 0,
                Integer(_) => 1,
                Float(_) => 2,
                String(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Missing, Missing) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Missing => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            // Debug formatting keeps the decimal point ("10.0", not "10"),
            // so floats survive the CSV round-trip as floats.
            CellValue::Float(v) => write!(f, "{v:?}"),
            CellValue::Missing => Ok(()),
        }
    }
}

impl CellValue {
    /// Coerce the value to `f64` for charting and aggregation.
    /// Numeric strings count; anything else is missing.
    pub fn coerce_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse::<f64>().ok(),
            CellValue::Missing => None,
        }
    }

    /// Lower-cased string form used for case-insensitive filter matching.
    /// Missing cells have no key and never match a constraint.
    pub fn filter_key(&self) -> Option<String> {
        match self {
            CellValue::Missing => None,
            other => Some(other.to_string().to_lowercase()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

// ---------------------------------------------------------------------------
// Column – one named column of a table
// ---------------------------------------------------------------------------

/// A named column: every cell shares the row index with its siblings.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            cells,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – an ordered collection of equal-length columns
// ---------------------------------------------------------------------------

/// A wide table: ordered named columns, positionally correlated rows.
/// Every pipeline stage consumes one table and produces a fresh one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    /// Build a table from a header row and cell rows (tests and loaders).
    /// Short rows are padded with missing cells.
    pub fn from_rows(headers: &[&str], rows: Vec<Vec<CellValue>>) -> Self {
        let mut columns: Vec<Column> = headers
            .iter()
            .map(|h| Column::new(*h, Vec::with_capacity(rows.len())))
            .collect();
        for row in rows {
            for (i, col) in columns.iter_mut().enumerate() {
                col.cells
                    .push(row.get(i).cloned().unwrap_or(CellValue::Missing));
            }
        }
        Table { columns }
    }

    /// Append a column. The caller keeps all columns the same length.
    pub fn push_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Cell at (row, column name).
    pub fn cell(&self, row: usize, name: &str) -> Option<&CellValue> {
        self.column(name).and_then(|c| c.cells.get(row))
    }

    /// New table keeping only the given row indices, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                Column::new(
                    c.name.clone(),
                    indices.iter().map(|&i| c.cells[i].clone()).collect(),
                )
            })
            .collect();
        Table { columns }
    }

    /// New table without the named columns. Unknown names are a no-op.
    pub fn drop_columns(&self, names: &BTreeSet<String>) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .filter(|c| !names.contains(&c.name))
                .cloned()
                .collect(),
        }
    }

    /// Contiguous row slice `[start, end)`, clamped to the row count.
    pub fn slice_rows(&self, start: usize, end: usize) -> Table {
        let n = self.n_rows();
        let start = start.min(n);
        let end = end.clamp(start, n);
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.cells[start..end].to_vec()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – a loaded table with pre-computed picklist options
// ---------------------------------------------------------------------------

/// A loaded table plus, for each column, the sorted set of unique values
/// (feeds the categorical picklists).
#[derive(Debug, Clone)]
pub struct Dataset {
    pub table: Table,
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl Dataset {
    /// Build the unique-value index from a loaded table.
    pub fn from_table(table: Table) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = BTreeMap::new();
        for col in table.columns() {
            let entry = unique_values.entry(col.name.clone()).or_default();
            for cell in &col.cells {
                entry.insert(cell.clone());
            }
        }
        Dataset {
            table,
            unique_values,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.table.n_rows()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
