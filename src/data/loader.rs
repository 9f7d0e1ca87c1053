use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use calamine::{Data, Reader, open_workbook_auto};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Column, Dataset, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a pathway table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`              – header row, one column per descriptor or year
/// * `.xlsx` / `.xls`    – first worksheet, first row is the header
/// * `.json`             – `[{ "Model": "A", "2020": 10.0, ... }, ...]`
/// * `.parquet`          – flat columnar table
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "xlsx" | "xls" => load_workbook(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    Ok(Dataset::from_table(table))
}

/// Infer a cell value from raw text. Empty text is a missing cell.
pub fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Missing;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names; descriptor columns hold text,
/// year columns hold numbers. Cell types are inferred per cell.
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut columns: Vec<Column> = headers
        .iter()
        .map(|h| Column::new(h.clone(), Vec::new()))
        .collect();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (idx, col) in columns.iter_mut().enumerate() {
            col.cells
                .push(guess_cell_type(record.get(idx).unwrap_or("")));
        }
    }

    let mut table = Table::new();
    for col in columns {
        table.push_column(col);
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

/// Read the first worksheet of an Excel workbook; the first row is the
/// header. `calamine` auto-detects xls / xlsx / xlsb / ods.
fn load_workbook(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("workbook has no sheets")?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("reading sheet '{sheet_name}'"))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .context("workbook sheet is empty")?
        .iter()
        .map(|c| c.to_string().trim().to_string())
        .collect();

    let mut columns: Vec<Column> = headers
        .iter()
        .map(|h| Column::new(h.clone(), Vec::new()))
        .collect();

    for row in rows {
        for (idx, col) in columns.iter_mut().enumerate() {
            let cell = match row.get(idx) {
                Some(Data::String(s)) if s.is_empty() => CellValue::Missing,
                Some(Data::String(s)) => CellValue::String(s.clone()),
                Some(Data::Int(i)) => CellValue::Integer(*i),
                Some(Data::Float(f)) => CellValue::Float(*f),
                Some(Data::Bool(b)) => CellValue::String(b.to_string()),
                Some(Data::DateTime(dt)) => CellValue::Float(dt.as_f64()),
                Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => {
                    CellValue::String(s.clone())
                }
                Some(Data::Error(_)) | Some(Data::Empty) | None => CellValue::Missing,
            };
            col.cells.push(cell);
        }
    }

    let mut table = Table::new();
    for col in columns {
        table.push_column(col);
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Model": "A", "Scenario": "Low", "2020": 10.0, "2025": 20.0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    // Column order: first appearance across records.
    let mut headers: Vec<String> = Vec::new();
    for rec in records {
        if let Some(obj) = rec.as_object() {
            for key in obj.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }
    }

    let mut columns: Vec<Column> = headers
        .iter()
        .map(|h| Column::new(h.clone(), Vec::with_capacity(records.len())))
        .collect();

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for col in columns.iter_mut() {
            let cell = obj.get(&col.name).map_or(CellValue::Missing, json_to_cell);
            col.cells.push(cell);
        }
    }

    let mut table = Table::new();
    for col in columns {
        table.push_column(col);
    }
    Ok(table)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::String(b.to_string()),
        JsonValue::Null => CellValue::Missing,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet table (strings, ints, floats, bools per column).
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<Column> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        if columns.is_empty() {
            columns = schema
                .fields()
                .iter()
                .map(|f| Column::new(f.name().clone(), Vec::new()))
                .collect();
        }

        for (col_idx, col) in columns.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            for row in 0..batch.num_rows() {
                col.cells.push(cell_from_arrow(array, row));
            }
        }
    }

    let mut table = Table::new();
    for col in columns {
        table.push_column(col);
    }
    Ok(table)
}

/// Extract a single cell from an Arrow column at a given row.
fn cell_from_arrow(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Missing;
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                CellValue::String(s.value(row).to_string())
            } else {
                // LargeStringArray
                let s = col.as_string::<i64>();
                CellValue::String(s.value(row).to_string())
            }
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            CellValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            CellValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            CellValue::String(arr.value(row).to_string())
        }
        _ => CellValue::String(format!("{:?}", col.data_type())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_cell_types_from_text() {
        assert_eq!(guess_cell_type(""), CellValue::Missing);
        assert_eq!(guess_cell_type("42"), CellValue::Integer(42));
        assert_eq!(guess_cell_type("1.5"), CellValue::Float(1.5));
        assert_eq!(
            guess_cell_type("Baseline"),
            CellValue::String("Baseline".to_string())
        );
    }

    #[test]
    fn json_records_become_a_table() {
        let dir = std::env::temp_dir().join("pathway_explorer_loader_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("records.json");
        std::fs::write(
            &path,
            r#"[{"Model":"A","2020":10.0},{"Model":"B","2020":null}]"#,
        )
        .unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert!(ds.table.has_column("Model"));
        assert_eq!(ds.table.cell(1, "2020"), Some(&CellValue::Missing));
    }

    #[test]
    fn unknown_extension_is_an_error() {
        assert!(load_file(Path::new("data.pkl")).is_err());
    }
}
