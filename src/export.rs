use anyhow::{Context, Result};

use crate::data::loader::guess_cell_type;
use crate::data::model::{Column, Table};

// ---------------------------------------------------------------------------
// Spreadsheet export boundary
// ---------------------------------------------------------------------------

/// Encode any table into downloadable bytes. Implementations must be
/// lossless for {string, integer, float, missing}: decoding the bytes
/// reproduces the same columns, order and values.
pub trait TableEncoder {
    /// File extension of the produced format (without the dot).
    fn extension(&self) -> &'static str;

    fn encode(&self, table: &Table) -> Result<Vec<u8>>;
}

/// CSV encoder: header row, one record per table row, missing cells as
/// empty fields.
#[derive(Debug, Default)]
pub struct CsvEncoder;

impl TableEncoder for CsvEncoder {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn encode(&self, table: &Table) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record(table.column_names())
            .context("writing CSV header")?;

        for row in 0..table.n_rows() {
            let record: Vec<String> = table
                .columns()
                .iter()
                .map(|c| c.cells[row].to_string())
                .collect();
            writer.write_record(&record).context("writing CSV row")?;
        }

        writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("flushing CSV output: {e}"))
    }
}

/// Decode CSV bytes back into a table. Inverse of [`CsvEncoder::encode`];
/// used by the round-trip contract tests and the headless CLI.
pub fn decode_csv(bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::Reader::from_reader(bytes);
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
