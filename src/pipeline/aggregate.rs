use std::collections::BTreeMap;

use crate::data::model::CellValue;

use super::melt::{LongFrame, LongRow};

// ---------------------------------------------------------------------------
// Aggregate trend: per-year median across series
// ---------------------------------------------------------------------------

/// Statistical median: exact middle for odd counts, mean of the two middle
/// values for even counts. Empty input has no median.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Compute synthetic median-trend rows from a long frame.
///
/// Rows are grouped by year, and additionally by the value of `group_key`
/// when that column is present and the row's key cell is non-missing. Rows
/// with a missing key cell pool into a year-only group labelled
/// `"{sentinel} - ALL"`. Missing values are dropped before the median; a
/// group with no remaining values emits nothing.
///
/// Each emitted row carries the sentinel label in `discriminator`, the
/// group's key value in the group-key column, and missing cells elsewhere.
/// Only the synthetic rows are returned; the caller concatenates them with
/// the originals.
pub fn aggregate(
    frame: &LongFrame,
    group_key: Option<&str>,
    discriminator: &str,
    sentinel_label: &str,
) -> LongFrame {
    let key_idx = group_key.and_then(|k| frame.id_index(k));
    let disc_idx = frame.id_index(discriminator);

    let mut groups: BTreeMap<(i32, Option<CellValue>), Vec<f64>> = BTreeMap::new();
    for row in &frame.rows {
        let Some(value) = row.value else { continue };
        let key = key_idx
            .map(|i| row.ids[i].clone())
            .filter(|cell| !cell.is_missing());
        groups.entry((row.year, key)).or_default().push(value);
    }

    let mut rows = Vec::with_capacity(groups.len());
    for ((year, key), values) in groups {
        let Some(value) = median(&values) else {
            continue;
        };

        let mut ids = vec![CellValue::Missing; frame.id_columns.len()];
        let label = match &key {
            Some(cell) => {
                if let Some(i) = key_idx {
                    ids[i] = cell.clone();
                }
                sentinel_label.to_string()
            }
            // Year-only pool: either no grouping key was configured, or the
            // key cell was missing on the source rows.
            None if key_idx.is_some() => format!("{sentinel_label} - ALL"),
            None => sentinel_label.to_string(),
        };
        if let Some(i) = disc_idx {
            ids[i] = CellValue::String(label);
        }

        rows.push(LongRow {
            ids,
            year,
            value: Some(value),
        });
    }

    LongFrame {
        id_columns: frame.id_columns.clone(),
        rows,
    }
}
