use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};

use crate::pipeline::melt::LongFrame;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// An 8-bit RGB color handed to whatever renderer draws the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Rgb {
                r: (rgb.red * 255.0) as u8,
                g: (rgb.green * 255.0) as u8,
                b: (rgb.blue * 255.0) as u8,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Chart series: long rows grouped by the discriminator column
// ---------------------------------------------------------------------------

/// One plotted line: `points` are (year, value) pairs sorted by year.
/// `emphasis` marks the sentinel (median) series for heavier rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub color: Rgb,
    pub emphasis: bool,
    pub points: Vec<[f64; 2]>,
}

/// The chart renderer boundary: group by discriminator, plot value vs. year
/// as connected points per group. Purely presentational; implementations
/// live outside the core.
pub trait ChartRenderer {
    fn render(&mut self, series: &[ChartSeries]) -> anyhow::Result<()>;
}

/// Group chart rows by the discriminator column into renderable series.
///
/// Series are named by the discriminator cell's display form (rows with a
/// missing discriminator group under `"(none)"`) and ordered by name.
/// Series whose name carries `sentinel` (the "Median" / "Median - ALL"
/// labels) are flagged for emphasis.
pub fn build_series(frame: &LongFrame, discriminator: &str, sentinel: &str) -> Vec<ChartSeries> {
    let disc_idx = frame.id_index(discriminator);

    let mut grouped: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for row in &frame.rows {
        let Some(value) = row.value else { continue };
        let name = disc_idx
            .map(|i| &row.ids[i])
            .filter(|cell| !cell.is_missing())
            .map(|cell| cell.to_string())
            .unwrap_or_else(|| "(none)".to_string());
        grouped
            .entry(name)
            .or_default()
            .push([f64::from(row.year), value]);
    }

    let palette = generate_palette(grouped.len());
    grouped
        .into_iter()
        .zip(palette)
        .map(|((name, mut points), color)| {
            points.sort_by(|a, b| a[0].total_cmp(&b[0]));
            let emphasis = name.starts_with(sentinel);
            ChartSeries {
                name,
                color,
                emphasis,
                points,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use crate::pipeline::melt::LongRow;
    use crate::pipeline::run::SENTINEL_MEDIAN;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn frame() -> LongFrame {
        LongFrame {
            id_columns: vec!["Scenario".to_string()],
            rows: vec![
                LongRow { ids: vec![s("Low")], year: 2025, value: Some(20.0) },
                LongRow { ids: vec![s("Low")], year: 2020, value: Some(10.0) },
                LongRow { ids: vec![s("Median")], year: 2020, value: Some(10.0) },
                LongRow { ids: vec![s("Low")], year: 2030, value: None },
            ],
        }
    }

    #[test]
    fn palette_yields_distinct_colors() {
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        assert_ne!(colors[0], colors[2]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn series_are_grouped_sorted_and_sentinel_emphasised() {
        let series = build_series(&frame(), "Scenario", SENTINEL_MEDIAN);
        assert_eq!(series.len(), 2);

        let low = series.iter().find(|s| s.name == "Low").unwrap();
        assert!(!low.emphasis);
        // Missing value dropped; points sorted by year.
        assert_eq!(low.points, vec![[2020.0, 10.0], [2025.0, 20.0]]);

        let median = series.iter().find(|s| s.name == "Median").unwrap();
        assert!(median.emphasis);
    }
}
