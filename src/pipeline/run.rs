use crate::config::DatasetConfig;
use crate::data::filter::{FilterSpec, apply_filter};
use crate::data::model::Table;

use super::PipelineError;
use super::aggregate::aggregate;
use super::columns::{classify, sorted_years};
use super::melt::{LongFrame, melt};
use super::years::{YearRange, project_years};

// ---------------------------------------------------------------------------
// Pipeline orchestrator
// ---------------------------------------------------------------------------

/// Label marking synthetic median rows so the chart can style them apart.
pub const SENTINEL_MEDIAN: &str = "Median";

/// Rows per page when paginating filtered results.
pub const PAGE_SIZE: usize = 1000;

/// Rows shown in the data preview.
pub const PREVIEW_ROWS: usize = 5;

/// Everything one pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// First rows of the filtered wide table, for the preview pane.
    pub preview: Table,
    /// The filtered wide table handed to the spreadsheet encoder.
    pub export_table: Table,
    /// Long-form rows (originals + median trend) handed to the chart,
    /// after the zero/missing display filter.
    pub chart_rows: LongFrame,
}

/// Run the full filter → project → melt → aggregate pipeline for one
/// dataset. Re-runs from the full loaded table on every invocation; output
/// is a pure function of `(config, filter_spec, year_range, table)`.
pub fn run_pipeline(
    config: &DatasetConfig,
    table: &Table,
    filter_spec: &FilterSpec,
    year_range: Option<YearRange>,
) -> Result<PipelineOutput, PipelineError> {
    // Excluded columns are dropped before anything else sees the table.
    let working = table.drop_columns(&config.exclude_columns);
    let classes = classify(&working.column_names(), &config.exclude_columns);

    let filtered = apply_filter(&working, filter_spec);

    let export_table = match year_range {
        Some(range) if config.year_filter_enabled => {
            project_years(&filtered, &config.identifier_columns, range)?
        }
        _ => filtered,
    };

    // Melt the export table's year columns, ascending.
    let export_classes = classify(&export_table.column_names(), &Default::default());
    let year_names: Vec<String> = sorted_years(&export_classes.year_columns)
        .into_iter()
        .map(|(_, name)| name)
        .collect();
    let mut chart_rows = melt(&export_table, &config.identifier_columns, &year_names)?;

    let discriminator = config
        .discriminator()
        .unwrap_or_else(|| classes.identifiers.first().map(|s| s.as_str()).unwrap_or(""));
    let trend = aggregate(
        &chart_rows,
        config.secondary_group_key.as_deref(),
        discriminator,
        SENTINEL_MEDIAN,
    );
    chart_rows.extend(trend);

    // Display policy: zero is treated as "absent" for these datasets, so
    // zero and missing values are dropped before charting.
    chart_rows
        .rows
        .retain(|row| matches!(row.value, Some(v) if v != 0.0));

    let preview = export_table.slice_rows(0, PREVIEW_ROWS);

    Ok(PipelineOutput {
        preview,
        export_table,
        chart_rows,
    })
}

/// One-based page slice of a table for the paginated results view.
pub fn paginate(table: &Table, page_number: usize, page_size: usize) -> Table {
    let page = page_number.max(1);
    let start = (page - 1) * page_size;
    table.slice_rows(start, start + page_size)
}

/// Number of pages a table occupies at the given page size.
pub fn page_count(table: &Table, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    (table.n_rows().max(1)).div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Registry;
    use crate::data::filter::allowed_values;
    use crate::data::model::CellValue;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn config() -> DatasetConfig {
        let mut cfg = Registry::builtin().get("pathways").unwrap().clone();
        cfg.identifier_columns = vec!["Model".to_string(), "Scenario".to_string()];
        cfg.secondary_group_key = None;
        cfg.discriminator_column = Some("Scenario".to_string());
        cfg
    }

    fn sample() -> Table {
        Table::from_rows(
            &["Model", "Scenario", "2020", "2025", "2030"],
            vec![
                vec![
                    s("A"),
                    s("Low"),
                    CellValue::Integer(10),
                    CellValue::Integer(20),
                    CellValue::Integer(30),
                ],
                vec![
                    s("A"),
                    s("High"),
                    CellValue::Integer(15),
                    CellValue::Integer(25),
                    CellValue::Integer(35),
                ],
            ],
        )
    }

    #[test]
    fn end_to_end_scenario_from_the_contract() {
        let cfg = config();
        let mut spec = FilterSpec::new();
        spec.insert("Scenario".into(), allowed_values(["Low"]));

        let out = run_pipeline(
            &cfg,
            &sample(),
            &spec,
            Some(YearRange::new(2020, 2025)),
        )
        .unwrap();

        assert_eq!(
            out.export_table.column_names(),
            vec!["Model", "Scenario", "2020", "2025"]
        );
        assert_eq!(out.export_table.n_rows(), 1);
        assert_eq!(out.export_table.cell(0, "2020"), Some(&CellValue::Integer(10)));

        // Originals plus one median row per year.
        assert_eq!(out.chart_rows.len(), 4);
        let medians: Vec<_> = out
            .chart_rows
            .rows
            .iter()
            .filter(|r| r.ids[1] == s("Median"))
            .collect();
        assert_eq!(medians.len(), 2);
        assert!(medians.iter().any(|r| r.year == 2020 && r.value == Some(10.0)));
        assert!(medians.iter().any(|r| r.year == 2025 && r.value == Some(20.0)));
    }

    #[test]
    fn year_filter_disabled_keeps_all_year_columns() {
        let mut cfg = config();
        cfg.year_filter_enabled = false;
        let out = run_pipeline(
            &cfg,
            &sample(),
            &FilterSpec::new(),
            Some(YearRange::new(2020, 2025)),
        )
        .unwrap();
        assert!(out.export_table.has_column("2030"));
    }

    #[test]
    fn zero_and_missing_values_are_dropped_from_chart_rows() {
        let cfg = config();
        let t = Table::from_rows(
            &["Model", "Scenario", "2020"],
            vec![
                vec![s("A"), s("Low"), CellValue::Integer(0)],
                vec![s("A"), s("High"), CellValue::Missing],
                vec![s("B"), s("Low"), CellValue::Integer(4)],
            ],
        );
        let out = run_pipeline(&cfg, &t, &FilterSpec::new(), None).unwrap();
        // One surviving original row plus its median.
        assert_eq!(out.chart_rows.len(), 2);
        assert!(out.chart_rows.rows.iter().all(|r| r.value.is_some()));
    }

    #[test]
    fn empty_filter_result_degrades_gracefully() {
        let cfg = config();
        let mut spec = FilterSpec::new();
        spec.insert("Scenario".into(), allowed_values(["does-not-exist"]));
        let out = run_pipeline(&cfg, &sample(), &spec, None).unwrap();
        assert!(out.export_table.is_empty());
        assert!(out.chart_rows.is_empty());
        assert!(out.preview.is_empty());
    }

    #[test]
    fn missing_identifier_column_surfaces_as_config_error() {
        let mut cfg = config();
        cfg.identifier_columns.push("Region".to_string());
        let err = run_pipeline(
            &cfg,
            &sample(),
            &FilterSpec::new(),
            Some(YearRange::new(2020, 2030)),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn(ref c) if c == "Region"));
    }

    #[test]
    fn filter_and_projection_commute() {
        let cfg = config();
        let mut spec = FilterSpec::new();
        spec.insert("Scenario".into(), allowed_values(["Low"]));
        let range = YearRange::new(2020, 2025);

        // Filter then project (the pipeline's order).
        let a = run_pipeline(&cfg, &sample(), &spec, Some(range)).unwrap();

        // Project then filter.
        let projected =
            project_years(&sample(), &cfg.identifier_columns, range).unwrap();
        let b = apply_filter(&projected, &spec);

        assert_eq!(a.export_table, b);
    }

    #[test]
    fn pagination_slices_one_based_pages() {
        let rows: Vec<Vec<CellValue>> =
            (0..7).map(|i| vec![CellValue::Integer(i)]).collect();
        let t = Table::from_rows(&["Model"], rows);
        assert_eq!(paginate(&t, 1, 3).n_rows(), 3);
        assert_eq!(paginate(&t, 3, 3).n_rows(), 1);
        assert_eq!(paginate(&t, 4, 3).n_rows(), 0);
        assert_eq!(page_count(&t, 3), 3);
        assert_eq!(page_count(&Table::new(), 3), 1);
    }
}
