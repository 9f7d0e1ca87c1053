use crate::config::DatasetConfig;
use crate::data::filter::FilterSpec;
use crate::data::model::Dataset;
use crate::pipeline::columns::{classify, sorted_years};
use crate::pipeline::run::{PAGE_SIZE, PipelineOutput, paginate, run_pipeline};
use crate::pipeline::years::YearRange;

// ---------------------------------------------------------------------------
// Interaction session for one dataset tab
// ---------------------------------------------------------------------------

/// One user's interaction state for one dataset tab, independent of any
/// rendering. The session owns its filter spec and year range for the
/// duration of an interaction cycle and re-runs the pipeline in full after
/// every change; nothing is shared between sessions.
pub struct Session {
    pub config: DatasetConfig,

    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Dataset>,

    /// Per-column picklist selections.
    pub filters: FilterSpec,

    /// Selected year interval, when the dataset year-filters.
    pub year_range: Option<YearRange>,

    /// One-based page of the results view.
    pub page_number: usize,

    /// Latest pipeline output (None until a run succeeds).
    pub output: Option<PipelineOutput>,

    /// Status / warning message surfaced to the user.
    pub status_message: Option<String>,
}

impl Session {
    pub fn new(config: DatasetConfig) -> Self {
        Session {
            config,
            dataset: None,
            filters: FilterSpec::default(),
            year_range: None,
            page_number: 1,
            output: None,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset: clear filters, default the year range
    /// to the dataset's full span, and run the pipeline once.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.filters = FilterSpec::default();
        self.page_number = 1;
        self.status_message = None;
        self.year_range = full_year_span(&dataset, &self.config);
        self.dataset = Some(dataset);
        self.rerun();
    }

    /// Toggle a single picklist value in a column's filter. An empty
    /// selection means "no restriction", so deselecting the last value
    /// releases the column.
    pub fn toggle_value(&mut self, column: &str, value: &str) {
        let selected = self.filters.entry(column.to_string()).or_default();
        let key = value.to_lowercase();
        if !selected.remove(&key) {
            selected.insert(key);
        }
        self.page_number = 1;
        self.rerun();
    }

    /// Release a column's constraint entirely.
    pub fn clear_filter(&mut self, column: &str) {
        self.filters.remove(column);
        self.page_number = 1;
        self.rerun();
    }

    /// Set the year range, clamping an inverted pair and surfacing the
    /// warning instead of failing.
    pub fn set_year_range(&mut self, start: i32, end: i32) {
        let range = YearRange::new(start, end);
        if range.was_clamped() {
            self.status_message = Some(format!(
                "End year {end} precedes start year {start}; showing {start} only"
            ));
        }
        self.year_range = Some(range);
        self.rerun();
    }

    pub fn set_page(&mut self, page_number: usize) {
        self.page_number = page_number.max(1);
    }

    /// The current page of the filtered results.
    pub fn current_page(&self) -> Option<crate::data::model::Table> {
        self.output
            .as_ref()
            .map(|out| paginate(&out.export_table, self.page_number, PAGE_SIZE))
    }

    /// Re-run the pipeline from the full loaded table. A configuration
    /// error is fatal to this tab only: it lands in the status message and
    /// leaves other sessions untouched.
    pub fn rerun(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        match run_pipeline(&self.config, &dataset.table, &self.filters, self.year_range) {
            Ok(output) => {
                self.output = Some(output);
            }
            Err(e) => {
                log::error!("pipeline failed for dataset '{}': {e}", self.config.id);
                self.output = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

/// Default year range: the dataset's full year span, if it has year columns
/// and the config year-filters.
fn full_year_span(dataset: &Dataset, config: &DatasetConfig) -> Option<YearRange> {
    if !config.year_filter_enabled {
        return None;
    }
    let classes = classify(&dataset.table.column_names(), &config.exclude_columns);
    let years = sorted_years(&classes.year_columns);
    match (years.first(), years.last()) {
        (Some((first, _)), Some((last, _))) => Some(YearRange::new(*first, *last)),
        _ => None,
    }
}
