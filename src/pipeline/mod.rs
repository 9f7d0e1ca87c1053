/// Filter/reshape/aggregate pipeline over wide categorical+year tables.
///
/// Architecture:
/// ```text
///   wide Table (from data::loader)
///        │  drop excluded columns
///        ▼
///   ┌──────────┐
///   │ columns   │  classify: identifiers vs. year columns
///   └──────────┘
///        │  data::filter (categorical picklists)
///        ▼
///   ┌──────────┐
///   │  years    │  YearRange clamp + column projection
///   └──────────┘
///        │            → export_table (wide)
///        ▼
///   ┌──────────┐
///   │  melt     │  wide → long (one row per entity × year)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ aggregate │  per-year median trend, sentinel-labelled
///   └──────────┘
///        │  concat + zero/missing display filter
///        ▼
///      chart_rows (to the chart renderer)
/// ```
/// `run` composes the stages per `DatasetConfig`; every stage consumes one
/// value and produces a fresh one, so concurrent runs with distinct inputs
/// need no synchronization.
pub mod aggregate;
pub mod columns;
pub mod melt;
pub mod run;
pub mod years;

use thiserror::Error;

/// Errors from a pipeline run. Data-quality irregularities are absorbed via
/// coercion-to-missing and never raised; only structural configuration
/// problems surface here, fatal to this dataset's run and no other.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A dataset configuration references an identifier column absent from
    /// its data file.
    #[error("identifier column '{0}' is missing from the source table")]
    MissingColumn(String),
}
