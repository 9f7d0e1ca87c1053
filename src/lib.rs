//! Core library of the pathway explorer: load wide-format climate-pathway
//! tables, filter them via categorical picklists and a year range, reshape
//! them into chart-ready long form with a cross-series median trend, and
//! export the filtered subset.
//!
//! The pipeline (`pipeline::run`) is referentially transparent: each stage
//! consumes one table and produces a fresh one, so a run is a pure function
//! of `(config, filter_spec, year_range, source table)`. The UI shell, the
//! chart renderer and the spreadsheet encoder are external collaborators
//! specified at their interfaces (`chart::ChartRenderer`,
//! `export::TableEncoder`).

pub mod chart;
pub mod config;
pub mod data;
pub mod export;
pub mod pipeline;
pub mod session;
