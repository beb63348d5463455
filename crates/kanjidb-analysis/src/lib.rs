//! kanjidb-analysis
//!
//! Predicts a shared on-reading for every component and turns the results
//! into a sortable, exportable table.
pub mod analyzer;
pub mod report;

pub use analyzer::{AnalysisReport, ComponentAnalysis, ComponentAnalyzer};
pub use report::{sort_rows, to_csv, to_json, write_atomic, ExportFormat, SortDirection, SortKey};
