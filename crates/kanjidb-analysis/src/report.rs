//! Table ordering and export of analysis rows.

use serde::Serialize;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;
use std::str::FromStr;
use tempfile::NamedTempFile;

use kanjidb_core::{AnalysisRow, Error, Result};

pub const CSV_HEADER: &str =
    "Component,Freq of component,size,Kanji in series,Predicted reading,Reading Coverage,Kanji with extra readings";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Size,
    Coverage,
    Frequency,
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "size" => Ok(SortKey::Size),
            "coverage" => Ok(SortKey::Coverage),
            "frequency" | "freq" => Ok(SortKey::Frequency),
            other => Err(Error::InvalidConfig(format!("unknown sort key '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::InvalidConfig(format!("unknown export format '{other}'"))),
        }
    }
}

/// Stable sort on a single key; rows that compare equal keep their order.
///
/// Rows without a component frequency go last in both directions.
pub fn sort_rows(rows: &mut [AnalysisRow], key: SortKey, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Size => a.size().cmp(&b.size()),
            SortKey::Coverage => a.coverage.total_cmp(&b.coverage),
            SortKey::Frequency => {
                return match direction {
                    SortDirection::Ascending => {
                        (a.frequency.is_none(), a.frequency).cmp(&(b.frequency.is_none(), b.frequency))
                    }
                    SortDirection::Descending => b.frequency.cmp(&a.frequency),
                };
            }
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn csv_field(s: &str) -> Cow<'_, str> {
    if s.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", s.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(s)
    }
}

pub fn to_csv(rows: &[AnalysisRow], precision: u32) -> Result<String> {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + rows.len() * 48);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for row in rows {
        let frequency = row.frequency.map(|f| f.to_string()).unwrap_or_default();
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{}",
            csv_field(&row.component),
            frequency,
            row.size(),
            csv_field(&row.kanji_in_series.concat()),
            csv_field(&row.reading),
            row.coverage_percent(precision)?,
            csv_field(&row.kanji_with_extra_readings.concat()),
        );
    }
    Ok(out)
}

#[derive(Serialize)]
struct JsonRow<'a> {
    #[serde(flatten)]
    row: &'a AnalysisRow,
    size: usize,
    coverage_percent: String,
}

pub fn to_json(rows: &[AnalysisRow], precision: u32) -> Result<String> {
    let json_rows = rows
        .iter()
        .map(|row| {
            Ok(JsonRow {
                row,
                size: row.size(),
                coverage_percent: row.coverage_percent(precision)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    serde_json::to_string_pretty(&json_rows).map_err(|e| Error::Io(e.into()))
}

/// Writes `contents` through a temp file in the same directory so readers
/// never see a half-written export.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;
    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(contents.as_bytes())?;
    temp_file.flush()?;
    temp_file.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
