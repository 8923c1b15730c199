//! Report file output through polars
//!
//! Every report column is a nullable string column. Blank and absent cells
//! are both stored as null so CSV output leaves them empty.

use polars::prelude::{
    Column, CsvWriter, DataFrame, ParquetWriter as PolarsParquetWriter, PolarsResult, SerWriter,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::app::models::ReportRow;
use crate::config::ReportFormat;
use crate::constants::REPORT_COLUMNS;
use crate::error::{Error, Result};

const STAGING_SUFFIX: &str = ".partial";

/// Build the report table, padding short rows with nulls
pub fn report_frame(rows: &[ReportRow]) -> PolarsResult<DataFrame> {
    let columns = REPORT_COLUMNS
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let values: Vec<Option<String>> = rows
                .iter()
                .map(|row| {
                    row.cell(index)
                        .filter(|cell| !cell.is_empty())
                        .map(str::to_string)
                })
                .collect();
            Column::new((*name).into(), values)
        })
        .collect();

    DataFrame::new(columns)
}

/// Writes assembled rows to a single report file
#[derive(Debug, Clone, Copy)]
pub struct ReportWriter {
    format: ReportFormat,
}

impl ReportWriter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Write `rows` to `path`, replacing any existing file
    ///
    /// The report is encoded into a staging file next to `path` and renamed
    /// into place, so a failed write never leaves a truncated report behind.
    /// Every failure, including a file held open by another program, comes
    /// back as [`Error::ReportWrite`].
    pub fn write(&self, rows: &[ReportRow], path: &Path) -> Result<()> {
        let mut df = report_frame(rows).map_err(|e| Error::report_write(path, e))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::report_write(path, e))?;
        }

        let staging = staging_path(path);
        debug!(
            "Writing {} rows as {:?} to {}",
            df.height(),
            self.format,
            staging.display()
        );

        let written = self.encode(&mut df, &staging, path).and_then(|()| {
            std::fs::rename(&staging, path).map_err(|e| Error::report_write(path, e))
        });

        if let Err(e) = written {
            if staging.exists() {
                if let Err(remove_error) = std::fs::remove_file(&staging) {
                    warn!(
                        "Cannot remove staging file {}: {}",
                        staging.display(),
                        remove_error
                    );
                }
            }
            return Err(e);
        }

        info!("Report written: {} ({} rows)", path.display(), rows.len());
        Ok(())
    }

    /// Encode into `staging`; errors name the report they were meant for
    fn encode(&self, df: &mut DataFrame, staging: &Path, path: &Path) -> Result<()> {
        let mut file = File::create(staging).map_err(|e| Error::report_write(path, e))?;

        match self.format {
            ReportFormat::Csv => CsvWriter::new(&mut file)
                .include_header(true)
                .finish(df)
                .map_err(|e| Error::report_write(path, e))?,
            ReportFormat::Parquet => {
                PolarsParquetWriter::new(file)
                    .finish(df)
                    .map_err(|e| Error::report_write(path, e))?;
            }
        }
        Ok(())
    }
}

/// Sibling of `path` that holds the report until it is complete
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(STAGING_SUFFIX);
    path.with_file_name(name)
}
