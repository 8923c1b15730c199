//! Record iteration and typed row extraction
//!
//! [`DelimitedRows`] reads one export file lazily, discarding the header
//! line and refusing any row narrower than the file's [`ColumnLayout`].
//! The `parse_*_file` helpers drain it into typed rows.

use csv::StringRecord;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::column_mapping::ColumnLayout;
use crate::app::models::{PrimaryRow, SecondaryRow, SignalFields};
use crate::constants::{
    SIGNAL_COL_ACCESS_TYPE, SIGNAL_COL_CONVERSION_TYPE, SIGNAL_COL_IO_ADDRESS,
    SIGNAL_COL_SCAN_NAME, SIGNAL_COL_TAG_NAME, TAG_COL_COMMENT, TAG_COL_ENGINEERING_UNIT,
    TAG_COL_HIGH_SCALE, TAG_COL_INSTRUMENT_TYPE, TAG_COL_LOW_SCALE, TAG_COL_TAG_NAME,
};
use crate::error::{Error, Result};

/// One-pass iterator over the data rows of an export file
///
/// The header is checked against the layout when the file is opened, so a
/// file that could never satisfy the layout fails before any row is read.
pub struct DelimitedRows {
    path: PathBuf,
    min_width: usize,
    records: csv::StringRecordsIntoIter<File>,
}

impl std::fmt::Debug for DelimitedRows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelimitedRows")
            .field("path", &self.path)
            .field("min_width", &self.min_width)
            .finish()
    }
}

impl DelimitedRows {
    /// Open a file and validate its header width against `layout`
    pub fn open(path: &Path, layout: &ColumnLayout) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| Error::csv(path, e))?;

        let min_width = layout.min_width();
        let header_width = reader.headers().map_err(|e| Error::csv(path, e))?.len();
        if header_width < min_width {
            return Err(Error::SchemaMismatch {
                path: path.to_path_buf(),
                expected: min_width,
                found: header_width,
            });
        }

        debug!(
            "Opened {} export {} ({} header columns)",
            layout.kind,
            path.display(),
            header_width
        );

        Ok(Self {
            path: path.to_path_buf(),
            min_width,
            records: reader.into_records(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for DelimitedRows {
    type Item = Result<StringRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(Error::csv(&self.path, e))),
        };

        if record.len() < self.min_width {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Some(Err(Error::MalformedRow {
                path: self.path.clone(),
                line,
                expected: self.min_width,
                found: record.len(),
            }));
        }

        Some(Ok(record))
    }
}

/// Field at a position already guaranteed by the width check
fn field(record: &StringRecord, index: usize) -> String {
    record.get(index).unwrap_or_default().to_string()
}

/// Extract the tag columns from a width-checked record
pub fn primary_row(record: &StringRecord) -> PrimaryRow {
    PrimaryRow {
        tag_name: field(record, TAG_COL_TAG_NAME),
        comment: field(record, TAG_COL_COMMENT),
        instrument_type: field(record, TAG_COL_INSTRUMENT_TYPE),
        high_scale: field(record, TAG_COL_HIGH_SCALE),
        low_scale: field(record, TAG_COL_LOW_SCALE),
        engineering_unit: field(record, TAG_COL_ENGINEERING_UNIT),
    }
}

/// Extract the signal columns from a width-checked record
pub fn secondary_row(record: &StringRecord) -> SecondaryRow {
    SecondaryRow {
        tag_name: field(record, SIGNAL_COL_TAG_NAME),
        signal: SignalFields {
            io_address: field(record, SIGNAL_COL_IO_ADDRESS),
            access_type: field(record, SIGNAL_COL_ACCESS_TYPE),
            scan_name: field(record, SIGNAL_COL_SCAN_NAME),
            conversion_type: field(record, SIGNAL_COL_CONVERSION_TYPE),
        },
    }
}

/// Read every tag row of a Tags_1.csv file
pub fn parse_tags_file(path: &Path) -> Result<Vec<PrimaryRow>> {
    DelimitedRows::open(path, &ColumnLayout::TAGS)?
        .map(|record| record.map(|r| primary_row(&r)))
        .collect()
}

/// Read every signal row of a Signals_1.csv file
pub fn parse_signals_file(path: &Path) -> Result<Vec<SecondaryRow>> {
    DelimitedRows::open(path, &ColumnLayout::SIGNALS)?
        .map(|record| record.map(|r| secondary_row(&r)))
        .collect()
}
