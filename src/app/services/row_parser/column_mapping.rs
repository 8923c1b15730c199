//! Column layouts for the two export file types
//!
//! The exporter's header text is never read, so every column the pipeline
//! needs is pinned here by position. A layout knows how wide a row must be
//! for all of its columns to exist.

use crate::constants::{
    SIGNAL_COL_ACCESS_TYPE, SIGNAL_COL_CONVERSION_TYPE, SIGNAL_COL_IO_ADDRESS,
    SIGNAL_COL_SCAN_NAME, SIGNAL_COL_TAG_NAME, TAG_COL_COMMENT, TAG_COL_ENGINEERING_UNIT,
    TAG_COL_HIGH_SCALE, TAG_COL_INSTRUMENT_TYPE, TAG_COL_LOW_SCALE, TAG_COL_TAG_NAME,
};

/// Named column positions for one export file type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Human-readable file kind for diagnostics
    pub kind: &'static str,

    /// Column name to zero-based position
    pub columns: &'static [(&'static str, usize)],
}

impl ColumnLayout {
    /// Layout of Tags_1.csv
    pub const TAGS: ColumnLayout = ColumnLayout {
        kind: "tags",
        columns: &[
            ("TagName", TAG_COL_TAG_NAME),
            ("TagComment", TAG_COL_COMMENT),
            ("InstrumentType", TAG_COL_INSTRUMENT_TYPE),
            ("SH", TAG_COL_HIGH_SCALE),
            ("SL", TAG_COL_LOW_SCALE),
            ("EU_PV", TAG_COL_ENGINEERING_UNIT),
        ],
    };

    /// Layout of Signals_1.csv
    pub const SIGNALS: ColumnLayout = ColumnLayout {
        kind: "signals",
        columns: &[
            ("TagName", SIGNAL_COL_TAG_NAME),
            ("IOAddress", SIGNAL_COL_IO_ADDRESS),
            ("AccessType", SIGNAL_COL_ACCESS_TYPE),
            ("ScanName", SIGNAL_COL_SCAN_NAME),
            ("ConversionTypeName", SIGNAL_COL_CONVERSION_TYPE),
        ],
    };

    /// Fewest fields a row may have for every mapped column to exist
    pub fn min_width(&self) -> usize {
        self.columns
            .iter()
            .map(|(_, index)| index + 1)
            .max()
            .unwrap_or(0)
    }

    /// Position of a named column
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|(column, _)| *column == name)
            .map(|(_, index)| *index)
    }
}
