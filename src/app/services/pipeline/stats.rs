//! Run statistics for the extraction pipeline

use std::path::PathBuf;
use std::time::Duration;

use crate::app::services::setpoint_resolver::EnrichmentStats;

/// Counters collected while reading controllers into the registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Directories visited in the export tree
    pub directories_seen: usize,
    /// Controllers selected for extraction
    pub controllers_selected: usize,
    /// Controllers skipped for the excluded name prefix
    pub controllers_excluded: usize,
    /// Export files lying in the export root itself
    pub unplaced_exports: usize,
    /// Controllers whose exports could not be parsed
    pub controllers_failed: usize,
    /// Distinct tags added to the registry
    pub tags_registered: usize,
    /// Tag rows whose name was already registered
    pub duplicate_tags: usize,
    /// Signals merged into their tag
    pub signals_merged: usize,
    /// Signal rows with an empty I/O address
    pub signals_without_address: usize,
    /// Signals for a tag that already carried one
    pub signal_conflicts: usize,
    /// Signals naming a tag that has no primary row
    pub orphan_signals: usize,
    /// Signals whose tag row was rejected as another controller's duplicate
    pub signals_for_rejected_tags: usize,
    /// `site/controller` labels of the controllers that were read
    pub controllers: Vec<String>,
    /// One message per failed controller
    pub failures: Vec<String>,
}

/// Everything a caller needs to report on a finished run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub extraction: ExtractionStats,
    pub enrichment: EnrichmentStats,
    /// Rows in the report
    pub rows: usize,
    /// Where the report was written, if it was
    pub report_path: Option<PathBuf>,
    /// Why the report could not be written
    pub report_error: Option<String>,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Whether the report reached disk
    pub fn report_written(&self) -> bool {
        self.report_path.is_some()
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Extraction Summary: {} controllers ({} excluded, {} failed) | \
             {} tags, {} duplicates | {} signals merged, {} orphaned | \
             {} of {} eligible tags enriched",
            self.extraction.controllers_selected,
            self.extraction.controllers_excluded,
            self.extraction.controllers_failed,
            self.extraction.tags_registered,
            self.extraction.duplicate_tags,
            self.extraction.signals_merged,
            self.extraction.orphan_signals,
            self.enrichment.enriched,
            self.enrichment.eligible
        )
    }
}
