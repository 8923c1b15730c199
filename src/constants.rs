//! Application constants for the UGS extractor
//!
//! File names, column positions, selection rules and report layout used
//! throughout the extraction pipeline.

// =============================================================================
// Export Tree Layout
// =============================================================================

/// Primary (tag) export file present in every controller directory
pub const TAGS_FILE_NAME: &str = "Tags_1.csv";

/// Secondary (signal) export file present in every controller directory
pub const SIGNALS_FILE_NAME: &str = "Signals_1.csv";

/// Controllers with this prefix map one tag to many signals and are never extracted
pub const EXCLUDED_CONTROLLER_PREFIX: &str = "RTU0";

// =============================================================================
// Column Positions
// =============================================================================
//
// Header text is discarded by the exporter's consumers; only positions matter.

/// Tags_1.csv: TagName
pub const TAG_COL_TAG_NAME: usize = 0;
/// Tags_1.csv: TagComment
pub const TAG_COL_COMMENT: usize = 3;
/// Tags_1.csv: InstrumentType
pub const TAG_COL_INSTRUMENT_TYPE: usize = 4;
/// Tags_1.csv: high scale (SH)
pub const TAG_COL_HIGH_SCALE: usize = 14;
/// Tags_1.csv: low scale (SL)
pub const TAG_COL_LOW_SCALE: usize = 15;
/// Tags_1.csv: engineering unit (EU_PV)
pub const TAG_COL_ENGINEERING_UNIT: usize = 16;

/// Signals_1.csv: TagName
pub const SIGNAL_COL_TAG_NAME: usize = 0;
/// Signals_1.csv: IOAddress
pub const SIGNAL_COL_IO_ADDRESS: usize = 5;
/// Signals_1.csv: AccessType
pub const SIGNAL_COL_ACCESS_TYPE: usize = 7;
/// Signals_1.csv: ScanName
pub const SIGNAL_COL_SCAN_NAME: usize = 8;
/// Signals_1.csv: ConversionTypeName
pub const SIGNAL_COL_CONVERSION_TYPE: usize = 10;

// =============================================================================
// Enrichment
// =============================================================================

/// The only instrument type whose tags carry setpoints in the tuning database
pub const SETPOINT_INSTRUMENT_TYPE: &str = "USD-F64";

// =============================================================================
// Report Layout
// =============================================================================

/// Report header, in output order
pub const REPORT_COLUMNS: [&str; 16] = [
    "UGS_Name",
    "Controller Name",
    "TagName",
    "TagComment",
    "InstrumentType",
    "SL",
    "SH",
    "EU_PV",
    "IOAddress",
    "AccessType",
    "ScanName",
    "ConversionTypeName",
    "LL",
    "PL",
    "PH",
    "HH",
];

/// Number of leading columns filled from the tag and signal exports
pub const REPORT_BASE_COLUMNS: usize = 12;

// =============================================================================
// Defaults
// =============================================================================

/// Default export root, relative to the working directory
pub const DEFAULT_EXPORT_ROOT: &str = "BCVU export";

/// Sites whose tuning databases are configured out of the box
pub const DEFAULT_SITES: &[&str] = &["BCVU1151", "BCVU1152"];

/// Directory holding one tuning database per site
pub const DEFAULT_TUNING_DIR: &str = "TP";

/// File name of a site's tuning database
pub const TUNING_DATABASE_FILE_NAME: &str = "TuningParameter.sqlite";

/// Report file name prefix; the run date is appended
pub const DEFAULT_REPORT_PREFIX: &str = "UGS Extract";

/// Configuration file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE_NAME: &str = "ugs-extract.toml";
