//! Core domain models for UGS extraction
//!
//! This module defines the records that flow through the pipeline: tag
//! records built from the primary export, the signal fields merged into
//! them, the setpoints resolved from the tuning database, and the flat
//! report rows produced at the end.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::SETPOINT_INSTRUMENT_TYPE;

/// A controller directory selected from the export tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerDir {
    /// Site (UGS) the controller belongs to
    pub site_id: String,
    /// Controller name, the directory's own name
    pub controller_id: String,
    /// Absolute or root-relative path of the directory
    pub path: PathBuf,
}

impl ControllerDir {
    /// `site/controller` label used in log messages
    pub fn label(&self) -> String {
        qualified_name(&self.site_id, &self.controller_id)
    }
}

/// `site/controller`, or just the controller when it has no site
fn qualified_name(site_id: &str, controller_id: &str) -> String {
    if site_id.is_empty() {
        controller_id.to_string()
    } else {
        format!("{}/{}", site_id, controller_id)
    }
}

/// Fields extracted from one row of the primary (tags) export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryRow {
    pub tag_name: String,
    pub comment: String,
    pub instrument_type: String,
    pub high_scale: String,
    pub low_scale: String,
    pub engineering_unit: String,
}

/// Fields extracted from one row of the secondary (signals) export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryRow {
    pub tag_name: String,
    pub signal: SignalFields,
}

impl SecondaryRow {
    /// Only signals wired to an I/O address are merged into tags
    pub fn has_io_address(&self) -> bool {
        !self.signal.io_address.is_empty()
    }
}

/// I/O mapping attributes merged into a tag from its signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalFields {
    pub io_address: String,
    pub access_type: String,
    pub scan_name: String,
    pub conversion_type: String,
}

/// One instrument tag, keyed by `tag_name` for the whole run
#[derive(Debug, Clone, PartialEq)]
pub struct TagRecord {
    pub site_id: String,
    pub controller_id: String,
    pub tag_name: String,
    pub comment: String,
    pub instrument_type: String,
    pub low_scale: String,
    pub high_scale: String,
    pub engineering_unit: String,

    /// Present once an eligible signal has been merged
    pub signal: Option<SignalFields>,

    /// Present once the tag has been enriched from its site's store
    pub setpoints: Option<Setpoints>,
}

impl TagRecord {
    /// Build a fresh record from a primary row and its controller
    pub fn from_primary(controller: &ControllerDir, row: PrimaryRow) -> Self {
        Self {
            site_id: controller.site_id.clone(),
            controller_id: controller.controller_id.clone(),
            tag_name: row.tag_name,
            comment: row.comment,
            instrument_type: row.instrument_type,
            low_scale: row.low_scale,
            high_scale: row.high_scale,
            engineering_unit: row.engineering_unit,
            signal: None,
            setpoints: None,
        }
    }

    /// Whether this tag's instrument type carries setpoints
    pub fn is_setpoint_eligible(&self) -> bool {
        self.instrument_type == SETPOINT_INSTRUMENT_TYPE
    }

    /// `site/controller` the record came from
    pub fn origin(&self) -> String {
        qualified_name(&self.site_id, &self.controller_id)
    }
}

/// Setpoint item names stored in the tuning database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SetpointName {
    /// Low-low
    LL,
    /// Low
    PL,
    /// High
    PH,
    /// High-high
    HH,
}

impl SetpointName {
    /// All names in report column order
    pub const ALL: [SetpointName; 4] = [
        SetpointName::LL,
        SetpointName::PL,
        SetpointName::PH,
        SetpointName::HH,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SetpointName::LL => "LL",
            SetpointName::PL => "PL",
            SetpointName::PH => "PH",
            SetpointName::HH => "HH",
        }
    }

    /// Position among the setpoint report columns
    pub fn column_offset(&self) -> usize {
        match self {
            SetpointName::LL => 0,
            SetpointName::PL => 1,
            SetpointName::PH => 2,
            SetpointName::HH => 3,
        }
    }
}

impl fmt::Display for SetpointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetpointName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LL" => Ok(SetpointName::LL),
            "PL" => Ok(SetpointName::PL),
            "PH" => Ok(SetpointName::PH),
            "HH" => Ok(SetpointName::HH),
            other => Err(format!("Unknown setpoint name '{}'", other)),
        }
    }
}

/// A setpoint value, keeping the storage class the database used
#[derive(Debug, Clone, PartialEq)]
pub enum SetpointValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl fmt::Display for SetpointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetpointValue::Integer(v) => write!(f, "{}", v),
            // Debug keeps the trailing ".0" on whole numbers
            SetpointValue::Real(v) => write!(f, "{:?}", v),
            SetpointValue::Text(v) => f.write_str(v),
        }
    }
}

/// Setpoints resolved for one tag
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Setpoints {
    /// Values in the order the store returned them, one per item name
    entries: Vec<(SetpointName, SetpointValue)>,
}

impl Setpoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value; a repeated name keeps the first value and returns false
    pub fn insert(&mut self, name: SetpointName, value: SetpointValue) -> bool {
        if self.get(name).is_some() {
            return false;
        }
        self.entries.push((name, value));
        true
    }

    pub fn get(&self, name: SetpointName) -> Option<&SetpointValue> {
        self.entries
            .iter()
            .find(|(entry_name, _)| *entry_name == name)
            .map(|(_, value)| value)
    }

    /// Values in the order they were resolved
    pub fn in_resolved_order(&self) -> impl Iterator<Item = &(SetpointName, SetpointValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One flattened output row; cells beyond `cells.len()` are absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    cells: Vec<Option<String>>,
}

impl ReportRow {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Option<String>] {
        &self.cells
    }

    /// Cell at `index`, `None` when blank or beyond the row's width
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    pub fn width(&self) -> usize {
        self.cells.len()
    }
}
