//! Configuration management and validation.
//!
//! Provides the run configuration: where the export tree lives, which
//! tuning-parameter store belongs to which site, and how the report is
//! laid out and written. Values come from built-in defaults, an optional
//! TOML file, then command-line overrides.

use crate::constants::{
    DEFAULT_EXPORT_ROOT, DEFAULT_REPORT_PREFIX, DEFAULT_SITES, DEFAULT_TUNING_DIR,
    TUNING_DATABASE_FILE_NAME,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Output file format for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Comma-separated text, header on the first line
    Csv,
    /// Apache Parquet, all columns as nullable strings
    Parquet,
}

impl ReportFormat {
    /// File extension used for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Parquet => "parquet",
        }
    }
}

/// How resolved setpoints are placed in the trailing report columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SetpointLayout {
    /// Each value goes under its own LL/PL/PH/HH column
    Named,
    /// Values are packed left in database order (descending item name)
    Positional,
}

/// What happens when a tag name is seen a second time during one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateTagPolicy {
    /// The later record replaces the earlier one in place
    Replace,
    /// The earlier record is kept and the later one is rejected
    Reject,
}

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the vendor export tree
    pub export_root: PathBuf,

    /// Tuning-parameter database per site id
    pub sites: BTreeMap<String, PathBuf>,

    /// Directory the report is written into
    pub output_dir: PathBuf,

    /// Report file name prefix; `_<date>.<ext>` is appended
    pub report_prefix: String,

    pub report_format: ReportFormat,

    pub setpoint_layout: SetpointLayout,

    pub duplicate_tags: DuplicateTagPolicy,
}

impl Default for Config {
    fn default() -> Self {
        let sites = DEFAULT_SITES
            .iter()
            .map(|site| {
                (
                    site.to_string(),
                    Path::new(DEFAULT_TUNING_DIR)
                        .join(site)
                        .join(TUNING_DATABASE_FILE_NAME),
                )
            })
            .collect();

        Self {
            export_root: PathBuf::from(DEFAULT_EXPORT_ROOT),
            sites,
            output_dir: PathBuf::from("."),
            report_prefix: DEFAULT_REPORT_PREFIX.to_string(),
            report_format: ReportFormat::Csv,
            setpoint_layout: SetpointLayout::Named,
            duplicate_tags: DuplicateTagPolicy::Replace,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;
        let config = Self::from_toml_str(&content).map_err(|e| {
            Error::configuration(format!("{}: {}", path.display(), e))
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::configuration(format!("Invalid TOML: {}", e)))
    }

    /// Set the export root
    pub fn with_export_root(mut self, export_root: impl Into<PathBuf>) -> Self {
        self.export_root = export_root.into();
        self
    }

    /// Add or replace the store for one site
    pub fn with_site(mut self, site_id: impl Into<String>, store_path: impl Into<PathBuf>) -> Self {
        self.sites.insert(site_id.into(), store_path.into());
        self
    }

    /// Drop every configured site
    pub fn without_sites(mut self) -> Self {
        self.sites.clear();
        self
    }

    /// Set the report output directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }

    pub fn with_setpoint_layout(mut self, layout: SetpointLayout) -> Self {
        self.setpoint_layout = layout;
        self
    }

    pub fn with_duplicate_tags(mut self, policy: DuplicateTagPolicy) -> Self {
        self.duplicate_tags = policy;
        self
    }

    /// Check values that cannot be caught by deserialization
    pub fn validate(&self) -> Result<()> {
        if self.report_prefix.trim().is_empty() {
            return Err(Error::configuration("report_prefix must not be empty"));
        }
        if self.export_root.as_os_str().is_empty() {
            return Err(Error::configuration("export_root must not be empty"));
        }
        for (site_id, path) in &self.sites {
            if site_id.trim().is_empty() {
                return Err(Error::configuration("site ids must not be empty"));
            }
            if path.as_os_str().is_empty() {
                return Err(Error::configuration(format!(
                    "store path for site '{}' must not be empty",
                    site_id
                )));
            }
        }
        Ok(())
    }

    /// Report file path for the given run date
    pub fn report_path(&self, date: chrono::NaiveDate) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}.{}",
            self.report_prefix,
            date.format("%Y-%m-%d"),
            self.report_format.extension()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_historical_layout() {
        let config = Config::default();

        assert_eq!(config.export_root, PathBuf::from("BCVU export"));
        assert_eq!(config.sites.len(), 2);
        assert_eq!(
            config.sites["BCVU1151"],
            Path::new("TP").join("BCVU1151").join("TuningParameter.sqlite")
        );
        assert_eq!(config.report_format, ReportFormat::Csv);
        assert_eq!(config.setpoint_layout, SetpointLayout::Named);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            export_root = "/data/export"
            report_format = "parquet"

            [sites]
            SITE_A = "/data/a.sqlite"
            "#,
        )
        .unwrap();

        assert_eq!(config.export_root, PathBuf::from("/data/export"));
        assert_eq!(config.report_format, ReportFormat::Parquet);
        assert_eq!(config.sites.len(), 1);
        assert_eq!(config.sites["SITE_A"], PathBuf::from("/data/a.sqlite"));
        assert_eq!(config.report_prefix, "UGS Extract");
        assert_eq!(config.duplicate_tags, DuplicateTagPolicy::Replace);
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let result = Config::from_toml_str("setpoint_layout = \"sideways\"");
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_validate_rejects_empty_values() {
        let mut config = Config::default();
        config.report_prefix = "  ".to_string();
        assert!(config.validate().is_err());

        let config = Config::default().with_site("", "x.sqlite");
        assert!(config.validate().is_err());

        let config = Config::default().with_site("S1", "");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_report_path_uses_date_and_extension() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let config = Config::default().with_output_dir("/out");
        assert_eq!(
            config.report_path(date),
            PathBuf::from("/out/UGS Extract_2024-03-31.csv")
        );

        let config = config.with_report_format(ReportFormat::Parquet);
        assert_eq!(
            config.report_path(date),
            PathBuf::from("/out/UGS Extract_2024-03-31.parquet")
        );
    }
}
