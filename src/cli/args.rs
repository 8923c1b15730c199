//! Command-line argument definitions for UGS Extract
//!
//! Every flag is an override on top of the configuration file; anything left
//! unset keeps the file's or the built-in value.

use crate::config::{DuplicateTagPolicy, ReportFormat, SetpointLayout};
use crate::{Error, Result};
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the UGS report extractor
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "ugs-extract",
    version,
    about = "Build the UGS instrumentation report from a SCADA export tree",
    long_about = "Walks a vendor export tree, merges every controller's Tags_1.csv and \
                  Signals_1.csv into one tag registry, attaches LL/PL/PH/HH setpoints from \
                  each site's tuning-parameter database and writes a single dated report."
)]
pub struct Args {
    /// Configuration file (TOML)
    ///
    /// If not specified, ./ugs-extract.toml is used when present.
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Root of the vendor export tree
    #[arg(short = 'i', long = "export-root", value_name = "PATH")]
    pub export_root: Option<PathBuf>,

    /// Tuning database for a site, as NAME=PATH
    ///
    /// Repeat for several sites. Entries are merged over the configured sites.
    #[arg(long = "site", value_name = "NAME=PATH")]
    pub sites: Vec<SiteArg>,

    /// Directory the report is written into
    #[arg(short = 'o', long = "output-dir", value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Report file format
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<ReportFormat>,

    /// How setpoints are laid out in the trailing report columns
    #[arg(long = "setpoint-layout", value_enum)]
    pub setpoint_layout: Option<SetpointLayout>,

    /// What to do with a tag name seen in more than one controller
    #[arg(long = "duplicate-tags", value_enum)]
    pub duplicate_tags: Option<DuplicateTagPolicy>,

    /// Read the export tree only: open no databases and write no report
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors and hide the progress bar
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// A `--site NAME=PATH` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteArg {
    pub site_id: String,
    pub store_path: PathBuf,
}

impl FromStr for SiteArg {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (site_id, store_path) = s.split_once('=').ok_or_else(|| {
            Error::configuration(format!("Expected NAME=PATH for --site, got '{}'", s))
        })?;

        let site_id = site_id.trim();
        let store_path = store_path.trim();
        if site_id.is_empty() || store_path.is_empty() {
            return Err(Error::configuration(format!(
                "Site name and path must both be non-empty in '{}'",
                s
            )));
        }

        Ok(Self {
            site_id: site_id.to_string(),
            store_path: PathBuf::from(store_path),
        })
    }
}
