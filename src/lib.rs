//! UGS Extract Library
//!
//! Builds the UGS instrumentation report from a SCADA vendor export tree.
//!
//! This library provides tools for:
//! - Discovering controller exports (`Tags_1.csv` / `Signals_1.csv`) below an
//!   export root, skipping the multi-signal `RTU0*` controllers
//! - Parsing both exports with a per-file column table validated at open time
//! - Merging tags and their I/O-mapped signals into one run-owned registry
//! - Enriching `USD-F64` tags with LL/PL/PH/HH setpoints from per-site SQLite
//!   tuning databases
//! - Writing the flattened registry as one dated CSV or Parquet report

pub mod config;
pub mod constants;
pub mod error;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod pipeline;
        pub mod report_assembler;
        pub mod row_parser;
        pub mod setpoint_resolver;
        pub mod tag_registry;
        pub mod traversal;
    }
    pub mod adapters {
        pub mod notifier;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{ReportRow, SetpointName, SetpointValue, Setpoints, TagRecord};
pub use app::services::pipeline::{Pipeline, RunSummary};
pub use config::Config;
pub use error::{Error, Result};
