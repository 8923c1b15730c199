//! Report assembly and output
//!
//! Projects every registry entry, in registry order, onto the fixed report
//! header and writes the result as a single table.
//!
//! - [`assembler`] - Registry entries to [`ReportRow`]s
//! - [`writer`] - Rows to a CSV or Parquet file through polars
//!
//! [`ReportRow`]: crate::app::models::ReportRow

pub mod assembler;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use assembler::{assemble_report, report_row};
pub use writer::{ReportWriter, report_frame, staging_path};
