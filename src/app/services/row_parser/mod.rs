//! Delimited-text parser for UGS controller exports
//!
//! Each controller directory holds a tags export and a signals export. Both
//! are comma-separated with a single header line whose text is ignored;
//! fields are addressed by position only.
//!
//! ## Architecture
//!
//! - [`column_mapping`] - Named column positions per export file, and the
//!   minimum row width each one implies
//! - [`parser`] - Lazy record iteration with width checks, and typed
//!   extraction of tag and signal rows
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ugs_extract::app::services::row_parser::parse_tags_file;
//!
//! # fn example() -> ugs_extract::Result<()> {
//! let tags = parse_tags_file(std::path::Path::new("export/SITE/CTRL/Tags_1.csv"))?;
//! println!("{} tags", tags.len());
//! # Ok(())
//! # }
//! ```

pub mod column_mapping;
pub mod parser;

#[cfg(test)]
pub mod tests;

pub use column_mapping::ColumnLayout;
pub use parser::{DelimitedRows, parse_signals_file, parse_tags_file};
