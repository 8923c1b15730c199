//! Extraction pipeline orchestration
//!
//! One [`Pipeline::run`] is one report:
//!
//! 1. **Discovery**: walk the export tree and select controller directories
//! 2. **Extraction**: parse each controller's tags and signals into a
//!    [`TagRegistry`] owned by the run
//! 3. **Enrichment**: open every configured tuning database, attach
//!    setpoints to eligible tags, close the databases
//! 4. **Assembly and output**: flatten the registry and write the report
//!
//! Failures are contained at the narrowest level that makes sense. A
//! controller with an unreadable or malformed export is dropped whole; a tag
//! whose setpoints cannot be fetched keeps its base columns; a report that
//! cannot be written is reported through the [`Notifier`] and the run still
//! completes. Only an unusable configuration, a missing export root or a
//! tuning database that cannot be opened end the run with an error.

use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::app::adapters::notifier::Notifier;
use crate::app::models::{ControllerDir, PrimaryRow, SecondaryRow, TagRecord};
use crate::app::services::report_assembler::{ReportWriter, assemble_report};
use crate::app::services::row_parser::{parse_signals_file, parse_tags_file};
use crate::app::services::setpoint_resolver::{SetpointResolver, enrich_registry};
use crate::app::services::tag_registry::{Registration, SignalMerge, TagRegistry};
use crate::app::services::traversal::{Discovery, discover_controllers};
use crate::config::Config;
use crate::constants::{SIGNALS_FILE_NAME, TAGS_FILE_NAME};
use crate::error::{Error, Result};

pub mod stats;

pub use stats::{ExtractionStats, RunSummary};

/// Both exports of one controller, fully parsed
#[derive(Debug, Clone)]
pub struct ControllerExport {
    pub tags: Vec<PrimaryRow>,
    pub signals: Vec<SecondaryRow>,
}

/// Parse a controller's tags and signals before touching the registry
pub fn load_controller(controller: &ControllerDir) -> Result<ControllerExport> {
    let tags = parse_tags_file(&controller.path.join(TAGS_FILE_NAME))?;
    let signals = parse_signals_file(&controller.path.join(SIGNALS_FILE_NAME))?;
    Ok(ControllerExport { tags, signals })
}

/// Register a parsed controller's tags, then merge its eligible signals
///
/// A tag rejected as a duplicate of another controller's tag keeps that
/// controller's record untouched: signals from this controller for the same
/// name are not merged into it.
pub fn register_controller(
    registry: &mut TagRegistry,
    controller: &ControllerDir,
    export: ControllerExport,
    stats: &mut ExtractionStats,
) {
    let label = controller.label();
    let mut rejected: HashSet<String> = HashSet::new();

    for row in export.tags {
        match registry.register_primary(TagRecord::from_primary(controller, row)) {
            Ok(Registration::Inserted) => stats.tags_registered += 1,
            Ok(Registration::Replaced { previous_origin }) => {
                stats.duplicate_tags += 1;
                warn!(
                    "Duplicate tag in {}: replaced record from {}",
                    label, previous_origin
                );
            }
            Err(Error::DuplicateTag {
                tag_name,
                existing,
                rejected: origin,
            }) => {
                stats.duplicate_tags += 1;
                warn!(
                    "Duplicate tag '{}': already registered from {}, rejected from {}",
                    tag_name, existing, origin
                );
                if existing != label {
                    rejected.insert(tag_name);
                }
            }
            Err(e) => warn!("Tag rejected in {}: {}", label, e),
        }
    }

    for row in export.signals {
        if !row.has_io_address() {
            stats.signals_without_address += 1;
            continue;
        }

        if rejected.contains(&row.tag_name) {
            stats.signals_for_rejected_tags += 1;
            debug!(
                "Signal for rejected duplicate {} in {} not merged",
                row.tag_name, label
            );
            continue;
        }

        match registry.merge_secondary(&row.tag_name, row.signal) {
            Ok(SignalMerge::Merged) => stats.signals_merged += 1,
            Ok(SignalMerge::AlreadyMerged) => {
                stats.signal_conflicts += 1;
                warn!(
                    "Tag {} in {} has more than one addressed signal, keeping the first",
                    row.tag_name, label
                );
            }
            Err(Error::UnknownTag { tag_name }) => {
                stats.orphan_signals += 1;
                debug!("Orphan signal for {} in {}", tag_name, label);
            }
            Err(e) => warn!("Signal rejected in {}: {}", label, e),
        }
    }
}

/// Runs the whole extraction for one configuration
pub struct Pipeline {
    config: Config,
    notifier: Arc<dyn Notifier>,
    show_progress: bool,
    run_date: NaiveDate,
}

impl Pipeline {
    /// Create a pipeline dated today
    pub fn new(config: Config, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            notifier,
            show_progress: false,
            run_date: chrono::Local::now().date_naive(),
        }
    }

    /// Show a progress bar while controllers are parsed
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Date used in the report file name
    pub fn with_run_date(mut self, run_date: NaiveDate) -> Self {
        self.run_date = run_date;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Report path this pipeline will write
    pub fn report_path(&self) -> std::path::PathBuf {
        self.config.report_path(self.run_date)
    }

    /// Discover controllers and build the registry
    pub fn extract(&self) -> Result<(TagRegistry, ExtractionStats)> {
        self.config.validate()?;

        info!("Scanning export tree: {}", self.config.export_root.display());
        let discovery = discover_controllers(&self.config.export_root)?;
        Ok(self.extract_discovered(&discovery))
    }

    fn extract_discovered(&self, discovery: &Discovery) -> (TagRegistry, ExtractionStats) {
        let mut stats = ExtractionStats {
            directories_seen: discovery.directories_seen,
            controllers_selected: discovery.controllers.len(),
            controllers_excluded: discovery.excluded.len(),
            unplaced_exports: discovery.unplaced,
            ..Default::default()
        };
        info!(
            "Found {} controller(s), {} excluded",
            stats.controllers_selected, stats.controllers_excluded
        );

        let progress_bar = self.progress_bar(discovery.controllers.len());
        let mut registry = TagRegistry::new(self.config.duplicate_tags);

        for controller in &discovery.controllers {
            if let Some(pb) = &progress_bar {
                pb.set_message(controller.label());
            }

            match load_controller(controller) {
                Ok(export) => {
                    debug!(
                        "{}: {} tags, {} signals",
                        controller.label(),
                        export.tags.len(),
                        export.signals.len()
                    );
                    register_controller(&mut registry, controller, export, &mut stats);
                    stats.controllers.push(controller.label());
                }
                Err(e) => {
                    warn!("Skipping controller {}: {}", controller.label(), e);
                    stats.controllers_failed += 1;
                    stats.failures.push(format!("{}: {}", controller.label(), e));
                }
            }

            if let Some(pb) = &progress_bar {
                pb.inc(1);
            }
        }

        if let Some(pb) = &progress_bar {
            pb.finish_and_clear();
        }

        if stats.orphan_signals > 0 {
            warn!(
                "{} signal(s) referenced tags with no tag row",
                stats.orphan_signals
            );
        }

        (registry, stats)
    }

    /// Extract only: no databases are opened and no report is written
    pub fn dry_run(&self) -> Result<RunSummary> {
        let start = Instant::now();
        let (registry, extraction) = self.extract()?;

        Ok(RunSummary {
            rows: registry.len(),
            extraction,
            elapsed: start.elapsed(),
            ..Default::default()
        })
    }

    /// Run every stage and write the report
    pub async fn run(&self) -> Result<RunSummary> {
        let start = Instant::now();
        let (mut registry, extraction) = self.extract()?;

        let mut resolver = SetpointResolver::open(&self.config.sites).await?;
        let enrichment = enrich_registry(&mut registry, &mut resolver).await;
        resolver.close().await;
        info!(
            "Enriched {} of {} eligible tag(s) with {} setpoint(s)",
            enrichment.enriched, enrichment.eligible, enrichment.setpoints_resolved
        );

        let rows = assemble_report(&registry, self.config.setpoint_layout);
        let path = self.report_path();

        let mut summary = RunSummary {
            extraction,
            enrichment,
            rows: rows.len(),
            ..Default::default()
        };

        match ReportWriter::new(self.config.report_format).write(&rows, &path) {
            Ok(()) => summary.report_path = Some(path),
            Err(e) => {
                error!("{}", e);
                self.notifier.notify_error("Error", &e.to_string());
                summary.report_error = Some(e.to_string());
            }
        }

        summary.elapsed = start.elapsed();
        info!("{}", summary.summary());
        Ok(summary)
    }

    fn progress_bar(&self, len: usize) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        Some(pb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::SignalFields;
    use std::path::PathBuf;

    fn controller(site: &str, name: &str) -> ControllerDir {
        ControllerDir {
            site_id: site.to_string(),
            controller_id: name.to_string(),
            path: PathBuf::from("unused"),
        }
    }

    fn primary(tag_name: &str) -> PrimaryRow {
        PrimaryRow {
            tag_name: tag_name.to_string(),
            comment: String::new(),
            instrument_type: "BOOL".to_string(),
            high_scale: String::new(),
            low_scale: String::new(),
            engineering_unit: String::new(),
        }
    }

    fn secondary(tag_name: &str, io_address: &str) -> SecondaryRow {
        SecondaryRow {
            tag_name: tag_name.to_string(),
            signal: SignalFields {
                io_address: io_address.to_string(),
                access_type: "DI".to_string(),
                scan_name: "SCAN".to_string(),
                conversion_type: "NONE".to_string(),
            },
        }
    }

    #[test]
    fn test_register_controller_counts_every_outcome() {
        let mut registry = TagRegistry::default();
        let mut stats = ExtractionStats::default();

        register_controller(
            &mut registry,
            &controller("S1", "C1"),
            ControllerExport {
                tags: vec![primary("T1"), primary("T2"), primary("T3")],
                signals: vec![
                    secondary("T1", "0x01"),
                    secondary("T1", "0x02"),
                    secondary("T2", ""),
                    secondary("GHOST", "0x03"),
                ],
            },
            &mut stats,
        );

        assert_eq!(stats.tags_registered, 3);
        assert_eq!(stats.signals_merged, 1);
        assert_eq!(stats.signal_conflicts, 1);
        assert_eq!(stats.signals_without_address, 1);
        assert_eq!(stats.orphan_signals, 1);

        assert_eq!(
            registry.get("T1").unwrap().signal.as_ref().unwrap().io_address,
            "0x01"
        );
        assert!(registry.get("T2").unwrap().signal.is_none());
        assert!(registry.get("T3").unwrap().signal.is_none());
    }

    #[test]
    fn test_register_controller_counts_duplicates_across_controllers() {
        let mut registry = TagRegistry::new(crate::config::DuplicateTagPolicy::Reject);
        let mut stats = ExtractionStats::default();

        for name in ["C1", "C2"] {
            register_controller(
                &mut registry,
                &controller("S1", name),
                ControllerExport {
                    tags: vec![primary("SHARED")],
                    signals: vec![],
                },
                &mut stats,
            );
        }

        assert_eq!(stats.tags_registered, 1);
        assert_eq!(stats.duplicate_tags, 1);
        assert_eq!(registry.get("SHARED").unwrap().controller_id, "C1");
    }

    #[test]
    fn test_rejected_duplicate_does_not_take_other_controllers_signal() {
        let mut registry = TagRegistry::new(crate::config::DuplicateTagPolicy::Reject);
        let mut stats = ExtractionStats::default();

        register_controller(
            &mut registry,
            &controller("S1", "C1"),
            ControllerExport {
                tags: vec![primary("T1"), primary("T2")],
                signals: vec![secondary("T2", "0x01")],
            },
            &mut stats,
        );
        register_controller(
            &mut registry,
            &controller("S1", "C2"),
            ControllerExport {
                tags: vec![primary("T1"), primary("T2")],
                signals: vec![secondary("T1", "0xC2"), secondary("T2", "0xC3")],
            },
            &mut stats,
        );

        let t1 = registry.get("T1").unwrap();
        assert_eq!(t1.origin(), "S1/C1");
        assert!(t1.signal.is_none());

        let t2 = registry.get("T2").unwrap();
        assert_eq!(t2.signal.as_ref().unwrap().io_address, "0x01");

        assert_eq!(stats.duplicate_tags, 2);
        assert_eq!(stats.signals_for_rejected_tags, 2);
        assert_eq!(stats.signals_merged, 1);
        assert_eq!(stats.signal_conflicts, 0);
    }

    #[test]
    fn test_duplicate_within_one_controller_keeps_its_signal() {
        let mut registry = TagRegistry::new(crate::config::DuplicateTagPolicy::Reject);
        let mut stats = ExtractionStats::default();

        register_controller(
            &mut registry,
            &controller("S1", "C1"),
            ControllerExport {
                tags: vec![primary("T1"), primary("T1")],
                signals: vec![secondary("T1", "0x01")],
            },
            &mut stats,
        );

        assert_eq!(stats.duplicate_tags, 1);
        assert_eq!(stats.signals_for_rejected_tags, 0);
        assert_eq!(
            registry.get("T1").unwrap().signal.as_ref().unwrap().io_address,
            "0x01"
        );
    }
}
