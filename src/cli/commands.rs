//! Command implementations for the UGS Extract CLI
//!
//! This module wires logging, layered configuration and the pipeline
//! together, then prints the end-of-run report.

use crate::app::adapters::notifier::ConsoleNotifier;
use crate::app::services::pipeline::{Pipeline, RunSummary};
use crate::cli::args::Args;
use crate::config::Config;
use crate::constants::DEFAULT_CONFIG_FILE_NAME;
use crate::Result;
use colored::Colorize;
use indicatif::HumanDuration;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Main command runner for UGS Extract
///
/// 1. Set up logging and configuration
/// 2. Run the pipeline, or only its extraction stage for a dry run
/// 3. Print the summary
pub async fn run(args: Args) -> Result<RunSummary> {
    setup_logging(&args)?;

    info!("Starting UGS extract");
    debug!("Command line arguments: {:?}", args);

    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    let pipeline =
        Pipeline::new(config, Arc::new(ConsoleNotifier)).with_progress(args.show_progress());

    if args.dry_run {
        let summary = pipeline.dry_run()?;
        print_dry_run(&pipeline, &summary);
        return Ok(summary);
    }

    let summary = pipeline.run().await?;
    print_final_report(&summary);
    Ok(summary)
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ugs_extract={}", log_level)));

    let layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    let initialised = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_timer(fmt::time::uptime()))
            .try_init()
    };
    initialised
        .map_err(|e| crate::Error::configuration(format!("Cannot initialise logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using layered approach (defaults -> file -> args)
pub fn load_configuration(args: &Args) -> Result<Config> {
    let default_path = Path::new(DEFAULT_CONFIG_FILE_NAME);

    let config_file = match &args.config_file {
        Some(path) => Some(path.as_path()),
        None => Some(default_path).filter(|path| path.exists()),
    };

    let mut config = match config_file {
        Some(path) => {
            info!("Using config file: {}", path.display());
            Config::from_toml_file(path)?
        }
        None => {
            info!("No config file found, using defaults");
            Config::default()
        }
    };

    apply_cli_overrides(&mut config, args);
    config.validate()?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
fn apply_cli_overrides(config: &mut Config, args: &Args) {
    if let Some(export_root) = &args.export_root {
        config.export_root = export_root.clone();
    }
    for site in &args.sites {
        config
            .sites
            .insert(site.site_id.clone(), site.store_path.clone());
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(format) = args.format {
        config.report_format = format;
    }
    if let Some(layout) = args.setpoint_layout {
        config.setpoint_layout = layout;
    }
    if let Some(policy) = args.duplicate_tags {
        config.duplicate_tags = policy;
    }
}

fn print_dry_run(pipeline: &Pipeline, summary: &RunSummary) {
    let extraction = &summary.extraction;

    println!("\n{}", "Dry run: nothing written".bold());
    println!("   • Export root: {}", pipeline.config().export_root.display());
    println!(
        "   • Controllers: {} selected, {} excluded, {} failed",
        extraction.controllers_selected,
        extraction.controllers_excluded,
        extraction.controllers_failed
    );
    for label in &extraction.controllers {
        println!("       {}", label);
    }
    println!("   • Tags: {}", extraction.tags_registered);
    println!("   • Report would be: {}", pipeline.report_path().display());
    print_failures(&extraction.failures);
    println!();
}

fn print_final_report(summary: &RunSummary) {
    let extraction = &summary.extraction;
    let enrichment = &summary.enrichment;

    if summary.report_written() {
        println!("\n{}", "UGS extract complete".green().bold());
    } else {
        println!("\n{}", "UGS extract finished without a report".yellow().bold());
    }

    println!(
        "   • Controllers: {} selected, {} excluded, {} failed",
        extraction.controllers_selected,
        extraction.controllers_excluded,
        extraction.controllers_failed
    );
    println!(
        "   • Tags: {} ({} duplicate rows)",
        extraction.tags_registered, extraction.duplicate_tags
    );
    println!(
        "   • Signals: {} merged, {} orphaned, {} conflicting, {} for rejected tags",
        extraction.signals_merged,
        extraction.orphan_signals,
        extraction.signal_conflicts,
        extraction.signals_for_rejected_tags
    );
    println!(
        "   • Setpoints: {} of {} eligible tags enriched, {} unknown site, {} query failures",
        enrichment.enriched, enrichment.eligible, enrichment.unknown_site, enrichment.query_failures
    );
    println!("   • Rows: {}", summary.rows);
    println!("   • Time: {}", HumanDuration(summary.elapsed));

    if let Some(path) = &summary.report_path {
        println!("   • Report: {}", path.display().to_string().cyan());
    }
    print_failures(&extraction.failures);
    println!();
}

fn print_failures(failures: &[String]) {
    if failures.is_empty() {
        return;
    }
    println!("{}", format!("Skipped controllers: {}", failures.len()).yellow());
    for failure in failures {
        println!("   • {}", failure);
    }
}
