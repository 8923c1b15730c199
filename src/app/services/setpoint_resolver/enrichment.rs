//! Setpoint enrichment of registry entries
//!
//! Walks the setpoint-eligible tags in registry order and attaches whatever
//! the site's store holds for them. Failures are per tag: a tag whose site
//! has no store, or whose query fails, is left without setpoints and the run
//! carries on.

use tracing::{debug, warn};

use super::SetpointResolver;
use crate::app::models::TagRecord;
use crate::app::services::tag_registry::TagRegistry;
use crate::error::Error;

/// Counters for one enrichment pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentStats {
    /// Tags of the setpoint-carrying instrument type
    pub eligible: usize,
    /// Tags that received at least one setpoint
    pub enriched: usize,
    /// Total setpoint values attached
    pub setpoints_resolved: usize,
    /// Eligible tags with no rows in their store
    pub without_setpoints: usize,
    /// Eligible tags whose site has no configured store
    pub unknown_site: usize,
    /// Eligible tags whose query failed
    pub query_failures: usize,
}

/// Attach setpoints to every eligible tag in `registry`
pub async fn enrich_registry(
    registry: &mut TagRegistry,
    resolver: &mut SetpointResolver,
) -> EnrichmentStats {
    let mut stats = EnrichmentStats::default();

    let eligible: Vec<(String, String)> = registry
        .filter(TagRecord::is_setpoint_eligible)
        .map(|tag| (tag.tag_name.clone(), tag.site_id.clone()))
        .collect();
    stats.eligible = eligible.len();

    for (tag_name, site_id) in eligible {
        match resolver.resolve_for(&site_id, &tag_name).await {
            Ok(setpoints) if setpoints.is_empty() => {
                debug!("No setpoints recorded for {} at {}", tag_name, site_id);
                stats.without_setpoints += 1;
            }
            Ok(setpoints) => {
                stats.enriched += 1;
                stats.setpoints_resolved += setpoints.len();
                if let Some(tag) = registry.get_mut(&tag_name) {
                    tag.setpoints = Some(setpoints);
                }
            }
            Err(Error::UnknownSite { site_id }) => {
                debug!("No store for site {}, skipping {}", site_id, tag_name);
                stats.unknown_site += 1;
            }
            Err(e) => {
                warn!("Skipping setpoints for {}: {}", tag_name, e);
                stats.query_failures += 1;
            }
        }
    }

    if stats.unknown_site > 0 {
        warn!(
            "{} eligible tag(s) belong to sites without a tuning database",
            stats.unknown_site
        );
    }

    stats
}
