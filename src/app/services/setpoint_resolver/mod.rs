//! Setpoint resolution from per-site tuning-parameter databases
//!
//! Tags of the setpoint-carrying instrument type have their LL, PL, PH and
//! HH values looked up in the tuning database of the tag's site. Values are
//! assigned by item name, never by row position, so a tag with only some of
//! its setpoints recorded still gets each value under the right name.
//!
//! - [`store`] - One read-only SQLite connection per site
//! - [`enrichment`] - Applies resolution to every eligible registry entry
//!
//! Connections are held for the whole query phase and must be released with
//! [`SetpointResolver::close`] on every exit path.

use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::app::models::{SetpointName, Setpoints, TagRecord};
use crate::error::{Error, Result};

pub mod enrichment;
pub mod store;

#[cfg(test)]
pub mod tests;

pub use enrichment::{EnrichmentStats, enrich_registry};
pub use store::{SiteStore, StoredSetpoint};

/// Routes setpoint queries to the store configured for each site
#[derive(Debug, Default)]
pub struct SetpointResolver {
    stores: BTreeMap<String, SiteStore>,
}

impl SetpointResolver {
    /// Open one connection per configured site
    ///
    /// Fails on the first store that cannot be opened; stores opened before
    /// it are closed before the error is returned.
    pub async fn open(sites: &BTreeMap<String, PathBuf>) -> Result<Self> {
        let mut resolver = Self::default();

        for (site_id, path) in sites {
            match SiteStore::open(site_id, path).await {
                Ok(store) => {
                    resolver.stores.insert(site_id.clone(), store);
                }
                Err(e) => {
                    resolver.close().await;
                    return Err(e);
                }
            }
        }

        info!("Opened {} tuning database(s)", resolver.stores.len());
        Ok(resolver)
    }

    pub fn has_site(&self, site_id: &str) -> bool {
        self.stores.contains_key(site_id)
    }

    pub fn site_count(&self) -> usize {
        self.stores.len()
    }

    /// Setpoints for an eligible tag; `None` when the tag is not eligible
    pub async fn resolve(&mut self, tag: &TagRecord) -> Result<Option<Setpoints>> {
        if !tag.is_setpoint_eligible() {
            return Ok(None);
        }
        self.resolve_for(&tag.site_id, &tag.tag_name).await.map(Some)
    }

    /// Setpoints recorded for `tag_name` in the store of `site_id`
    pub async fn resolve_for(&mut self, site_id: &str, tag_name: &str) -> Result<Setpoints> {
        let store = self
            .stores
            .get_mut(site_id)
            .ok_or_else(|| Error::UnknownSite {
                site_id: site_id.to_string(),
            })?;

        let mut setpoints = Setpoints::new();
        for stored in store.fetch_setpoints(tag_name).await? {
            let name: SetpointName = match stored.item_name.parse() {
                Ok(name) => name,
                Err(e) => {
                    warn!("Tag {} at {}: {}", tag_name, site_id, e);
                    continue;
                }
            };

            let Some(value) = stored.value else {
                debug!("Tag {} at {}: {} is NULL, skipping", tag_name, site_id, name);
                continue;
            };

            if !setpoints.insert(name, value) {
                warn!(
                    "Tag {} at {}: repeated {} item, keeping the first value",
                    tag_name, site_id, name
                );
            }
        }

        debug!(
            "Resolved {} setpoint(s) for {} at {}",
            setpoints.len(),
            tag_name,
            site_id
        );
        Ok(setpoints)
    }

    /// Close every connection
    pub async fn close(self) {
        for (_, store) in self.stores {
            store.close().await;
        }
    }
}
