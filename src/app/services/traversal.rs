//! Controller discovery in the export tree
//!
//! Export trees look like this:
//! ```text
//! export_root/
//!   SITE_A/
//!     CTRL01/
//!       Signals_1.csv
//!       Tags_1.csv
//!     RTU01/          (excluded: one tag, many signals)
//!       Signals_1.csv
//!       Tags_1.csv
//!     docs/           (ignored: other files)
//!   SITE_B/
//!     AREA1/
//!       CTRL07/       (site SITE_B, controller CTRL07)
//!   CTRL09/           (no site, controller CTRL09)
//! ```
//!
//! A directory is a controller when its own files are exactly the tags and
//! signals exports. The first path segment below the root names the site and
//! the directory's own name names the controller. A controller directly below
//! the root has an empty site, so its setpoints cannot be resolved. Exports
//! lying in the root itself belong to no controller and are counted as
//! unplaced. Everything else is skipped without complaint.

use std::collections::BTreeSet;
use std::path::{Component, Path};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::app::models::ControllerDir;
use crate::constants::{EXCLUDED_CONTROLLER_PREFIX, SIGNALS_FILE_NAME, TAGS_FILE_NAME};
use crate::error::{Error, Result};

/// Result of walking the export tree
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Controllers to extract, in path order
    pub controllers: Vec<ControllerDir>,
    /// Directories with the export files whose name carries the excluded prefix
    pub excluded: Vec<ControllerDir>,
    /// Directories visited
    pub directories_seen: usize,
    /// Entries that could not be read during the walk
    pub unreadable: usize,
    /// Export files found in the root itself, outside any controller directory
    pub unplaced: usize,
}

/// Walk `export_root` and classify every directory
///
/// Only a missing or unreadable root is an error; unreadable entries below
/// it are logged and counted.
pub fn discover_controllers(export_root: &Path) -> Result<Discovery> {
    if !export_root.is_dir() {
        return Err(Error::configuration(format!(
            "Export root is not a directory: {}",
            export_root.display()
        )));
    }

    let mut discovery = Discovery::default();

    for entry in WalkDir::new(export_root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(Error::directory_traversal(
                    format!("Cannot read export root {}", export_root.display()),
                    e,
                ));
            }
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                discovery.unreadable += 1;
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }
        discovery.directories_seen += 1;

        match has_export_files(entry.path()) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!("Cannot list {}: {}", entry.path().display(), e);
                discovery.unreadable += 1;
                continue;
            }
        }

        let Some(controller) = controller_identity(export_root, entry.path()) else {
            warn!(
                "Ignoring export files in the export root itself: {}",
                entry.path().display()
            );
            discovery.unplaced += 1;
            continue;
        };

        if controller.site_id.is_empty() {
            warn!(
                "Controller {} sits directly below the export root and has no site",
                controller.controller_id
            );
        }

        if is_excluded_controller(&controller.controller_id) {
            debug!("Excluding multi-signal controller {}", controller.label());
            discovery.excluded.push(controller);
        } else {
            debug!("Selected controller {}", controller.label());
            discovery.controllers.push(controller);
        }
    }

    Ok(discovery)
}

/// Site and controller names for a directory below the root
///
/// The site is empty for a directory directly below the root. The root
/// itself, or a path outside it, has no identity.
pub fn controller_identity(export_root: &Path, dir: &Path) -> Option<ControllerDir> {
    let relative = dir.strip_prefix(export_root).ok()?;
    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let controller_id = segments.last()?.clone();
    let site_id = if segments.len() > 1 {
        segments[0].clone()
    } else {
        String::new()
    };

    Some(ControllerDir {
        site_id,
        controller_id,
        path: dir.to_path_buf(),
    })
}

/// Whether the directory's own files are exactly the two export files
pub fn has_export_files(dir: &Path) -> std::io::Result<bool> {
    let mut files = BTreeSet::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }

    let expected: BTreeSet<String> = [SIGNALS_FILE_NAME, TAGS_FILE_NAME]
        .iter()
        .map(|name| name.to_string())
        .collect();
    Ok(files == expected)
}

/// Controllers named with the excluded prefix are never extracted
pub fn is_excluded_controller(controller_id: &str) -> bool {
    controller_id.starts_with(EXCLUDED_CONTROLLER_PREFIX)
}
