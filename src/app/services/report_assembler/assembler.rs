//! Flattening of tag records into report rows

use crate::app::models::{ReportRow, TagRecord};
use crate::app::services::tag_registry::TagRegistry;
use crate::config::SetpointLayout;
use crate::constants::{REPORT_BASE_COLUMNS, REPORT_COLUMNS};

/// One report row per registry entry, in registry order
pub fn assemble_report(registry: &TagRegistry, layout: SetpointLayout) -> Vec<ReportRow> {
    registry.iter().map(|tag| report_row(tag, layout)).collect()
}

/// Project one tag onto the report columns
///
/// The twelve tag and signal cells are always present; signal cells are
/// blank when no signal was merged. With [`SetpointLayout::Named`] the row is
/// full width and each setpoint sits under its own column. With
/// [`SetpointLayout::Positional`] the resolved values follow the base cells
/// in the order the store returned them and the row is only as wide as that.
pub fn report_row(tag: &TagRecord, layout: SetpointLayout) -> ReportRow {
    let mut cells: Vec<Option<String>> = Vec::with_capacity(REPORT_COLUMNS.len());

    cells.push(Some(tag.site_id.clone()));
    cells.push(Some(tag.controller_id.clone()));
    cells.push(Some(tag.tag_name.clone()));
    cells.push(Some(tag.comment.clone()));
    cells.push(Some(tag.instrument_type.clone()));
    cells.push(Some(tag.low_scale.clone()));
    cells.push(Some(tag.high_scale.clone()));
    cells.push(Some(tag.engineering_unit.clone()));

    match &tag.signal {
        Some(signal) => {
            cells.push(Some(signal.io_address.clone()));
            cells.push(Some(signal.access_type.clone()));
            cells.push(Some(signal.scan_name.clone()));
            cells.push(Some(signal.conversion_type.clone()));
        }
        None => cells.extend(std::iter::repeat_n(None, 4)),
    }
    debug_assert_eq!(cells.len(), REPORT_BASE_COLUMNS);

    match layout {
        SetpointLayout::Named => {
            let mut trailing = [None, None, None, None];
            if let Some(setpoints) = &tag.setpoints {
                for (name, value) in setpoints.in_resolved_order() {
                    trailing[name.column_offset()] = Some(value.to_string());
                }
            }
            cells.extend(trailing);
        }
        SetpointLayout::Positional => {
            if let Some(setpoints) = &tag.setpoints {
                cells.extend(
                    setpoints
                        .in_resolved_order()
                        .map(|(_, value)| Some(value.to_string())),
                );
            }
        }
    }

    ReportRow::new(cells)
}
