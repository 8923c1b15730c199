//! Shared test utilities and fixtures for export parsing tests

use std::fs;
use std::path::{Path, PathBuf};


/// Header line shaped like the exporter's tags file
pub const TAGS_HEADER: &str = "TagName,Description,Alias,TagComment,InstrumentType,A,B,C,D,E,F,G,H,I,SH,SL,EU_PV";

/// Header line shaped like the exporter's signals file
pub const SIGNALS_HEADER: &str =
    "TagName,SignalName,Direction,Module,Channel,IOAddress,Rack,AccessType,ScanName,Priority,ConversionTypeName";

/// Build a 17-column tags line with the mapped columns filled in
pub fn tag_line(
    tag_name: &str,
    comment: &str,
    instrument_type: &str,
    high_scale: &str,
    low_scale: &str,
    unit: &str,
) -> String {
    let mut fields = vec![String::new(); 17];
    fields[0] = tag_name.to_string();
    fields[3] = comment.to_string();
    fields[4] = instrument_type.to_string();
    fields[14] = high_scale.to_string();
    fields[15] = low_scale.to_string();
    fields[16] = unit.to_string();
    fields.join(",")
}

/// Build an 11-column signals line with the mapped columns filled in
pub fn signal_line(
    tag_name: &str,
    io_address: &str,
    access_type: &str,
    scan_name: &str,
    conversion_type: &str,
) -> String {
    let mut fields = vec![String::new(); 11];
    fields[0] = tag_name.to_string();
    fields[5] = io_address.to_string();
    fields[7] = access_type.to_string();
    fields[8] = scan_name.to_string();
    fields[10] = conversion_type.to_string();
    fields.join(",")
}

/// Write a header plus data lines to `dir/name`
pub fn write_export(dir: &Path, name: &str, header: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut content = String::from(header);
    content.push('\n');
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(&path, content).unwrap();
    path
}
