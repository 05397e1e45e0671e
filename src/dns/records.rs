//! Display rendering of answer records.

use super::exchange::RawRecord;

/// Rendering used for record kinds the engine does not know how to show.
pub const UNKNOWN_RESPONSE: &str = "unknown response";

/// Renders one record the way it is shown and compared.
///
/// Addresses use their canonical text form, host targets drop the trailing
/// root dot and TXT segments are quoted and space-joined.
pub fn render_record(record: &RawRecord) -> String {
    match record {
        RawRecord::A(ip) => ip.to_string(),
        RawRecord::AAAA(ip) => ip.to_string(),
        RawRecord::CNAME(target) | RawRecord::NS(target) => trim_root(target).to_string(),
        RawRecord::MX { exchange, .. } => trim_root(exchange).to_string(),
        RawRecord::TXT(segments) => segments
            .iter()
            .map(|segment| format!("\"{}\"", segment))
            .collect::<Vec<_>>()
            .join(" "),
        RawRecord::Other(_) => UNKNOWN_RESPONSE.to_string(),
    }
}

/// Strips the trailing root label dot from a host name.
pub fn trim_root(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}
