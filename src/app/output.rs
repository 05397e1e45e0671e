//! Rendering of check results for the terminal.
//!
//! Plain output is a coloured per-host listing followed by a statistics block.
//! JSON output is a single document holding the key, the result set, its
//! statistics and any GeoIP data.

use std::collections::HashMap;
use std::fmt::Write as _;

use colored::*;
use serde::Serialize;

use crate::geoip::GeoInfo;
use crate::models::{AnswerRecord, ResultSet};
use crate::report::Stats;

/// Answer values listed in the plain frequency table.
const FREQUENCY_ROWS: usize = 10;

/// Everything printed for one result.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub key: Option<&'a str>,
    pub result: &'a ResultSet,
    pub stats: &'a Stats,
    pub geoip: &'a HashMap<String, GeoInfo>,
}

pub fn render_json(report: &Report<'_>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

fn verdict(answer: &AnswerRecord) -> ColoredString {
    let pad = |label: &str| format!("{:<9}", label);
    if answer.is_error() {
        pad("ERROR").red().bold()
    } else if answer.is_match {
        pad("MATCH").green().bold()
    } else {
        pad("MISMATCH").yellow().bold()
    }
}

fn render_answer(out: &mut String, answer: &AnswerRecord, geoip: &HashMap<String, GeoInfo>) {
    let timing = answer
        .response_time_ms
        .map(|ms| format!(" ({:.1} ms)", ms))
        .unwrap_or_default();
    let _ = writeln!(out, "{} {}{}", verdict(answer), answer.query.bold(), timing);

    if let Some(want) = &answer.want {
        let _ = writeln!(out, "          want: {}", want);
    }
    match &answer.error {
        Some(error) => {
            let _ = writeln!(out, "          error: {} ({})", error.message, error.kind);
        }
        None => {
            let _ = writeln!(out, "          got:  {}", answer.values_display());
        }
    }

    for value in &answer.raw_values {
        if let Some(info) = geoip.get(value) {
            let mut line = format!("          {}: {}", value, info.location_summary());
            if !info.reverse_hosts.is_empty() {
                let _ = write!(line, " [{}]", info.reverse_hosts.join(", "));
            }
            let _ = writeln!(out, "{}", line.dimmed());
        }
    }
}

/// Human-readable report.
pub fn render_plain(report: &Report<'_>) -> String {
    let mut out = String::new();
    let result = report.result;

    let _ = writeln!(
        out,
        "{} lookup of {} host{} at {}",
        result.record_type,
        result.answers.len(),
        if result.answers.len() == 1 { "" } else { "s" },
        result.scan_timestamp
    );
    if let Some(key) = report.key {
        let _ = writeln!(out, "Result key: {}", key.cyan());
    }
    out.push('\n');

    for answer in &result.answers {
        render_answer(&mut out, answer, report.geoip);
    }

    let stats = report.stats;
    let _ = writeln!(
        out,
        "\nMatched {:.1}%  Unmatched {:.1}%  Errored {:.1}%",
        stats.matched_pct, stats.unmatched_pct, stats.errored_pct
    );
    if !stats.answer_frequency.is_empty() {
        let _ = writeln!(out, "Most common answers:");
        for row in stats.answer_frequency.iter().take(FREQUENCY_ROWS) {
            let _ = writeln!(out, "  {:>5.1}%  {:>4}  {}", row.pct, row.count, row.value);
        }
        let hidden = stats.answer_frequency.len().saturating_sub(FREQUENCY_ROWS);
        if hidden > 0 {
            let _ = writeln!(out, "  ... and {} more", hidden);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::LookupErrorKind;
    use crate::models::{AnswerError, HostRequest, RecordType, RequestSet};
    use crate::report::compute_stats;

    fn result_set() -> ResultSet {
        let failed = AnswerRecord::failed(
            &HostRequest::new("down.example", None),
            RecordType::A,
            AnswerError {
                kind: LookupErrorKind::Timeout,
                message: "query timed out".to_string(),
            },
        );
        let ok = AnswerRecord {
            query: "up.example".to_string(),
            want: Some("10.0.0.1".to_string()),
            record_type: RecordType::A,
            raw_values: vec!["10.0.0.1".to_string()],
            response_time_ms: Some(3.25),
            error: None,
            is_match: true,
        };
        ResultSet {
            request: RequestSet::default(),
            answers: vec![failed, ok],
            record_type: "A".to_string(),
            scan_timestamp: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_plain_lists_every_answer_and_stats() {
        colored::control::set_override(false);
        let result = result_set();
        let stats = compute_stats(&result.answers);
        let mut geoip = HashMap::new();
        geoip.insert(
            "10.0.0.1".to_string(),
            GeoInfo {
                country: Some("Germany".to_string()),
                reverse_hosts: vec!["up.example".to_string()],
                ..GeoInfo::default()
            },
        );

        let text = render_plain(&Report {
            key: Some("kobatesuvri"),
            result: &result,
            stats: &stats,
            geoip: &geoip,
        });

        assert!(text.starts_with("A lookup of 2 hosts at 2024-01-01T00:00:00+00:00"));
        assert!(text.contains("Result key: kobatesuvri"));
        assert!(text.contains("ERROR     down.example"));
        assert!(text.contains("error: query timed out (Timeout)"));
        assert!(text.contains("MATCH     up.example (3.2 ms)") || text.contains("MATCH     up.example (3.3 ms)"));
        assert!(text.contains("10.0.0.1: Germany [up.example]"));
        assert!(text.contains("Matched 50.0%  Unmatched 50.0%  Errored 50.0%"));
        assert!(text.contains(" 50.0%     1  10.0.0.1"));
    }

    #[test]
    fn test_json_document_shape() {
        let result = result_set();
        let stats = compute_stats(&result.answers);
        let geoip = HashMap::new();

        let json = render_json(&Report {
            key: None,
            result: &result,
            stats: &stats,
            geoip: &geoip,
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["key"].is_null());
        assert_eq!(value["result"]["answers"].as_array().unwrap().len(), 2);
        assert_eq!(value["result"]["answers"][0]["error"]["kind"], "Timeout");
        assert_eq!(value["stats"]["matched_pct"], 50.0);
        assert!(value["geoip"].as_object().unwrap().is_empty());
    }
}
