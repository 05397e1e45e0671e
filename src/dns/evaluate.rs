//! Answer evaluation.
//!
//! Turns a successful exchange into an [`AnswerRecord`] and decides whether it
//! matches what the operator expected.

use super::exchange::Exchange;
use super::records::render_record;
use crate::models::{AnswerRecord, HostRequest, RecordType};

/// Builds the answer record for a successful exchange.
pub fn evaluate(request: &HostRequest, record_type: RecordType, exchange: &Exchange) -> AnswerRecord {
    let raw_values: Vec<String> = exchange.records.iter().map(render_record).collect();
    let is_match = is_match(&raw_values, request.want.as_deref(), record_type);

    AnswerRecord {
        query: request.name.clone(),
        want: request.want.clone(),
        record_type,
        raw_values,
        response_time_ms: Some(exchange.rtt.as_secs_f64() * 1000.0),
        error: None,
        is_match,
    }
}

/// Match rule, evaluated per returned value.
///
/// A value matches when it equals `want`, when nothing is expected, or when the
/// record type is not `A` (only addresses are comparable). No values, no match.
pub fn is_match(values: &[String], want: Option<&str>, record_type: RecordType) -> bool {
    values.iter().any(|value| match want {
        _ if record_type != RecordType::A => true,
        None | Some("") => true,
        Some(want) => value == want,
    })
}
