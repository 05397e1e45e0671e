//! Presentation order of answer records.

use std::cmp::Ordering;

use crate::models::AnswerRecord;

/// Orders answers for display: errored first, then unmatched, then by query name.
///
/// The sort is stable, so records equal on all three keys keep their order.
pub fn rank(mut answers: Vec<AnswerRecord>) -> Vec<AnswerRecord> {
    answers.sort_by(compare);
    answers
}

fn compare(a: &AnswerRecord, b: &AnswerRecord) -> Ordering {
    b.is_error()
        .cmp(&a.is_error())
        .then(a.is_match.cmp(&b.is_match))
        .then_with(|| a.query.cmp(&b.query))
}
