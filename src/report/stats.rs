//! Summary statistics over a result set.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::AnswerRecord;

/// How often one answer value was returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerFrequency {
    pub value: String,
    pub count: usize,
    /// `count` as a percentage of all records.
    pub pct: f64,
}

/// Aggregate view of a result set. Derived on demand, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub matched_pct: f64,
    pub unmatched_pct: f64,
    /// Counted independently of the match split; errored records are also unmatched.
    pub errored_pct: f64,
    /// Most common answers first.
    pub answer_frequency: Vec<AnswerFrequency>,
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Computes match/error percentages and the answer frequency table.
///
/// An empty slice yields all-zero percentages and an empty table. The table
/// counts values of non-errored records only, sorted by descending count with
/// ties kept in first-seen order.
pub fn compute_stats(answers: &[AnswerRecord]) -> Stats {
    let total = answers.len();
    let matched = answers.iter().filter(|a| a.is_match).count();
    let errored = answers.iter().filter(|a| a.is_error()).count();

    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in answers
        .iter()
        .filter(|a| !a.is_error())
        .flat_map(|a| a.raw_values.iter())
    {
        match positions.get(value.as_str()) {
            Some(&index) => counts[index].1 += 1,
            None => {
                positions.insert(value.as_str(), counts.len());
                counts.push((value.as_str(), 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    Stats {
        matched_pct: percentage(matched, total),
        unmatched_pct: percentage(total - matched, total),
        errored_pct: percentage(errored, total),
        answer_frequency: counts
            .into_iter()
            .map(|(value, count)| AnswerFrequency {
                value: value.to_string(),
                count,
                pct: percentage(count, total),
            })
            .collect(),
    }
}
