//! Host list parsing.
//!
//! Turns free-form operator input into a validated [`RequestSet`]. Each line is
//! `[expected-ipv4] domain [domain ...]`; domains on the same line share the
//! expected address.
//!
//! Parsing is all-or-nothing: one bad line rejects the whole batch. Lines
//! containing a wildcard label (`*.`) cannot be checked and are skipped.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error_handling::InputError;
use crate::models::{HostRequest, RequestSet};

/// Optional IPv4 prefix followed by the domain list.
static RAW_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<ip>\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})\s+)?(?P<domains>[A-Za-z0-9_.\s-]+)$",
    )
    .expect("host line pattern is valid")
});

/// Strict domain name: at least one leading character, a dot, then a 2-63
/// character alphanumeric final label.
static DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]{1,350}\.[A-Za-z0-9]{2,63}$").expect("domain pattern is valid")
});

static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n\r]+").expect("line break pattern is valid"));

const WILDCARD_LABEL: &str = "*.";

/// Returns true when `name` is acceptable as a lookup target.
pub fn is_valid_domain(name: &str) -> bool {
    DOMAIN.is_match(name)
}

/// Parses raw host text into a deduplicated request set.
///
/// # Errors
///
/// Returns [`InputError::Malformed`] with the (1-based) logical line number of
/// the first line that does not follow the grammar.
pub fn parse_hosts(raw: &str) -> Result<RequestSet, InputError> {
    let normalized = LINE_BREAKS.replace_all(raw.trim(), "\n");

    let mut seen: HashSet<String> = HashSet::new();
    let mut hosts = Vec::new();

    for (index, line) in normalized.split('\n').enumerate() {
        let line_number = index + 1;

        if line.contains(WILDCARD_LABEL) {
            log::debug!("Skipping wildcard line {}: {}", line_number, line.trim());
            continue;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let captures = RAW_LINE
            .captures(line)
            .ok_or(InputError::Malformed { line: line_number })?;
        let want = captures.name("ip").map(|ip| ip.as_str().to_string());
        let domains = captures
            .name("domains")
            .map(|domains| domains.as_str())
            .unwrap_or_default();

        for domain in domains.split(' ') {
            if !is_valid_domain(domain) {
                return Err(InputError::Malformed { line: line_number });
            }

            if !seen.insert(domain.to_string()) {
                continue;
            }

            hosts.push(HostRequest::new(domain, want.clone()));
        }
    }

    log::debug!("Parsed {} unique hosts", hosts.len());
    Ok(RequestSet::from_hosts(hosts))
}
