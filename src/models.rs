//! Data model shared by the parser, the resolution pool and the reporting code.
//!
//! - [`HostRequest`] / [`RequestSet`]: what the operator asked for
//! - [`AnswerRecord`]: one resolved (or failed) host
//! - [`ResultSet`]: a whole run, as persisted

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::error_handling::{ConfigError, LookupErrorKind};

/// DNS record types that can be queried.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Default,
)]
#[allow(clippy::upper_case_acronyms)]
pub enum RecordType {
    #[default]
    A,
    AAAA,
    CNAME,
    MX,
    NS,
    TXT,
}

impl RecordType {
    /// Parses a record type as typed by the operator.
    ///
    /// An empty string means `A`. Names are matched exactly (`"a"` is rejected).
    pub fn from_query_str(value: &str) -> Result<Self, ConfigError> {
        if value.is_empty() {
            return Ok(RecordType::A);
        }
        value
            .parse()
            .map_err(|_| ConfigError::UnknownRecordType(value.to_string()))
    }
}

/// One hostname to resolve, with the value the operator expects back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRequest {
    pub name: String,
    pub want: Option<String>,
}

impl HostRequest {
    pub fn new(name: impl Into<String>, want: Option<String>) -> Self {
        Self {
            name: name.into(),
            want: want.filter(|w| !w.is_empty()),
        }
    }
}

/// Ordered, deduplicated batch of [`HostRequest`]s produced by the host parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestSet {
    hosts: Vec<HostRequest>,
}

impl RequestSet {
    pub(crate) fn from_hosts(hosts: Vec<HostRequest>) -> Self {
        Self { hosts }
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HostRequest> {
        self.hosts.iter()
    }

    pub fn get(&self, index: usize) -> Option<&HostRequest> {
        self.hosts.get(index)
    }

    /// Renders the set back into host-file text.
    ///
    /// Parsing the returned text yields an identical set.
    pub fn to_canonical_text(&self) -> String {
        self.hosts
            .iter()
            .map(|host| match &host.want {
                Some(want) => format!("{} {}", want, host.name),
                None => host.name.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a RequestSet {
    type Item = &'a HostRequest;
    type IntoIter = std::slice::Iter<'a, HostRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.hosts.iter()
    }
}

/// Why a single host failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerError {
    pub kind: LookupErrorKind,
    pub message: String,
}

impl fmt::Display for AnswerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of resolving one [`HostRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub query: String,
    pub want: Option<String>,
    pub record_type: RecordType,
    pub raw_values: Vec<String>,
    pub response_time_ms: Option<f64>,
    pub error: Option<AnswerError>,
    pub is_match: bool,
}

impl AnswerRecord {
    /// Builds the record for a host whose lookup failed.
    ///
    /// Failed records carry no values, no timing and never match.
    pub fn failed(request: &HostRequest, record_type: RecordType, error: AnswerError) -> Self {
        Self {
            query: request.name.clone(),
            want: request.want.clone(),
            record_type,
            raw_values: Vec::new(),
            response_time_ms: None,
            error: Some(error),
            is_match: false,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Values joined for display, e.g. `"10.0.0.1, 10.0.0.2"`.
    pub fn values_display(&self) -> String {
        self.raw_values.join(", ")
    }
}

/// A complete resolution run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub request: RequestSet,
    pub answers: Vec<AnswerRecord>,
    pub record_type: String,
    pub scan_timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_record_type_empty_defaults_to_a() {
        assert_eq!(RecordType::from_query_str("").unwrap(), RecordType::A);
    }

    #[test]
    fn test_record_type_all_known_names_parse() {
        for record_type in RecordType::iter() {
            let parsed = RecordType::from_query_str(record_type.as_ref()).unwrap();
            assert_eq!(parsed, record_type);
        }
    }

    #[test]
    fn test_record_type_unknown_is_rejected() {
        let err = RecordType::from_query_str("SOA").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRecordType(ref t) if t == "SOA"));
        // exact names only
        assert!(RecordType::from_query_str("aaaa").is_err());
    }

    #[test]
    fn test_host_request_empty_want_is_none() {
        let host = HostRequest::new("example.com", Some(String::new()));
        assert!(host.want.is_none());
    }

    #[test]
    fn test_canonical_text() {
        let set = RequestSet::from_hosts(vec![
            HostRequest::new("a.example", Some("10.0.0.1".to_string())),
            HostRequest::new("b.example", None),
        ]);
        assert_eq!(set.to_canonical_text(), "10.0.0.1 a.example\nb.example");
    }

    #[test]
    fn test_failed_record_has_no_values() {
        let host = HostRequest::new("x.example", Some("10.0.0.1".to_string()));
        let record = AnswerRecord::failed(
            &host,
            RecordType::A,
            AnswerError {
                kind: LookupErrorKind::Timeout,
                message: "timed out".to_string(),
            },
        );
        assert!(record.is_error());
        assert!(record.raw_values.is_empty());
        assert!(record.response_time_ms.is_none());
        assert!(!record.is_match);
        assert_eq!(record.want.as_deref(), Some("10.0.0.1"));
    }
}
