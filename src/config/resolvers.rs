//! Named resolver groups.
//!
//! Without custom resolvers the groups are `Local Resolvers` (from
//! `/etc/resolv.conf`), `Google DNS` and `OpenDNS`. With custom resolvers
//! there is a single `Custom` group.

use crate::config::constants::{
    CUSTOM_GROUP, GOOGLE_DNS_GROUP, GOOGLE_DNS_SERVERS, LOCAL_RESOLVERS_GROUP, OPENDNS_GROUP,
    OPENDNS_SERVERS, RESOLV_CONF_PATH,
};
use crate::error_handling::ConfigError;

/// Extracts `nameserver` addresses from resolv.conf text.
pub fn parse_resolv_conf(contents: &str) -> Vec<String> {
    contents
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some("nameserver"), Some(ip)) => Some(ip.to_string()),
                _ => None,
            }
        })
        .collect()
}

/// Ordered set of named resolver lists.
#[derive(Debug, Clone, Default)]
pub struct ResolverGroups {
    groups: Vec<(String, Vec<String>)>,
}

impl ResolverGroups {
    /// Local resolvers from resolv.conf text, followed by the public groups.
    ///
    /// The local group is left out when the text names no nameserver.
    pub fn from_resolv_conf(contents: &str) -> Self {
        let mut groups = Vec::with_capacity(3);

        let local = parse_resolv_conf(contents);
        if local.is_empty() {
            log::warn!("No nameservers found in resolv.conf, local resolvers unavailable");
        } else {
            groups.push((LOCAL_RESOLVERS_GROUP.to_string(), local));
        }

        groups.push((
            GOOGLE_DNS_GROUP.to_string(),
            GOOGLE_DNS_SERVERS.iter().map(|s| s.to_string()).collect(),
        ));
        groups.push((
            OPENDNS_GROUP.to_string(),
            OPENDNS_SERVERS.iter().map(|s| s.to_string()).collect(),
        ));

        Self { groups }
    }

    /// Groups built from the system's `/etc/resolv.conf`.
    pub fn system() -> Self {
        let contents = std::fs::read_to_string(RESOLV_CONF_PATH).unwrap_or_else(|e| {
            log::warn!("Unable to read {}: {}", RESOLV_CONF_PATH, e);
            String::new()
        });
        Self::from_resolv_conf(&contents)
    }

    /// A single `Custom` group.
    pub fn custom(servers: Vec<String>) -> Self {
        Self {
            groups: vec![(CUSTOM_GROUP.to_string(), servers)],
        }
    }

    /// Custom group when `servers` is non-empty, system groups otherwise.
    pub fn resolve(servers: &[String]) -> Self {
        if servers.is_empty() {
            Self::system()
        } else {
            Self::custom(servers.to_vec())
        }
    }

    /// Resolver addresses of a group.
    pub fn get(&self, name: &str) -> Result<&[String], ConfigError> {
        self.groups
            .iter()
            .find(|(group, _)| group == name)
            .map(|(_, servers)| servers.as_slice())
            .ok_or_else(|| ConfigError::UnknownResolverGroup(name.to_string()))
    }

    /// Group used when none is named.
    pub fn default_group(&self) -> Option<&str> {
        self.groups.first().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(name, servers)| (name.as_str(), servers.as_slice()))
    }
}
