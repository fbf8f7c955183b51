//! Which upstream targets the relay will fetch.
//!
//! With no allow-list configured the relay fetches any URL it is given.

use url::Url;

use crate::config::UpstreamConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
enum HostPattern {
    /// `example.com` matches only `example.com`.
    Exact(String),
    /// `.example.com` matches `example.com` and any subdomain of it.
    Domain(String),
}

impl HostPattern {
    fn parse(raw: &str) -> Option<Self> {
        let host = raw.trim().trim_end_matches('.').to_ascii_lowercase();
        match host.strip_prefix('.') {
            Some("") => None,
            Some(domain) => Some(Self::Domain(domain.to_string())),
            None if host.is_empty() => None,
            None => Some(Self::Exact(host)),
        }
    }

    fn matches(&self, host: &str) -> bool {
        match self {
            Self::Exact(expected) => host == expected,
            Self::Domain(domain) => {
                host == domain
                    || host
                        .strip_suffix(domain.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'))
            }
        }
    }
}

/// Host allow-list for upstream targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostAllowList {
    patterns: Vec<HostPattern>,
}

impl HostAllowList {
    /// Build from config entries. Blank entries are ignored.
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: hosts
                .into_iter()
                .filter_map(|h| HostPattern::parse(h.as_ref()))
                .collect(),
        }
    }

    /// True when no restriction applies.
    pub fn is_open(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether `target` may be fetched.
    ///
    /// When restricted, a target without a parseable host is refused.
    pub fn permits(&self, target: &str) -> bool {
        if self.is_open() {
            return true;
        }
        let Ok(url) = Url::parse(target) else {
            return false;
        };
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.patterns.iter().any(|p| p.matches(&host))
    }
}

/// Per-request policy derived from [`UpstreamConfig`].
#[derive(Debug, Clone)]
pub struct UpstreamPolicy {
    pub allow: HostAllowList,
    pub expose_transport_errors: bool,
}

impl From<&UpstreamConfig> for UpstreamPolicy {
    fn from(config: &UpstreamConfig) -> Self {
        Self {
            allow: HostAllowList::new(&config.allowed_hosts),
            expose_transport_errors: config.expose_transport_errors,
        }
    }
}
