//! Author/publish instance classification

use url::Url;

use crate::cloud::parse_instance_host;
use crate::settings::{EffectiveSettings, DEFAULT_AUTHOR_PORT, DEFAULT_PUBLISH_PORT};

/// Hostnames treated as local AEM instances.
pub const LOOPBACK_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// The role an AEM instance plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemType {
    Author,
    Publish,
}

impl SystemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemType::Author => "author",
            SystemType::Publish => "publish",
        }
    }
}

pub fn is_loopback_host(host: &str) -> bool {
    LOOPBACK_HOSTS.contains(&host)
}

/// Classify a URL as author or publish.
///
/// Loopback hosts are classified by exact string comparison of the URL
/// port against the configured (or default) author/publish ports. Other
/// hosts are classified by the cloud instance hostname convention.
pub fn system_type(url: &str, settings: Option<&EffectiveSettings>) -> Option<SystemType> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;

    if is_loopback_host(host) {
        let port = parsed.port().map(|p| p.to_string())?;
        let author_port = settings
            .map(|s| s.author_port.as_str())
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_AUTHOR_PORT);
        let publish_port = settings
            .map(|s| s.publish_port.as_str())
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PUBLISH_PORT);

        if port == author_port {
            return Some(SystemType::Author);
        }
        if port == publish_port {
            return Some(SystemType::Publish);
        }
        return None;
    }

    parse_instance_host(host).map(|instance| instance.role)
}

/// True for loopback hosts and cloud instance hostnames. Every instance
/// quick link checks this before deriving a destination.
pub fn is_aem_instance(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };

    is_loopback_host(host) || parse_instance_host(host).is_some()
}
