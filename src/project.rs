//! Project records and URL-to-project matching

use serde::{Deserialize, Serialize};
use url::Url;

use crate::instance::is_loopback_host;
use crate::pattern::matches_pattern;
use crate::settings::PortDefaults;

/// A configured AEM project.
///
/// Any field except `id`, `name`, and `pattern` may be left empty, in
/// which case built-in defaults apply where one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Hostname pattern, `*` matching one label segment.
    pub pattern: String,
    pub author_port: String,
    pub publish_port: String,
    pub dispatcher_url: String,
    pub org_id: String,
    pub program_id: String,
    /// At most one project should carry this flag; the first one found
    /// wins when several do.
    pub is_fallback: bool,
}

impl Project {
    pub fn author_port_or<'a>(&'a self, defaults: &'a PortDefaults) -> &'a str {
        if self.author_port.is_empty() {
            &defaults.author
        } else {
            &self.author_port
        }
    }

    pub fn publish_port_or<'a>(&'a self, defaults: &'a PortDefaults) -> &'a str {
        if self.publish_port.is_empty() {
            &defaults.publish
        } else {
            &self.publish_port
        }
    }
}

/// Find the first project whose pattern matches the URL's hostname.
///
/// Projects are scanned in list order and the first match wins, so the
/// list's ordering is the user's priority ranking. On loopback hosts
/// several projects typically share a pattern and only differ by port,
/// so a URL with an explicit port must also match the project's author
/// or publish port (defaults applied) for the project to count. URLs
/// without an explicit port skip the port check.
pub fn match_url_to_project<'a>(
    url: &str,
    projects: &'a [Project],
    defaults: &PortDefaults,
) -> Option<&'a Project> {
    if url.is_empty() || projects.is_empty() {
        return None;
    }

    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let port = parsed.port().map(|p| p.to_string());

    for project in projects {
        if !matches_pattern(host, &project.pattern) {
            continue;
        }

        if is_loopback_host(host) {
            if let Some(port) = port.as_deref() {
                if port != project.author_port_or(defaults)
                    && port != project.publish_port_or(defaults)
                {
                    continue;
                }
            }
        }

        return Some(project);
    }

    None
}
