//! Per-tab effective settings resolution

use crate::project::{match_url_to_project, Project};

pub const DEFAULT_AUTHOR_PORT: &str = "4502";
pub const DEFAULT_PUBLISH_PORT: &str = "4503";

/// Port defaults that apply when a project leaves a port empty.
/// Normally the built-in 4502/4503, but installations upgraded from
/// older versions may carry their own stored defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortDefaults {
    pub author: String,
    pub publish: String,
}

impl Default for PortDefaults {
    fn default() -> Self {
        PortDefaults {
            author: DEFAULT_AUTHOR_PORT.to_string(),
            publish: DEFAULT_PUBLISH_PORT.to_string(),
        }
    }
}

/// Settings in effect for one tab, every field filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveSettings {
    pub author_port: String,
    pub publish_port: String,
    pub dispatcher_url: String,
    pub org_id: String,
    pub program_id: String,
}

/// Resolve the settings in effect for the current tab.
///
/// The matched project supplies the values; with no match, the first
/// project flagged as fallback does; with neither, everything falls
/// back to the port defaults and empty strings. Ports are defaulted
/// per field, so a matched project with an empty author port still
/// yields a usable author port.
pub fn effective_settings(
    current_url: Option<&str>,
    projects: &[Project],
    defaults: &PortDefaults,
) -> EffectiveSettings {
    if let Some(url) = current_url {
        if let Some(project) = match_url_to_project(url, projects, defaults) {
            return from_project(project, defaults);
        }
    }

    if let Some(fallback) = projects.iter().find(|p| p.is_fallback) {
        return from_project(fallback, defaults);
    }

    EffectiveSettings {
        author_port: defaults.author.clone(),
        publish_port: defaults.publish.clone(),
        dispatcher_url: String::new(),
        org_id: String::new(),
        program_id: String::new(),
    }
}

fn from_project(project: &Project, defaults: &PortDefaults) -> EffectiveSettings {
    EffectiveSettings {
        author_port: project.author_port_or(defaults).to_string(),
        publish_port: project.publish_port_or(defaults).to_string(),
        dispatcher_url: project.dispatcher_url.clone(),
        org_id: project.org_id.clone(),
        program_id: project.program_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_project(name: &str, pattern: &str) -> Project {
        Project {
            id: format!("id-{name}"),
            name: name.to_string(),
            pattern: pattern.to_string(),
            dispatcher_url: format!("https://{name}.example.com"),
            org_id: format!("org-{name}"),
            ..Default::default()
        }
    }

    #[test]
    fn test_matched_project_settings() {
        let projects = vec![Project {
            author_port: "5502".to_string(),
            program_id: "12345".to_string(),
            ..create_test_project("site", "*.site.com")
        }];
        let defaults = PortDefaults::default();

        let settings = effective_settings(Some("https://www.site.com:5502"), &projects, &defaults);

        assert_eq!(settings.author_port, "5502");
        assert_eq!(settings.publish_port, "4503");
        assert_eq!(settings.dispatcher_url, "https://site.example.com");
        assert_eq!(settings.org_id, "org-site");
        assert_eq!(settings.program_id, "12345");
    }

    #[test]
    fn test_fallback_project_when_no_match() {
        let projects = vec![
            create_test_project("site", "*.site.com"),
            Project {
                is_fallback: true,
                ..create_test_project("default", "*.default.com")
            },
        ];
        let defaults = PortDefaults::default();

        let settings = effective_settings(Some("https://www.other.com"), &projects, &defaults);
        assert_eq!(settings.org_id, "org-default");
    }

    #[test]
    fn test_first_fallback_wins() {
        let projects = vec![
            Project {
                is_fallback: true,
                ..create_test_project("one", "*.one.com")
            },
            Project {
                is_fallback: true,
                ..create_test_project("two", "*.two.com")
            },
        ];
        let defaults = PortDefaults::default();

        let settings = effective_settings(None, &projects, &defaults);
        assert_eq!(settings.org_id, "org-one");
    }

    #[test]
    fn test_built_in_defaults() {
        let settings = effective_settings(Some("https://www.other.com"), &[], &PortDefaults::default());

        assert_eq!(settings.author_port, "4502");
        assert_eq!(settings.publish_port, "4503");
        assert_eq!(settings.dispatcher_url, "");
        assert_eq!(settings.org_id, "");
        assert_eq!(settings.program_id, "");
    }

    #[test]
    fn test_stored_defaults_override_built_ins() {
        let defaults = PortDefaults {
            author: "8080".to_string(),
            publish: "8081".to_string(),
        };

        let settings = effective_settings(None, &[], &defaults);
        assert_eq!(settings.author_port, "8080");
        assert_eq!(settings.publish_port, "8081");

        let projects = vec![Project {
            pattern: "localhost".to_string(),
            ..Default::default()
        }];
        let settings = effective_settings(Some("http://localhost:8080"), &projects, &defaults);
        assert_eq!(settings.author_port, "8080");
    }
}
