//! Persisted settings and their mutations

use serde::{Deserialize, Serialize};
use url::Url;

use crate::project::Project;
use crate::settings::{PortDefaults, DEFAULT_AUTHOR_PORT, DEFAULT_PUBLISH_PORT};

/// Everything the extension persists in synced browser storage.
///
/// Older versions stored two bare port values instead of projects;
/// those keys are still read and act as the port defaults, so an
/// upgraded installation keeps its ports until projects take over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredSettings {
    pub projects: Vec<Project>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_port: Option<String>,
}

impl StoredSettings {
    pub fn new() -> Self {
        StoredSettings::default()
    }

    /// Port defaults for this installation, legacy keys included.
    pub fn port_defaults(&self) -> PortDefaults {
        PortDefaults {
            author: self
                .author_port
                .clone()
                .filter(|port| !port.is_empty())
                .unwrap_or_else(|| DEFAULT_AUTHOR_PORT.to_string()),
            publish: self
                .publish_port
                .clone()
                .filter(|port| !port.is_empty())
                .unwrap_or_else(|| DEFAULT_PUBLISH_PORT.to_string()),
        }
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Insert a project, or replace the one sharing its id.
    pub fn upsert_project(&mut self, project: Project) {
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => {
                // Fallback is toggled separately; edits keep the current flag.
                let is_fallback = existing.is_fallback;
                *existing = project;
                existing.is_fallback = is_fallback;
            }
            None => self.projects.push(project),
        }
    }

    pub fn remove_project(&mut self, id: &str) -> bool {
        let original_len = self.projects.len();
        self.projects.retain(|p| p.id != id);
        self.projects.len() < original_len
    }

    /// Move a project up or down the priority order, clamped to the
    /// list bounds. Returns whether anything moved.
    pub fn move_project(&mut self, id: &str, delta: isize) -> bool {
        let Some(from) = self.projects.iter().position(|p| p.id == id) else {
            return false;
        };

        let to = from
            .saturating_add_signed(delta)
            .min(self.projects.len() - 1);
        if to == from {
            return false;
        }

        let project = self.projects.remove(from);
        self.projects.insert(to, project);
        true
    }

    /// Flag a project as the fallback. Enabling clears the flag on
    /// every other project so at most one carries it.
    pub fn set_fallback(&mut self, id: &str, enabled: bool) -> bool {
        if self.project(id).is_none() {
            return false;
        }

        for project in &mut self.projects {
            if project.id == id {
                project.is_fallback = enabled;
            } else if enabled {
                project.is_fallback = false;
            }
        }
        true
    }
}

/// Empty is allowed and means "use the default port".
pub fn is_valid_port(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return true;
    }

    matches!(value.parse::<u32>(), Ok(port) if (1..=65535).contains(&port))
}

/// Empty is allowed and means "not configured".
pub fn is_valid_url(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return true;
    }

    matches!(Url::parse(value), Ok(parsed) if parsed.scheme().starts_with("http"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_settings() -> StoredSettings {
        let mut settings = StoredSettings::new();
        for name in ["one", "two", "three"] {
            settings.upsert_project(Project {
                id: format!("id-{name}"),
                name: name.to_string(),
                pattern: "localhost".to_string(),
                ..Default::default()
            });
        }
        settings
    }

    fn project_order(settings: &StoredSettings) -> Vec<&str> {
        settings.projects.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_port_defaults() {
        assert_eq!(StoredSettings::new().port_defaults(), PortDefaults::default());

        let settings = StoredSettings {
            author_port: Some("8080".to_string()),
            publish_port: Some("".to_string()),
            ..Default::default()
        };
        let defaults = settings.port_defaults();

        assert_eq!(defaults.author, "8080");
        assert_eq!(defaults.publish, "4503");
    }

    #[test]
    fn test_upsert_project_inserts_and_replaces() {
        let mut settings = create_test_settings();
        assert_eq!(settings.projects.len(), 3);

        settings.upsert_project(Project {
            id: "id-two".to_string(),
            name: "renamed".to_string(),
            ..Default::default()
        });

        assert_eq!(settings.projects.len(), 3);
        assert_eq!(project_order(&settings), vec!["one", "renamed", "three"]);
    }

    #[test]
    fn test_upsert_project_keeps_fallback_flag() {
        let mut settings = create_test_settings();
        settings.set_fallback("id-two", true);

        settings.upsert_project(Project {
            id: "id-two".to_string(),
            name: "renamed".to_string(),
            ..Default::default()
        });

        assert!(settings.project("id-two").unwrap().is_fallback);
    }

    #[test]
    fn test_remove_project() {
        let mut settings = create_test_settings();

        assert!(settings.remove_project("id-two"));
        assert_eq!(project_order(&settings), vec!["one", "three"]);
        assert!(!settings.remove_project("id-two"));
    }

    #[test]
    fn test_move_project() {
        let mut settings = create_test_settings();

        assert!(settings.move_project("id-three", -1));
        assert_eq!(project_order(&settings), vec!["one", "three", "two"]);

        assert!(settings.move_project("id-one", 1));
        assert_eq!(project_order(&settings), vec!["three", "one", "two"]);
    }

    #[test]
    fn test_move_project_clamps_at_bounds() {
        let mut settings = create_test_settings();

        assert!(!settings.move_project("id-one", -1));
        assert!(!settings.move_project("id-three", 1));
        assert!(!settings.move_project("missing", 1));
        assert_eq!(project_order(&settings), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_set_fallback_clears_others() {
        let mut settings = create_test_settings();

        assert!(settings.set_fallback("id-one", true));
        assert!(settings.set_fallback("id-three", true));

        let flags: Vec<bool> = settings.projects.iter().map(|p| p.is_fallback).collect();
        assert_eq!(flags, vec![false, false, true]);

        assert!(settings.set_fallback("id-three", false));
        assert!(settings.projects.iter().all(|p| !p.is_fallback));
        assert!(!settings.set_fallback("missing", true));
    }

    #[test]
    fn test_serde_project_shape() {
        assert_eq!(
            serde_json::to_string(&StoredSettings::new()).unwrap(),
            r#"{"projects":[]}"#
        );

        let mut settings = StoredSettings::new();
        settings.upsert_project(Project {
            id: "p1".to_string(),
            name: "Site".to_string(),
            pattern: "*.example.com".to_string(),
            ..Default::default()
        });

        let json = serde_json::to_string(&settings).unwrap();
        let restored: StoredSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, restored);
    }

    #[test]
    fn test_serde_legacy_shape() {
        let json = r#"{"authorPort":"8080","publishPort":"8081"}"#;
        let settings: StoredSettings = serde_json::from_str(json).unwrap();

        assert!(settings.projects.is_empty());
        assert_eq!(settings.port_defaults().author, "8080");
        assert_eq!(settings.port_defaults().publish, "8081");
    }

    #[test]
    fn test_is_valid_port() {
        assert!(is_valid_port(""));
        assert!(is_valid_port("  "));
        assert!(is_valid_port("1"));
        assert!(is_valid_port("4502"));
        assert!(is_valid_port("65535"));

        assert!(!is_valid_port("0"));
        assert!(!is_valid_port("65536"));
        assert!(!is_valid_port("-1"));
        assert!(!is_valid_port("port"));
        assert!(!is_valid_port("45.02"));
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url(""));
        assert!(is_valid_url("https://www.example.com"));
        assert!(is_valid_url("http://localhost:8080/path"));

        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("www.example.com"));
        assert!(!is_valid_url("not a url"));
    }
}
