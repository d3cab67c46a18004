//! AEM Cloud identity extraction and Cloud Manager console URLs

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::instance::SystemType;

/// Domain of cloud-hosted AEM instances.
pub const INSTANCE_DOMAIN: &str = "adobeaemcloud.com";

/// Host of the Cloud Manager console.
pub const CONSOLE_HOST: &str = "experience.adobe.com";

fn instance_host_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(author|publish)-p(\w+)-e(\w+)\.adobeaemcloud\.com$").unwrap()
    })
}

fn console_org_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^/@([^/]+)/cloud-manager").unwrap())
}

fn console_program_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/program/([^/?#]+)").unwrap())
}

/// Identity carried by a cloud instance hostname,
/// `<role>-p<program>-e<environment>.adobeaemcloud.com`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudHost {
    pub role: SystemType,
    pub program_id: String,
    pub environment_id: String,
}

pub fn parse_instance_host(host: &str) -> Option<CloudHost> {
    let caps = instance_host_re().captures(host)?;
    let role = match &caps[1] {
        "author" => SystemType::Author,
        _ => SystemType::Publish,
    };

    Some(CloudHost {
        role,
        program_id: caps[2].to_string(),
        environment_id: caps[3].to_string(),
    })
}

/// Build the instance hostname for a role and extracted ids.
pub fn instance_host(role: SystemType, program_id: &str, environment_id: &str) -> String {
    format!(
        "{}-p{}-e{}.{}",
        role.as_str(),
        program_id,
        environment_id,
        INSTANCE_DOMAIN
    )
}

/// Organization/program ids recovered from a Cloud Manager console URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CloudIds {
    pub org_id: Option<String>,
    pub program_id: Option<String>,
}

/// Extract organization and program ids from a console URL fragment.
/// Non-console hosts yield empty ids; each id is independently optional.
pub fn extract_cloud_ids(url: &str) -> CloudIds {
    let Ok(parsed) = Url::parse(url) else {
        return CloudIds::default();
    };
    let Some(host) = parsed.host_str() else {
        return CloudIds::default();
    };
    if !host.contains(CONSOLE_HOST) {
        return CloudIds::default();
    }

    let fragment = parsed.fragment().unwrap_or("");
    let org_id = console_org_re()
        .captures(fragment)
        .map(|caps| caps[1].to_string());
    let program_id = console_program_re()
        .captures(fragment)
        .map(|caps| caps[1].to_string());

    CloudIds { org_id, program_id }
}

/// Program id from a cloud instance hostname, or `None` elsewhere.
pub fn extract_program_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parse_instance_host(parsed.host_str()?).map(|host| host.program_id)
}

/// Environment id from a cloud instance hostname, or `None` elsewhere.
pub fn extract_environment_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parse_instance_host(parsed.host_str()?).map(|host| host.environment_id)
}

/// Build a Cloud Manager console URL.
///
/// - no program id: `<base>/home.html`
/// - program id only: `<base>/home.html/program/<p>`
/// - sub-tool: `<base>/<tool>.html/program/<p>`, plus
///   `/environment/<e>` when an environment id is given
pub fn build_console_url(
    org_id: &str,
    program_id: Option<&str>,
    sub_tool: Option<&str>,
    environment_id: Option<&str>,
) -> String {
    let mut url = format!("https://{CONSOLE_HOST}/#/@{org_id}/cloud-manager");

    match (program_id, sub_tool) {
        (Some(program), Some(tool)) => {
            url.push_str(&format!("/{tool}.html/program/{program}"));
            if let Some(environment) = environment_id {
                url.push_str(&format!("/environment/{environment}"));
            }
        }
        (Some(program), None) => {
            url.push_str(&format!("/home.html/program/{program}"));
        }
        (None, _) => {
            url.push_str("/home.html");
        }
    }

    url
}

/// The Cloud Manager tools the popup can open. Identifiers outside the
/// known set parse to `Unknown`, which planning reports as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudTool {
    Home,
    EnvironmentDetails,
    Environments,
    Pipelines,
    Activity,
    Unknown,
}

impl CloudTool {
    pub fn from_id(id: &str) -> CloudTool {
        match id {
            "home" => CloudTool::Home,
            "environment-details" => CloudTool::EnvironmentDetails,
            "environments" => CloudTool::Environments,
            "pipelines" => CloudTool::Pipelines,
            "activity" => CloudTool::Activity,
            _ => CloudTool::Unknown,
        }
    }

    /// Console path segment, or `None` for the home page.
    pub fn console_path(&self) -> Option<&'static str> {
        match self {
            CloudTool::Home | CloudTool::Unknown => None,
            CloudTool::EnvironmentDetails | CloudTool::Environments => Some("environments"),
            CloudTool::Pipelines => Some("pipelines"),
            CloudTool::Activity => Some("activity"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instance_host() {
        let host = parse_instance_host("author-p12345-e67890.adobeaemcloud.com");
        assert_eq!(
            host,
            Some(CloudHost {
                role: SystemType::Author,
                program_id: "12345".to_string(),
                environment_id: "67890".to_string(),
            })
        );

        let host = parse_instance_host("publish-p1-e2.adobeaemcloud.com");
        assert_eq!(
            host,
            Some(CloudHost {
                role: SystemType::Publish,
                program_id: "1".to_string(),
                environment_id: "2".to_string(),
            })
        );

        assert_eq!(parse_instance_host("www.adobeaemcloud.com"), None);
        assert_eq!(parse_instance_host("author-p123.adobeaemcloud.com"), None);
        assert_eq!(parse_instance_host("author-p123-e456.example.com"), None);
    }

    #[test]
    fn test_instance_host_round_trip() {
        let host = instance_host(SystemType::Publish, "12345", "67890");
        assert_eq!(host, "publish-p12345-e67890.adobeaemcloud.com");
        assert!(parse_instance_host(&host).is_some());
    }

    #[test]
    fn test_extract_cloud_ids_from_console_url() {
        let url = "https://experience.adobe.com/#/@myorg/cloud-manager/home.html/program/12345";
        let ids = extract_cloud_ids(url);

        assert_eq!(ids.org_id, Some("myorg".to_string()));
        assert_eq!(ids.program_id, Some("12345".to_string()));
    }

    #[test]
    fn test_extract_cloud_ids_org_only() {
        let url = "https://experience.adobe.com/#/@myorg/cloud-manager/home.html";
        let ids = extract_cloud_ids(url);

        assert_eq!(ids.org_id, Some("myorg".to_string()));
        assert_eq!(ids.program_id, None);
    }

    #[test]
    fn test_extract_cloud_ids_other_hosts() {
        assert_eq!(extract_cloud_ids("https://www.google.com/#/@org/cloud-manager"), CloudIds::default());
        assert_eq!(extract_cloud_ids("https://author-p1-e2.adobeaemcloud.com"), CloudIds::default());
        assert_eq!(extract_cloud_ids("not-a-url"), CloudIds::default());
    }

    #[test]
    fn test_extract_instance_ids() {
        let url = "https://author-p12345-e67890.adobeaemcloud.com/content/site.html";

        assert_eq!(extract_program_id(url), Some("12345".to_string()));
        assert_eq!(extract_environment_id(url), Some("67890".to_string()));
        assert_eq!(extract_program_id("http://localhost:4502"), None);
        assert_eq!(extract_environment_id("https://www.google.com"), None);
    }

    #[test]
    fn test_build_console_url() {
        let base = "https://experience.adobe.com/#/@org1/cloud-manager";

        assert_eq!(build_console_url("org1", None, None, None), format!("{base}/home.html"));
        assert_eq!(
            build_console_url("org1", Some("p1"), None, None),
            format!("{base}/home.html/program/p1")
        );
        assert_eq!(
            build_console_url("org1", Some("p1"), Some("pipelines"), None),
            format!("{base}/pipelines.html/program/p1")
        );
        assert_eq!(
            build_console_url("org1", Some("p1"), Some("environments"), Some("e1")),
            format!("{base}/environments.html/program/p1/environment/e1")
        );
    }

    #[test]
    fn test_build_console_url_ignores_environment_without_tool() {
        assert_eq!(
            build_console_url("org1", Some("p1"), None, Some("e1")),
            "https://experience.adobe.com/#/@org1/cloud-manager/home.html/program/p1"
        );
    }

    #[test]
    fn test_console_url_round_trip() {
        let url = build_console_url("org1", Some("p1"), Some("environments"), Some("e1"));
        let ids = extract_cloud_ids(&url);

        assert_eq!(ids.org_id, Some("org1".to_string()));
        assert_eq!(ids.program_id, Some("p1".to_string()));
    }

    #[test]
    fn test_cloud_tool_from_id() {
        assert_eq!(CloudTool::from_id("home"), CloudTool::Home);
        assert_eq!(CloudTool::from_id("environment-details"), CloudTool::EnvironmentDetails);
        assert_eq!(CloudTool::from_id("environments"), CloudTool::Environments);
        assert_eq!(CloudTool::from_id("pipelines"), CloudTool::Pipelines);
        assert_eq!(CloudTool::from_id("activity"), CloudTool::Activity);
        assert_eq!(CloudTool::from_id("deployments"), CloudTool::Unknown);
        assert_eq!(CloudTool::from_id(""), CloudTool::Unknown);
    }

    #[test]
    fn test_cloud_tool_console_path() {
        assert_eq!(CloudTool::Home.console_path(), None);
        assert_eq!(CloudTool::EnvironmentDetails.console_path(), Some("environments"));
        assert_eq!(CloudTool::Environments.console_path(), Some("environments"));
        assert_eq!(CloudTool::Pipelines.console_path(), Some("pipelines"));
        assert_eq!(CloudTool::Activity.console_path(), Some("activity"));
    }
}
