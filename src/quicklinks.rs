//! Planning of popup actions into destination URLs

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::cloud::{
    build_console_url, extract_cloud_ids, extract_environment_id, extract_program_id,
    instance_host, parse_instance_host, CloudTool,
};
use crate::content::content_path;
use crate::instance::{is_aem_instance, is_loopback_host, system_type, SystemType};
use crate::settings::EffectiveSettings;
use url::Url;

/// Why a quick link could not be planned. The message is what the
/// popup shows the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("Error: Not an AEM or localhost URL!")]
    NotAemUrl,
    #[error("No content page detected!")]
    NoContentPage,
    #[error("Dispatcher URL not configured")]
    DispatcherNotConfigured,
    #[error("Organization ID not configured")]
    OrgIdNotConfigured,
    #[error("Program ID not configured")]
    ProgramIdNotConfigured,
    #[error("Not on an AEM Cloud instance")]
    NotCloudInstance,
    #[error("Unknown cloud tool")]
    UnknownCloudTool,
}

impl NavError {
    /// Whether opening the settings page could fix the error.
    pub fn needs_settings(&self) -> bool {
        matches!(
            self,
            NavError::DispatcherNotConfigured
                | NavError::OrgIdNotConfigured
                | NavError::ProgramIdNotConfigured
        )
    }
}

/// One destination the popup can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickLink {
    Crxde,
    CrxdeCurrentPage,
    PackageManager,
    ConfigManager,
    GroovyConsole,
    ReplicationAgent,
    LoginPublish,
    EditView,
    ViewAsPublished,
    PageProperties,
    SlingModelJson,
    OpenAuthor,
    OpenPublish,
    Dispatcher,
    DispatcherCurrentPage,
    Cloud(CloudTool),
}

/// Plan the destination URL for a quick link.
///
/// `tab_url` is the URL of the active tab, if any, and `settings` are
/// the effective settings already resolved for that tab. Instance
/// tools require the tab to be on an AEM instance and derive their
/// origin from it; current-page tools additionally require a content
/// path; cloud tools work from extracted or configured ids. Planning
/// never opens anything itself, it only computes the URL.
pub fn plan(
    link: QuickLink,
    tab_url: Option<&str>,
    settings: &EffectiveSettings,
) -> Result<String, NavError> {
    match link {
        QuickLink::Crxde => instance_tool(tab_url, SystemType::Author, settings, "/crx/de"),
        QuickLink::CrxdeCurrentPage => {
            let url = aem_tab_url(tab_url)?;
            let path = match content_path(url) {
                Some(path) => {
                    let node = strip_extensions(&path);
                    format!("/crx/de/index.jsp#/{}", node.trim_start_matches('/'))
                }
                None => "/crx/de".to_string(),
            };
            let origin = instance_origin(url, SystemType::Author, settings)?;
            Ok(format!("{origin}{path}"))
        }
        QuickLink::PackageManager => {
            instance_tool(tab_url, SystemType::Author, settings, "/crx/packmgr")
        }
        QuickLink::ConfigManager => {
            instance_tool(tab_url, SystemType::Author, settings, "/system/console/configMgr")
        }
        QuickLink::GroovyConsole => {
            instance_tool(tab_url, SystemType::Author, settings, "/groovyconsole")
        }
        QuickLink::ReplicationAgent => instance_tool(
            tab_url,
            SystemType::Author,
            settings,
            "/etc/replication/agents.author/publish.html",
        ),
        QuickLink::LoginPublish => instance_tool(
            tab_url,
            SystemType::Publish,
            settings,
            "/libs/granite/core/content/login.html",
        ),
        QuickLink::EditView => {
            let (url, path) = content_page(tab_url)?;
            let origin = instance_origin(url, SystemType::Author, settings)?;
            Ok(format!("{origin}/editor.html{path}"))
        }
        QuickLink::ViewAsPublished => {
            let (url, path) = content_page(tab_url)?;
            let origin = instance_origin(url, SystemType::Author, settings)?;
            Ok(format!("{origin}{path}?wcmmode=disabled"))
        }
        QuickLink::PageProperties => {
            let (url, path) = content_page(tab_url)?;
            let origin = instance_origin(url, SystemType::Author, settings)?;
            Ok(format!(
                "{origin}/mnt/overlay/wcm/core/content/sites/properties.html?item={}",
                strip_extensions(&path)
            ))
        }
        QuickLink::SlingModelJson => {
            let url = aem_tab_url(tab_url)?;
            let role = system_type(url, Some(settings)).ok_or(NavError::NotAemUrl)?;
            let path = content_path(url).ok_or(NavError::NoContentPage)?;
            let path = match path.strip_suffix(".html") {
                Some(stem) => format!("{stem}.model.json"),
                None => path,
            };
            let origin = instance_origin(url, role, settings)?;
            Ok(format!("{origin}{path}"))
        }
        QuickLink::OpenAuthor => {
            let url = aem_tab_url(tab_url)?;
            system_type(url, Some(settings)).ok_or(NavError::NotAemUrl)?;
            let path = content_path(url).ok_or(NavError::NoContentPage)?;
            let origin = instance_origin(url, SystemType::Author, settings)?;
            Ok(format!("{origin}{path}"))
        }
        QuickLink::OpenPublish => {
            let url = aem_tab_url(tab_url)?;
            system_type(url, Some(settings)).ok_or(NavError::NotAemUrl)?;
            let path = content_path(url).ok_or(NavError::NoContentPage)?;
            let origin = instance_origin(url, SystemType::Publish, settings)?;
            Ok(format!("{origin}{path}"))
        }
        QuickLink::Dispatcher => dispatcher_link(settings, None),
        QuickLink::DispatcherCurrentPage => {
            let url = aem_tab_url(tab_url)?;
            let path = content_path(url).ok_or(NavError::NoContentPage)?;
            dispatcher_link(settings, Some(&path))
        }
        QuickLink::Cloud(tool) => plan_cloud_tool(tool, tab_url, settings),
    }
}

fn aem_tab_url(tab_url: Option<&str>) -> Result<&str, NavError> {
    tab_url
        .filter(|url| is_aem_instance(url))
        .ok_or(NavError::NotAemUrl)
}

fn content_page(tab_url: Option<&str>) -> Result<(&str, String), NavError> {
    let url = aem_tab_url(tab_url)?;
    let path = content_path(url).ok_or(NavError::NoContentPage)?;
    Ok((url, path))
}

/// Origin of the author or publish system reached from `url`.
///
/// Loopback tabs keep their host and swap in the role's port. Cloud
/// tabs swap the role into the instance hostname instead, since cloud
/// instances are addressed by hostname rather than port.
fn instance_origin(
    url: &str,
    role: SystemType,
    settings: &EffectiveSettings,
) -> Result<String, NavError> {
    let parsed = Url::parse(url).map_err(|_| NavError::NotAemUrl)?;
    let host = parsed.host_str().ok_or(NavError::NotAemUrl)?;

    if is_loopback_host(host) {
        let port = match role {
            SystemType::Author => &settings.author_port,
            SystemType::Publish => &settings.publish_port,
        };
        return Ok(format!("{}://{host}:{port}", parsed.scheme()));
    }

    if let Some(cloud) = parse_instance_host(host) {
        let counterpart = instance_host(role, &cloud.program_id, &cloud.environment_id);
        return Ok(format!("{}://{counterpart}", parsed.scheme()));
    }

    Err(NavError::NotAemUrl)
}

fn instance_tool(
    tab_url: Option<&str>,
    role: SystemType,
    settings: &EffectiveSettings,
    path: &str,
) -> Result<String, NavError> {
    let url = aem_tab_url(tab_url)?;
    let origin = instance_origin(url, role, settings)?;
    Ok(format!("{origin}{path}"))
}

/// Drop a trailing extension, including compound ones like
/// `.model.json`, from a content path.
fn strip_extensions(path: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\.[^./?#]+(\.[^./?#]+)?$").unwrap());
    re.replace(path, "").to_string()
}

fn dispatcher_link(settings: &EffectiveSettings, path: Option<&str>) -> Result<String, NavError> {
    let base = settings.dispatcher_url.trim();
    if base.is_empty() {
        return Err(NavError::DispatcherNotConfigured);
    }

    let base = base.strip_suffix('/').unwrap_or(base);
    Ok(format!("{base}{}", path.unwrap_or("")))
}

fn plan_cloud_tool(
    tool: CloudTool,
    tab_url: Option<&str>,
    settings: &EffectiveSettings,
) -> Result<String, NavError> {
    let url = tab_url.unwrap_or("");
    let ids = extract_cloud_ids(url);
    let org_id = ids
        .org_id
        .or_else(|| nonempty(&settings.org_id))
        .ok_or(NavError::OrgIdNotConfigured)?;

    if tool == CloudTool::Unknown {
        return Err(NavError::UnknownCloudTool);
    }

    if tool == CloudTool::EnvironmentDetails {
        let environment_id = extract_environment_id(url).ok_or(NavError::NotCloudInstance)?;
        let program_id = extract_program_id(url).ok_or(NavError::NotCloudInstance)?;
        return Ok(build_console_url(
            &org_id,
            Some(&program_id),
            Some("environments"),
            Some(&environment_id),
        ));
    }

    let program_id = ids
        .program_id
        .or_else(|| extract_program_id(url))
        .or_else(|| nonempty(&settings.program_id))
        .ok_or(NavError::ProgramIdNotConfigured)?;

    Ok(build_console_url(
        &org_id,
        Some(&program_id),
        tool.console_path(),
        None,
    ))
}

fn nonempty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
