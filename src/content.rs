//! Content path extraction from AEM tab URLs

use url::Url;

/// Repository root every content page lives under.
pub const CONTENT_ROOT: &str = "/content";

/// Extract the content path from an AEM URL.
///
/// Recognized shapes, checked in order:
///
/// 1. A query parameter naming an item path, e.g.
///    `.../properties.html?item=/content/site/en` (an `.html` extension
///    is appended when the item has no extension)
/// 2. An editor URL, e.g. `/editor.html/content/site/en.html`
/// 3. A plain content URL, e.g. `/content/site/en.html`
/// 4. A CRXDE browser URL, e.g. `/crx/de/index.jsp#/content/site/en`
///    (the fragment names a node, so `.html` is appended)
///
/// Returns `None` when the URL does not address a content page.
pub fn content_path(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;

    if let Some((_, item)) = parsed.query_pairs().find(|(key, _)| key == "item") {
        if item.starts_with(CONTENT_ROOT) {
            return Some(ensure_html_extension(item.to_string()));
        }
    }

    let path = parsed.path();

    if let Some(rest) = path.strip_prefix("/editor.html") {
        if rest.starts_with(CONTENT_ROOT) {
            return Some(rest.to_string());
        }
    }

    if path.starts_with(CONTENT_ROOT) {
        return Some(path.to_string());
    }

    if path == "/crx/de/index.jsp" {
        if let Some(fragment) = parsed.fragment() {
            if fragment.starts_with('/') {
                return Some(format!("{fragment}.html"));
            }
        }
    }

    None
}

fn ensure_html_extension(path: String) -> String {
    let last_segment = path.rsplit('/').next().unwrap_or("");
    if last_segment.contains('.') {
        path
    } else {
        format!("{path}.html")
    }
}
