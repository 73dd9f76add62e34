use crate::components::templates::link;
use crate::types::Crumb;
use crate::utils::escape_html;

/// Split a request path into the breadcrumb trail leading to it.
///
/// The trail always starts at `home` and stops before the last segment,
/// which is the page itself.
pub fn breadcrumbs(path: &str) -> Vec<Crumb> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let mut crumbs = Vec::with_capacity(segments.len() + 1);
    crumbs.push(Crumb { name: "home".to_string(), uri: "/".to_string() });

    let mut uri = String::new();
    for segment in segments.iter().take(segments.len().saturating_sub(1)) {
        uri.push('/');
        uri.push_str(segment);
        crumbs.push(Crumb { name: segment.to_string(), uri: uri.clone() });
    }
    crumbs
}

/// Component for the breadcrumb bar shown above every page
pub struct NavigationComponent;

impl NavigationComponent {
    pub fn new() -> Self {
        Self
    }

    /// Build the breadcrumb bar HTML for `path`
    pub fn build_crumbs_html(&self, path: &str) -> String {
        let crumbs = breadcrumbs(path);
        let mut html = String::from("<nav class=\"crumbs\">");
        for (ix, crumb) in crumbs.iter().enumerate() {
            if ix > 0 {
                html.push_str("<span class=\"sep\">/</span>");
            }
            html.push_str(&format!(
                "<a href=\"{}\">{}</a>",
                link(&crumb.uri),
                escape_html(&crumb.name)
            ));
        }
        html.push_str("</nav>");
        html
    }
}

impl Default for NavigationComponent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crumb(name: &str, uri: &str) -> Crumb {
        Crumb { name: name.to_string(), uri: uri.to_string() }
    }

    #[test]
    fn nested_path() {
        assert_eq!(
            breadcrumbs("/a/b/c"),
            vec![crumb("home", "/"), crumb("a", "/a"), crumb("b", "/a/b")]
        );
    }

    #[test]
    fn relative_and_trailing_slash() {
        assert_eq!(breadcrumbs("a/b"), vec![crumb("home", "/"), crumb("a", "/a")]);
        assert_eq!(breadcrumbs("/a/b/"), vec![crumb("home", "/"), crumb("a", "/a")]);
    }

    #[test]
    fn root_and_top_level() {
        assert_eq!(breadcrumbs("/"), vec![crumb("home", "/")]);
        assert_eq!(breadcrumbs("/page.md"), vec![crumb("home", "/")]);
    }

    #[test]
    fn crumb_html_escapes_names() {
        let html = NavigationComponent::new().build_crumbs_html("/<b>/page");
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn crumb_links_are_encoded() {
        let html = NavigationComponent::new().build_crumbs_html("/a b/c?d/page.md");
        assert!(html.contains("<a href=\"/a%20b\">a b</a>"));
        assert!(html.contains("<a href=\"/a%20b/c%3Fd\">c?d</a>"));
    }
}
