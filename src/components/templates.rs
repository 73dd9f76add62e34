use std::fs;
use std::path::{Path, PathBuf};
use log::debug;
use crate::errors::WikiError;
use crate::components::NavigationComponent;
use crate::fs_utils::{encode_uri, parent_uri};
use crate::types::{Page, PageInfo, TemplateContext};
use crate::utils::{escape_attr, escape_html};

const STYLE_LINK: &str = "<link rel=\"stylesheet\" href=\"/static/css/wiki.css\">";

/// Component for the four fixed page templates: show, edit, create and list
pub struct TemplateComponent {
    static_dir: PathBuf,
    navigation: NavigationComponent,
}

impl TemplateComponent {
    pub fn new(static_dir: &Path) -> Self {
        Self { static_dir: static_dir.to_path_buf(), navigation: NavigationComponent::new() }
    }

    /// Wrap rendered content in the HTML shell.
    ///
    /// Uses `html/base.html` from the static directory when present, the inline shell otherwise.
    pub fn render_shell_template(&self, context: &TemplateContext) -> Result<String, WikiError> {
        let base_path = self.static_dir.join("html").join("base.html");
        match fs::read_to_string(&base_path) {
            Ok(base) => {
                if !base.contains("{{CONTENT}}") {
                    return Err(WikiError::TemplateError(format!("{:?} has no {{{{CONTENT}}}} placeholder", base_path)));
                }
                let title = escape_html(&context.title);
                Ok(fill_placeholders(&base, &[
                    ("TITLE", title.as_str()),
                    ("STYLE", STYLE_LINK),
                    ("CRUMBS", context.crumbs.as_str()),
                    ("CONTENT", context.content.as_str()),
                ]))
            }
            Err(_) => {
                debug!("No base template at {:?}, using inline shell", base_path);
                Ok(format!(
                    "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\"><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"><title>{}</title>{}</head><body><header>{}</header><main class=\"content\">{}</main></body></html>",
                    escape_html(&context.title), STYLE_LINK, context.crumbs, context.content
                ))
            }
        }
    }

    fn render(&self, title: &str, uri: &str, content: String) -> Result<String, WikiError> {
        let context = TemplateContext {
            title: title.to_string(),
            crumbs: self.navigation.build_crumbs_html(uri),
            content,
        };
        self.render_shell_template(&context)
    }

    /// Rendered page with edit and delete actions. Expects `page.body` to be processed.
    pub fn render_show(&self, page: &Page, title: &str, meta: &str) -> Result<String, WikiError> {
        let mut html = String::new();
        html.push_str("<div class=\"actions\">");
        html.push_str(&format!("<a class=\"btn\" href=\"/edit{}\">Edit</a>", link(&page.uri)));
        html.push_str(&format!(
            "<form method=\"post\" action=\"/api/remove{}\" onsubmit=\"return confirm('Delete this page?')\"><button type=\"submit\">Delete</button></form>",
            link(&page.uri)
        ));
        html.push_str("</div>");
        html.push_str(meta);
        html.push_str("<article class=\"page\">");
        html.push_str(&page.body);
        html.push_str("</article>");
        self.render(title, &page.uri, html)
    }

    /// Edit form posting `new_contents`
    pub fn render_edit(&self, page: &Page) -> Result<String, WikiError> {
        let mut html = String::new();
        html.push_str(&format!("<h1>Editing {}</h1>", escape_html(&page.uri)));
        html.push_str(&format!(
            "<form class=\"editor\" method=\"post\" action=\"/api/edit{}\">",
            link(&page.uri)
        ));
        html.push_str(&format!(
            "<textarea name=\"new_contents\" rows=\"30\" autofocus>{}</textarea>",
            escape_html(&page.raw)
        ));
        html.push_str(&format!(
            "<div class=\"actions\"><button type=\"submit\">Save</button><a class=\"btn\" href=\"{}\">Cancel</a></div>",
            link(&page.uri)
        ));
        html.push_str("</form>");
        self.render(&format!("Edit {}", page.uri), &page.uri, html)
    }

    /// Prompt shown for a path with nothing on disk
    pub fn render_create(&self, uri: &str) -> Result<String, WikiError> {
        let mut html = String::new();
        html.push_str(&format!("<h1>{}</h1>", escape_html(uri)));
        html.push_str("<p>This page does not exist yet.</p>");
        html.push_str(&format!(
            "<form method=\"post\" action=\"/api/create{}\"><button type=\"submit\">Create it</button></form>",
            link(uri)
        ));
        self.render(uri, uri, html)
    }

    /// Directory listing
    pub fn render_list(&self, uri: &str, entries: &[PageInfo]) -> Result<String, WikiError> {
        let mut html = String::new();
        html.push_str(&format!("<h1>{}</h1>", escape_html(uri)));
        if uri != "/" {
            html.push_str(&format!("<p><a href=\"{}\">⬑ Up</a></p>", link(&parent_uri(uri))));
        }
        if entries.is_empty() {
            html.push_str("<p class=\"empty\">Nothing here yet.</p>");
        }
        html.push_str("<ul class=\"listing\">\n");
        for entry in entries {
            let display = if entry.is_dir { format!("{}/", entry.name) } else { entry.name.clone() };
            let class = if entry.is_dir { "dir" } else { "file" };
            html.push_str(&format!(
                "  <li class=\"{}\"><a href=\"{}\">{}</a></li>\n",
                class,
                link(&entry.uri),
                escape_html(&display)
            ));
        }
        html.push_str("</ul>\n");
        self.render(uri, uri, html)
    }
}

/// A URI ready to sit inside an `href` or `action` attribute
pub(crate) fn link(uri: &str) -> String {
    escape_attr(&encode_uri(uri))
}

/// Substitute `{{NAME}}` slots in one pass over `base`.
///
/// Inserted values are never scanned again, so user text containing a slot name stays literal.
/// Unknown slots are kept as they are.
fn fill_placeholders(base: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(base.len());
    let mut rest = base;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let slot = after
            .find("}}")
            .and_then(|end| values.iter().find(|(name, _)| *name == &after[..end]).map(|(_, v)| (end, *v)));
        match slot {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
