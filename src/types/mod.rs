use std::sync::Arc;
use std::path::PathBuf;

use crate::components::navigation::breadcrumbs;
use crate::config::Config;
use crate::services::{MarkdownService, VcsService, WikiService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub wiki: Arc<WikiService>,
    pub static_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let root = config.base_dir.as_ref().clone();
        let vcs = VcsService::new(root.clone(), config.git_binary.clone(), config.autocommit);
        Self {
            wiki: Arc::new(WikiService::new(root, vcs)),
            static_dir: Arc::clone(&config.static_dir),
        }
    }
}

/// A single wiki page read from disk
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Absolute path of the markdown file
    pub path: PathBuf,
    /// Canonical request URI, always starting with `/`
    pub uri: String,
    pub raw: String,
    /// Sanitized HTML, empty until [`Page::process_markdown`] runs
    pub body: String,
}

impl Page {
    /// Render the raw markdown into the sanitized body
    pub fn process_markdown(&mut self) {
        self.body = MarkdownService::new().render(&self.raw);
    }

    pub fn crumbs(&self) -> Vec<Crumb> {
        breadcrumbs(&self.uri)
    }
}

/// Directory listing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub uri: String,
    pub name: String,
    pub is_dir: bool,
}

/// Breadcrumb entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub name: String,
    pub uri: String,
}

/// What a sanitized path currently points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Directory,
    File,
    Missing,
}

/// Template rendering context
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub title: String,
    pub crumbs: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_markdown_fills_body() {
        let mut page = Page { uri: "/a/b/page.md".into(), raw: "# Hi <script>x</script>".into(), ..Page::default() };
        page.process_markdown();
        assert!(page.body.contains("<h1>"));
        assert!(!page.body.contains("<script>"));
    }

    #[test]
    fn crumbs_follow_uri() {
        let page = Page { uri: "/a/b/page.md".into(), ..Page::default() };
        let names: Vec<_> = page.crumbs().into_iter().map(|c| c.uri).collect();
        assert_eq!(names, vec!["/", "/a", "/a/b"]);
    }
}
