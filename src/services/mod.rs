pub mod markdown_service;
pub mod vcs_service;
pub mod wiki_service;

pub use markdown_service::MarkdownService;
pub use vcs_service::VcsService;
pub use wiki_service::WikiService;
