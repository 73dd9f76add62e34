//! gitwiki - a minimal file-backed wiki
//!
//! Pages are markdown files under a root directory. Every change is committed
//! to a git repository in that directory, and pages are rendered to sanitized
//! HTML for the browser.

pub mod components;
pub mod config;
pub mod errors;
pub mod fs_utils;
pub mod handlers;
pub mod logger;
pub mod services;
pub mod types;
pub mod utils;

use axum::{routing::{get, post}, Router};

// Re-export commonly used items
pub use config::Config;
pub use errors::WikiError;
pub use types::{AppState, Crumb, Page, PageInfo, PathKind};
pub use services::{MarkdownService, VcsService, WikiService};
pub use components::navigation::breadcrumbs;

/// Build the wiki router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::handle_root))
        .route("/edit/*path", get(handlers::handle_edit_form))
        .route("/api/create/*path", post(handlers::handle_create))
        .route("/api/edit/*path", post(handlers::handle_edit))
        .route("/api/remove/*path", post(handlers::handle_remove))
        .route("/static/*path", get(handlers::handle_static))
        // `api`, `edit` and `static` shadow pages; see `fs_utils::RESERVED_ROOTS`
        .route("/*path", get(handlers::handle_show))
        .with_state(state)
}
