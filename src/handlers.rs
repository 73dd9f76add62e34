use axum::{
    body::Body,
    extract::{Path as AxumPath, State},
    http::{header, HeaderValue, Response, StatusCode},
    response::{Html, IntoResponse},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::components::TemplateComponent;
use crate::errors::WikiError;
use crate::fs_utils::{canonical_uri, encode_uri, parent_uri, resolve_local};
use crate::services::{MarkdownService, WikiService};
use crate::types::{AppState, PathKind};
use crate::utils::{content_type_for, last_modified_html};

/// Form body posted by the edit page
#[derive(Debug, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub new_contents: String,
}

/// Run filesystem and git work off the async executor
async fn blocking<T, F>(f: F) -> Result<T, WikiError>
where
    F: FnOnce() -> Result<T, WikiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| WikiError::Internal(format!("blocking task failed: {}", e)))?
}

fn redirect(uri: &str) -> Response<Body> {
    let mut resp = StatusCode::FOUND.into_response();
    let location = HeaderValue::from_str(&encode_uri(uri)).unwrap_or_else(|_| HeaderValue::from_static("/"));
    resp.headers_mut().insert(header::LOCATION, location);
    resp
}

/// Handle root path requests
pub async fn handle_root(State(state): State<AppState>) -> Result<Response<Body>, WikiError> {
    show(state, String::new()).await
}

/// Show a page, a directory listing, or a create prompt depending on what is on disk
pub async fn handle_show(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<Response<Body>, WikiError> {
    show(state, path).await
}

async fn show(state: AppState, path: String) -> Result<Response<Body>, WikiError> {
    log::info!("Show request received: '{}'", path);
    let wiki = Arc::clone(&state.wiki);
    let static_dir = Arc::clone(&state.static_dir);

    let (status, html) = blocking(move || {
        let templates = TemplateComponent::new(&static_dir);
        let uri = canonical_uri(&path);
        match wiki.stat(&path)? {
            PathKind::Directory => {
                log::debug!("'{}' is a directory, listing", uri);
                let entries = wiki.get_dir(&path)?;
                Ok((StatusCode::OK, templates.render_list(&uri, &entries)?))
            }
            PathKind::File => {
                let mut page = wiki.get_page(&path)?;
                page.process_markdown();
                let title = MarkdownService::new().title(&page.raw).unwrap_or_else(|| page.uri.clone());
                let meta = last_modified_html(&page.path);
                Ok((StatusCode::OK, templates.render_show(&page, &title, &meta)?))
            }
            PathKind::Missing => {
                log::debug!("'{}' does not exist, offering to create it", uri);
                Ok((StatusCode::NOT_FOUND, templates.render_create(&uri)?))
            }
        }
    })
    .await?;

    Ok((status, Html(html)).into_response())
}

/// Edit form for an existing page
pub async fn handle_edit_form(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<Response<Body>, WikiError> {
    log::info!("Edit form requested: '{}'", path);
    let wiki = Arc::clone(&state.wiki);
    let static_dir = Arc::clone(&state.static_dir);

    let html = blocking(move || {
        let page = wiki.get_page(&path)?;
        TemplateComponent::new(&static_dir).render_edit(&page)
    })
    .await?;

    Ok(Html(html).into_response())
}

/// Create a placeholder page and redirect to it
pub async fn handle_create(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<Response<Body>, WikiError> {
    log::info!("Create request received: '{}'", path);
    let target = canonical_uri(&path);
    mutate(&state.wiki, move |wiki| wiki.create(&path)).await?;
    Ok(redirect(&target))
}

/// Replace a page with the posted `new_contents`
pub async fn handle_edit(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
    Form(form): Form<EditForm>,
) -> Result<Response<Body>, WikiError> {
    log::info!("Edit request received: '{}' ({} bytes)", path, form.new_contents.len());
    let target = canonical_uri(&path);
    mutate(&state.wiki, move |wiki| wiki.edit(&path, form.new_contents.as_bytes())).await?;
    Ok(redirect(&target))
}

/// Remove a page and redirect to the directory that held it
pub async fn handle_remove(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<Response<Body>, WikiError> {
    log::info!("Remove request received: '{}'", path);
    let target = parent_uri(&path);
    mutate(&state.wiki, move |wiki| wiki.remove(&path)).await?;
    Ok(redirect(&target))
}

async fn mutate<F>(wiki: &Arc<WikiService>, op: F) -> Result<(), WikiError>
where
    F: FnOnce(&WikiService) -> Result<(), WikiError> + Send + 'static,
{
    let wiki = Arc::clone(wiki);
    blocking(move || op(&wiki)).await
}

/// Handle static file requests
pub async fn handle_static(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<Response<Body>, WikiError> {
    let requested = resolve_local(&state.static_dir, &path)?;
    if !requested.is_file() {
        return Err(WikiError::NotFound);
    }

    let bytes = std::fs::read(&requested)?;
    let mut resp = Response::new(Body::from(bytes));
    resp.headers_mut().insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type_for(&requested)));
    Ok(resp)
}
