use std::path::{Component, Path, PathBuf};

use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::errors::WikiError;

/// Name of the version control metadata directory inside the wiki root.
pub const VCS_DIR: &str = ".git";

/// Top-level names taken by routes; pages under them could never be shown.
pub const RESERVED_ROOTS: &[&str] = &["api", "edit", "static"];

/// Everything but unreserved characters and `/` gets encoded
const URI_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Join `req_path` onto `root` and make sure the result stays inside it.
///
/// The request path is always treated as relative, `.` segments are dropped
/// and `..` pops the previous segment. Walking above the root at any point,
/// or landing in the metadata directory, yields [`WikiError::OutsideRepo`].
pub fn resolve_local(root: &Path, req_path: &str) -> Result<PathBuf, WikiError> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for comp in Path::new(req_path).components() {
        match comp {
            Component::Normal(seg) => parts.push(seg),
            Component::CurDir | Component::RootDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(WikiError::OutsideRepo);
                }
            }
            Component::Prefix(_) => return Err(WikiError::OutsideRepo),
        }
    }

    if parts.first().is_some_and(|first| *first == VCS_DIR) {
        return Err(WikiError::OutsideRepo);
    }

    let mut local = root.to_path_buf();
    local.extend(parts);
    // component-wise, so `/srv/wiki-old` never passes for `/srv/wiki`
    if !local.starts_with(root) {
        return Err(WikiError::OutsideRepo);
    }
    Ok(local)
}

/// Clean a request path into its canonical `/`-prefixed URI form.
pub fn canonical_uri(req_path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in req_path.split('/') {
        match part {
            "" | "." => continue,
            ".." => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }
    format!("/{}", parts.join("/"))
}

/// URI of the directory containing `uri`, used as the redirect after a removal.
pub fn parent_uri(uri: &str) -> String {
    let canonical = canonical_uri(uri);
    match canonical.rsplit_once('/') {
        Some((parent, _)) if !parent.is_empty() => parent.to_string(),
        _ => "/".to_string(),
    }
}

/// Percent-encode a URI path for links, form actions and `Location` headers.
pub fn encode_uri(uri: &str) -> String {
    percent_encode(uri.as_bytes(), URI_PATH).to_string()
}

/// Whether a request path starts with a name owned by a route
pub fn is_reserved(req_path: &str) -> bool {
    req_path
        .split('/')
        .find(|s| !s.is_empty() && *s != ".")
        .is_some_and(|first| RESERVED_ROOTS.contains(&first))
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
