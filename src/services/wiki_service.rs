use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use log::{debug, info, warn};
use crate::errors::WikiError;
use crate::fs_utils::{canonical_uri, is_hidden, is_reserved, resolve_local};
use crate::services::VcsService;
use crate::types::{Page, PageInfo, PathKind};

/// Page store rooted at a single wiki directory.
///
/// Every operation sanitizes its path first; mutations are followed by a commit.
pub struct WikiService {
    root: PathBuf,
    vcs: VcsService,
}

impl WikiService {
    pub fn new(root: PathBuf, vcs: VcsService) -> Self {
        debug!("Creating WikiService with root: {:?}", root);
        Self { root, vcs }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn vcs(&self) -> &VcsService {
        &self.vcs
    }

    /// Resolve a request path to an absolute path inside the wiki.
    pub fn local(&self, path: &str) -> Result<PathBuf, WikiError> {
        resolve_local(&self.root, path)
    }

    pub fn stat(&self, path: &str) -> Result<PathKind, WikiError> {
        let local = self.local(path)?;
        Ok(match fs::metadata(&local) {
            Ok(meta) if meta.is_dir() => PathKind::Directory,
            Ok(_) => PathKind::File,
            Err(_) => PathKind::Missing,
        })
    }

    /// Create a page holding a `# path` placeholder. Existing pages are left alone.
    pub fn create(&self, path: &str) -> Result<(), WikiError> {
        let local = self.writable(path)?;
        let name = path.trim_start_matches('/');
        if let Some(parent) = local.parent() {
            fs::create_dir_all(parent)?;
        }
        if local.exists() {
            debug!("Create skipped, {:?} already exists", local);
            return Ok(());
        }
        write_page_file(&local, format!("# {}", name).as_bytes())?;
        info!("Created page {:?}", local);
        self.commit(&local, &format!("Created {}", name));
        Ok(())
    }

    /// Replace the contents of a page.
    pub fn edit(&self, path: &str, contents: &[u8]) -> Result<(), WikiError> {
        let local = self.writable(path)?;
        if local.is_dir() {
            return Err(WikiError::InvalidPath);
        }
        if let Some(parent) = local.parent() {
            fs::create_dir_all(parent)?;
        }
        write_page_file(&local, contents)?;
        info!("Edited page {:?}, {} bytes", local, contents.len());
        self.commit(&local, &format!("Edit to {}", path.trim_start_matches('/')));
        Ok(())
    }

    /// Delete a page, or an empty directory. Empty parents are kept.
    pub fn remove(&self, path: &str) -> Result<(), WikiError> {
        let local = self.local(path)?;
        if local == self.root {
            return Err(WikiError::InvalidPath);
        }
        let meta = fs::symlink_metadata(&local)?;
        if meta.is_dir() {
            if fs::read_dir(&local)?.next().is_some() {
                warn!("Refusing to remove non-empty directory {:?}", local);
                return Err(WikiError::InvalidPath);
            }
            fs::remove_dir(&local)?;
        } else {
            fs::remove_file(&local)?;
        }
        info!("Removed {:?}", local);
        self.commit(&local, &format!("Deleted {}", path.trim_start_matches('/')));
        Ok(())
    }

    /// List the visible entries of a directory.
    pub fn get_dir(&self, path: &str) -> Result<Vec<PageInfo>, WikiError> {
        let local = self.local(path)?;
        if !local.exists() {
            return Err(WikiError::NotFound);
        }
        if !local.is_dir() {
            return Err(WikiError::InvalidPath);
        }

        let base = canonical_uri(path);
        let mut entries = Vec::new();
        for entry in fs::read_dir(&local)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to read directory entry in {:?}: {}", local, e);
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().to_string();
            if is_hidden(&name) {
                continue;
            }
            let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
            let uri = if base == "/" { format!("/{}", name) } else { format!("{}/{}", base, name) };
            entries.push(PageInfo { uri, name, is_dir });
        }
        // Directories first, then files; both alphabetically
        entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        });
        debug!("Listed {:?}, found {} entries", local, entries.len());
        Ok(entries)
    }

    /// Read a page without rendering it.
    pub fn get_page(&self, path: &str) -> Result<Page, WikiError> {
        let local = self.local(path)?;
        if local.is_dir() {
            return Err(WikiError::InvalidPath);
        }
        // invalid UTF-8 is rejected, never replaced
        let raw = String::from_utf8(fs::read(&local)?).map_err(|e| {
            warn!("{:?} is not valid UTF-8", local);
            WikiError::Io(io::Error::new(io::ErrorKind::InvalidData, e))
        })?;
        Ok(Page {
            path: local,
            uri: canonical_uri(path),
            raw,
            body: String::new(),
        })
    }

    /// Like [`WikiService::local`], but also refuses names owned by routes.
    fn writable(&self, path: &str) -> Result<PathBuf, WikiError> {
        let local = self.local(path)?;
        let relative = local.strip_prefix(&self.root).map_err(|_| WikiError::OutsideRepo)?;
        if is_reserved(&relative.to_string_lossy()) {
            return Err(WikiError::InvalidPath);
        }
        Ok(local)
    }

    fn commit(&self, local: &Path, message: &str) {
        if let Err(e) = self.vcs.commit(local, message) {
            warn!("Commit '{}' failed, change kept on disk: {}", message, e);
        }
    }
}

fn write_page_file(path: &Path, contents: &[u8]) -> Result<(), WikiError> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn wiki(dir: &TempDir) -> WikiService {
        let root = dir.path().to_path_buf();
        WikiService::new(root.clone(), VcsService::new(root, "git", false))
    }

    #[test]
    fn create_writes_placeholder() {
        let dir = TempDir::new().unwrap();
        let wiki = wiki(&dir);
        wiki.create("notes/today.md").unwrap();
        let content = fs::read_to_string(dir.path().join("notes/today.md")).unwrap();
        assert_eq!(content, "# notes/today.md");
    }

    #[test]
    fn create_keeps_existing_content() {
        let dir = TempDir::new().unwrap();
        let wiki = wiki(&dir);
        fs::write(dir.path().join("page.md"), "keep me").unwrap();
        wiki.create("page.md").unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("page.md")).unwrap(), "keep me");
    }

    #[test]
    fn edit_round_trips_exact_bytes() {
        let dir = TempDir::new().unwrap();
        let wiki = wiki(&dir);
        let text = "# Title\r\n\ttabs and unicode: héllo\n\n";
        wiki.edit("a/b.md", text.as_bytes()).unwrap();
        let page = wiki.get_page("a/b.md").unwrap();
        assert_eq!(page.raw, text);
        assert_eq!(page.uri, "/a/b.md");
        assert_eq!(page.path, dir.path().join("a/b.md"));
        assert!(page.body.is_empty());
    }

    #[test]
    fn remove_then_get_is_not_found() {
        let dir = TempDir::new().unwrap();
        let wiki = wiki(&dir);
        wiki.create("gone.md").unwrap();
        wiki.remove("gone.md").unwrap();
        assert!(matches!(wiki.get_page("gone.md"), Err(WikiError::NotFound)));
        assert!(matches!(wiki.remove("gone.md"), Err(WikiError::NotFound)));
    }

    #[test]
    fn non_utf8_pages_are_not_rewritten() {
        let dir = TempDir::new().unwrap();
        let wiki = wiki(&dir);
        let bytes = [b'#', b' ', 0xff, 0xfe, b'\n'];
        wiki.edit("latin.md", &bytes).unwrap();
        match wiki.get_page("latin.md") {
            Err(WikiError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::InvalidData),
            other => panic!("expected invalid data, got {:?}", other.map(|p| p.raw)),
        }
        assert_eq!(fs::read(dir.path().join("latin.md")).unwrap(), bytes);
    }

    #[test]
    fn remove_refuses_non_empty_directory() {
        let dir = TempDir::new().unwrap();
        let wiki = wiki(&dir);
        wiki.create("full/page.md").unwrap();
        assert!(matches!(wiki.remove("full"), Err(WikiError::InvalidPath)));
        assert!(dir.path().join("full/page.md").is_file());

        wiki.remove("full/page.md").unwrap();
        wiki.remove("full").unwrap();
        assert!(!dir.path().join("full").exists());
    }

    #[test]
    fn reserved_names_are_not_writable() {
        let dir = TempDir::new().unwrap();
        let wiki = wiki(&dir);
        assert!(matches!(wiki.create("static/page.md"), Err(WikiError::InvalidPath)));
        assert!(matches!(wiki.edit("/api/x.md", b"x"), Err(WikiError::InvalidPath)));
        assert!(matches!(wiki.create("docs/../edit/x.md"), Err(WikiError::InvalidPath)));
        assert!(!dir.path().join("static").exists());
        wiki.create("docs/static/page.md").unwrap();
    }

    #[test]
    fn remove_leaves_empty_parent() {
        let dir = TempDir::new().unwrap();
        let wiki = wiki(&dir);
        wiki.create("sub/only.md").unwrap();
        wiki.remove("/sub/only.md").unwrap();
        assert!(dir.path().join("sub").is_dir());
    }

    #[test]
    fn refuses_root_and_escapes() {
        let dir = TempDir::new().unwrap();
        let wiki = wiki(&dir);
        assert!(matches!(wiki.remove("/"), Err(WikiError::InvalidPath)));
        assert!(matches!(wiki.create("../outside.md"), Err(WikiError::OutsideRepo)));
        assert!(matches!(wiki.edit(".git/config", b"x"), Err(WikiError::OutsideRepo)));
        assert!(matches!(wiki.get_dir("../"), Err(WikiError::OutsideRepo)));
    }

    #[test]
    fn get_dir_hides_dotfiles_and_classifies() {
        let dir = TempDir::new().unwrap();
        let wiki = wiki(&dir);
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::create_dir(dir.path().join("Zeta")).unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        fs::write(dir.path().join("alpha.md"), "").unwrap();
        fs::write(dir.path().join("Beta.md"), "").unwrap();

        let entries = wiki.get_dir("/").unwrap();
        let names: Vec<_> = entries.iter().map(|e| (e.name.as_str(), e.is_dir)).collect();
        assert_eq!(names, vec![("Zeta", true), ("alpha.md", false), ("Beta.md", false)]);
        assert_eq!(entries[0].uri, "/Zeta");
    }

    #[test]
    fn get_dir_nested_uris() {
        let dir = TempDir::new().unwrap();
        let wiki = wiki(&dir);
        wiki.create("docs/intro.md").unwrap();
        let entries = wiki.get_dir("docs").unwrap();
        assert_eq!(entries, vec![PageInfo { uri: "/docs/intro.md".into(), name: "intro.md".into(), is_dir: false }]);
        assert!(matches!(wiki.get_dir("docs/intro.md"), Err(WikiError::InvalidPath)));
        assert!(matches!(wiki.get_dir("nope"), Err(WikiError::NotFound)));
    }

    #[test]
    fn stat_classifies_paths() {
        let dir = TempDir::new().unwrap();
        let wiki = wiki(&dir);
        wiki.create("d/p.md").unwrap();
        assert_eq!(wiki.stat("d").unwrap(), PathKind::Directory);
        assert_eq!(wiki.stat("d/p.md").unwrap(), PathKind::File);
        assert_eq!(wiki.stat("d/q.md").unwrap(), PathKind::Missing);
    }
}
