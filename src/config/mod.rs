use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_PORT: u16 = 5004;
const DEFAULT_HOST: &str = "0.0.0.0";

/// Application configuration and constants
#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: Arc<PathBuf>,
    pub static_dir: Arc<PathBuf>,
    pub port: u16,
    pub host: String,
    /// Version control executable invoked for commits
    pub git_binary: String,
    pub autocommit: bool,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            base_dir: Arc::new(PathBuf::from("wiki")),
            static_dir: Arc::new(PathBuf::from("static")),
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
            git_binary: "git".to_string(),
            autocommit: true,
        }
    }

    /// Create configuration with custom values
    pub fn with_custom(
        base_dir: PathBuf,
        static_dir: PathBuf,
        port: Option<u16>,
        host: Option<String>,
    ) -> Self {
        Self {
            base_dir: Arc::new(base_dir),
            static_dir: Arc::new(static_dir),
            port: port.unwrap_or(DEFAULT_PORT),
            host: host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            ..Self::new()
        }
    }

    /// Read configuration from `WIKI_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();
        if let Some(root) = lookup("WIKI_ROOT") {
            config.base_dir = Arc::new(PathBuf::from(root));
        }
        if let Some(dir) = lookup("WIKI_STATIC") {
            config.static_dir = Arc::new(PathBuf::from(dir));
        }
        if let Some(host) = lookup("WIKI_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("WIKI_PORT") {
            match port.parse() {
                Ok(p) => config.port = p,
                Err(_) => log::warn!("Ignoring invalid WIKI_PORT '{}'", port),
            }
        }
        if let Some(git) = lookup("WIKI_GIT") {
            config.git_binary = git;
        }
        if let Some(flag) = lookup("WIKI_AUTOCOMMIT") {
            config.autocommit = !matches!(flag.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off");
        }
        config
    }

    /// Get the socket address for binding
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        let ip = self.host.parse().unwrap_or_else(|_| {
            log::warn!("Invalid host '{}', binding to {}", self.host, DEFAULT_HOST);
            std::net::IpAddr::from([0, 0, 0, 0])
        });
        std::net::SocketAddr::new(ip, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.base_dir.as_ref(), &PathBuf::from("wiki"));
        assert_eq!(config.port, 5004);
        assert_eq!(config.git_binary, "git");
        assert!(config.autocommit);
    }

    #[test]
    fn environment_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("WIKI_ROOT", "/srv/pages"),
            ("WIKI_PORT", "8080"),
            ("WIKI_HOST", "127.0.0.1"),
            ("WIKI_AUTOCOMMIT", "off"),
        ]));
        assert_eq!(config.base_dir.as_ref(), &PathBuf::from("/srv/pages"));
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert!(!config.autocommit);
    }

    #[test]
    fn bad_port_keeps_default() {
        let config = Config::from_lookup(lookup_from(&[("WIKI_PORT", "lots")]));
        assert_eq!(config.port, 5004);
    }
}
