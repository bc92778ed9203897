//! TOML configuration for the server.
//!
//! Every field has a default, so the server runs with no configuration file at
//! all. An explicitly passed `--config` path must exist; the default path is
//! simply skipped when missing.
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "atelier.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration file: {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub server: ServerSection,
    pub content: ContentSection,
    pub contact: ContactSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Name shown in the startup banner. Default: `"Atelier"`
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Address to bind. Default: `127.0.0.1`
    pub address: IpAddr,
    /// Port to listen on; when taken, the next free port is used. Default: `3000`
    pub port: u16,
    /// Directory of static files served at the root. Default: `"public"`
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentSection {
    /// Root of the markdown content tree. Default: `"content"`
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContactSection {
    /// Contact submissions allowed per client per window. Default: `3`
    pub rate_limit: u32,
    /// Length of the rate-limit window, in seconds. Default: `60`
    pub rate_window_secs: u64,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            name: "Atelier".to_string(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            address: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            static_dir: PathBuf::from("public"),
        }
    }
}

impl Default for ContentSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("content"),
        }
    }
}

impl Default for ContactSection {
    fn default() -> Self {
        Self {
            rate_limit: 3,
            rate_window_secs: 60,
        }
    }
}

impl SiteConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolve the configuration for a subcommand.
///
/// `explicit` comes from `--config` and must exist. Without it, the default
/// path is read when present and the built-in defaults are used otherwise.
pub fn load_or_default(explicit: Option<&Path>) -> Result<SiteConfig, ConfigError> {
    match explicit {
        Some(path) => SiteConfig::from_file(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                SiteConfig::from_file(default)
            } else {
                Ok(SiteConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.site.name, "Atelier");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.address, IpAddr::from([127, 0, 0, 1]));
        assert_eq!(config.content.dir, PathBuf::from("content"));
        assert_eq!(config.contact.rate_limit, 3);
        assert_eq!(config.contact.rate_window_secs, 60);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[server]\nport = 8080\n").unwrap();

        let config = SiteConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.site.name, "Atelier");
        assert_eq!(config.contact.rate_limit, 3);
    }

    #[test]
    fn test_full_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[site]
name = "Studio"

[server]
address = "0.0.0.0"
port = 4000
static_dir = "dist"

[content]
dir = "material"

[contact]
rate_limit = 10
rate_window_secs = 120
"#,
        )
        .unwrap();

        let config = SiteConfig::from_file(file.path()).unwrap();
        assert_eq!(config.site.name, "Studio");
        assert_eq!(config.server.address, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.static_dir, PathBuf::from("dist"));
        assert_eq!(config.content.dir, PathBuf::from("material"));
        assert_eq!(config.contact.rate_limit, 10);
        assert_eq!(config.contact.rate_window_secs, 120);
    }

    #[test]
    fn test_invalid_file_is_a_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[server\nport = , 8080\n").unwrap();

        assert!(matches!(
            SiteConfig::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let result = load_or_default(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
