//! Configuration file (folio.toml) and port selection.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Port used when nothing else selects one.
pub const DEFAULT_PORT: u16 = 3005;

/// Configuration file structure (folio.toml).
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct SiteConfig {
    /// Preferred markdown source directory
    #[serde(default = "default_docs_dir")]
    pub docs_dir: PathBuf,
    /// Where pages and static assets are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Custom page template
    pub template: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            docs_dir: default_docs_dir(),
            output_dir: default_output_dir(),
            template: None,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: Option<u16>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
        }
    }
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());

    Ok(config)
}

/// Pick the listen port.
///
/// Precedence: `--port`, then `PORT`, then the config file, then
/// [`DEFAULT_PORT`]. A `PORT` value that is not a valid port is ignored with
/// a warning.
pub fn resolve_port(cli: Option<u16>, env: Option<&str>, file: Option<u16>) -> u16 {
    if let Some(port) = cli {
        return port;
    }

    if let Some(raw) = env.map(str::trim).filter(|raw| !raw.is_empty()) {
        match raw.parse::<u16>() {
            Ok(port) => return port,
            Err(_) => tracing::warn!("Ignoring invalid PORT value {:?}", raw),
        }
    }

    file.unwrap_or(DEFAULT_PORT)
}
