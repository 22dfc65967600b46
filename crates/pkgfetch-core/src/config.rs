use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/pkgfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PkgfetchConfig {
    /// Directory downloads land in when a request names none.
    /// Defaults to `~/.cache/pkgfetch/downloads`.
    pub download_dir: Option<PathBuf>,
    /// Ignore ETag/Last-Modified validators and compare only Content-Length
    /// against the cached file's size. Useful for URLs that always redirect
    /// to different mirrors and would re-download needlessly otherwise.
    pub check_filesize_only: bool,
    /// Seconds allowed for the TCP/TLS connect phase.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for the whole transfer.
    pub transfer_timeout_secs: u64,
}

impl Default for PkgfetchConfig {
    fn default() -> Self {
        Self {
            download_dir: None,
            check_filesize_only: false,
            connect_timeout_secs: 30,
            transfer_timeout_secs: 3600,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pkgfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Default downloads directory: `~/.cache/pkgfetch/downloads`.
pub fn default_download_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pkgfetch")?;
    Ok(xdg_dirs.get_cache_home().join("downloads"))
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PkgfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PkgfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: PkgfetchConfig = toml::from_str(&data)?;
    Ok(cfg)
}
