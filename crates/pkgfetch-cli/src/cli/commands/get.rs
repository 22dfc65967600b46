//! `pkgfetch get <url>` – conditional download into the cache.

use anyhow::Result;
use pkgfetch_core::config::PkgfetchConfig;
use pkgfetch_core::download::{download, DownloadRequest};
use std::path::PathBuf;

#[allow(clippy::too_many_arguments)]
pub fn run_get(
    cfg: &PkgfetchConfig,
    url: String,
    download_dir: Option<PathBuf>,
    filename: Option<String>,
    check_filesize_only: bool,
    local_file: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let request = DownloadRequest {
        url,
        download_dir,
        filename,
        check_filesize_only,
        local_file,
    };
    let outcome = download(&request, cfg)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }
    if outcome.changed {
        println!("Downloaded {}", outcome.pathname.display());
    } else {
        println!("Unchanged; using existing {}", outcome.pathname.display());
    }
    Ok(())
}
