//! `pkgfetch inspect <path>` – show stored validators for a download.

use anyhow::{Context, Result};
use pkgfetch_core::store;
use std::path::Path;

pub fn run_inspect(path: &Path, json: bool) -> Result<()> {
    let meta = std::fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
    let stored = store::read_validators(path);

    if json {
        let value = serde_json::json!({
            "pathname": path.display().to_string(),
            "size": meta.len(),
            "etag": stored.etag,
            "last_modified": stored.last_modified,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", path.display());
    println!("  size:          {} bytes", meta.len());
    println!("  etag:          {}", stored.etag.as_deref().unwrap_or("-"));
    println!(
        "  last-modified: {}",
        stored.last_modified.as_deref().unwrap_or("-")
    );
    Ok(())
}
