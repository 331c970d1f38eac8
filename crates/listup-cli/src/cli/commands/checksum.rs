//! `listup checksum <path>` – show declared and computed checksum of a list file.

use anyhow::{Context, Result};
use listup_core::checksum::ChecksumMarker;
use std::path::Path;

pub fn run_checksum(path: &Path) -> Result<()> {
    let data = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let marker = ChecksumMarker::extract(&String::from_utf8_lossy(&data));

    let status = match &marker.declared {
        None => "no checksum declared",
        Some(_) if marker.validate() => "valid",
        Some(_) => "MISMATCH",
    };
    println!("computed  {}", marker.computed);
    println!("declared  {}", marker.declared.as_deref().unwrap_or("-"));
    println!("status    {status}");
    Ok(())
}
