//! I/O helpers for grayscale images and JSON debug dumps.

use super::GrayBuffer;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit grayscale.
pub fn load_grayscale(path: &Path) -> Result<GrayBuffer, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let w = img.width() as usize;
    let h = img.height() as usize;
    Ok(GrayBuffer::from_raw(w, h, img.into_raw()))
}

/// Save a grayscale buffer to a PNG (or whatever the extension names).
pub fn save_grayscale(buffer: &GrayBuffer, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let img: image::GrayImage =
        image::ImageBuffer::from_raw(buffer.w as u32, buffer.h as u32, buffer.data.clone())
            .ok_or_else(|| "Failed to create image buffer".to_string())?;
    img.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
