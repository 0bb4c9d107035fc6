//! Writing the rendered diagram to disk.

use crate::error::AppError;
use std::path::Path;

/// Write diagram text as UTF-8, creating missing parent directories.
pub fn write_diagram(path: &Path, text: &str) -> Result<(), AppError> {
    let to_error = |source: std::io::Error| AppError::Output {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_error)?;
    }
    std::fs::write(path, text).map_err(to_error)?;
    log::info!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}
