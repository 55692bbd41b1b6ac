//! File export and import at the editor's boundary.
//!
//! Export writes the active document to a real file named
//! `<folder>_<filename>`, appending `.txt` only when the tab name carries
//! no extension. Import reads a file into a `(tab name, content)` payload.

use std::io;
use std::path::{Path, PathBuf};

/// Build the exported file name from the folder label and tab name.
pub fn export_file_name(folder: &str, filename: &str) -> String {
    let extension = if filename.contains('.') { "" } else { ".txt" };
    format!("{}_{}{}", folder, filename, extension)
}

/// Write `content` into `dir` under the export naming scheme. Returns the
/// full path of the written file.
pub fn export_document(
    dir: &Path,
    folder: &str,
    filename: &str,
    content: &str,
) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(folder, filename));
    std::fs::write(&path, content)?;
    tracing::info!(path = %path.display(), bytes = content.len(), "exported document");
    Ok(path)
}

/// Read a file into an import payload: the tab is named after the file.
pub fn read_payload(path: &Path) -> io::Result<(String, String)> {
    let content = std::fs::read_to_string(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Untitled".to_string());
    Ok((name, content))
}
