//! Schema file discovery.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Whether the text after the last `.` of the file name is one of `extensions`.
fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    match name.to_string_lossy().rsplit_once('.') {
        Some((_, ext)) => extensions.iter().any(|accepted| accepted == ext),
        None => false,
    }
}

/// Recursively list regular files under `directory` whose extension is in
/// `extensions`, sorted by path.
pub async fn list_schema_files(directory: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();
    let mut pending = vec![directory.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        {
            let entry_path = entry.path();
            let metadata = entry
                .metadata()
                .await
                .with_context(|| format!("Failed to get metadata for: {}", entry_path.display()))?;

            if metadata.is_dir() {
                pending.push(entry_path);
            } else if metadata.is_file() && has_extension(&entry_path, extensions) {
                results.push(entry_path);
            }
        }
    }

    results.sort();

    tracing::debug!(
        "Found {} schema files in directory: {}",
        results.len(),
        directory.display()
    );

    Ok(results)
}
