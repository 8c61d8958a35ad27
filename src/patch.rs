use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

/// Merge `fragment` into the marker-delimited region of the document at
/// `path`. Returns whether the content actually changed.
///
/// - Missing file: a minimal document is created around the fragment.
/// - Both markers present: only the span strictly between them is replaced;
///   every byte outside it, the markers included, is preserved exactly.
/// - Markers missing: a fresh marker block is appended, prior content
///   untouched.
///
/// Idempotent: patching twice with the same fragment leaves the file
/// byte-identical and reports `false` the second time. The file is only
/// written when the content differs.
pub fn patch_document(
    path: &Path,
    fragment: &str,
    start_marker: &str,
    end_marker: &str,
) -> Result<bool> {
    let original = match fs::read_to_string(path) {
        Ok(content) => Some(content),
        // Absence is expected on first run, not an error.
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()))
        }
    };

    let updated = match &original {
        None => {
            info!("{} does not exist, creating it", path.display());
            format!("# Credly Badges\n\n{start_marker}\n{fragment}{end_marker}\n")
        }
        Some(content) => splice(content, fragment, start_marker, end_marker),
    };

    let changed = original.as_deref() != Some(updated.as_str());
    if changed {
        write_atomic(path, &updated)?;
    }
    Ok(changed)
}

/// Replace the marker region, or append a new marker block when the markers
/// are not found. The region is the first occurrence of the start marker
/// followed by the first occurrence of the end marker *after* it; an end
/// marker that only appears earlier counts as missing.
fn splice(content: &str, fragment: &str, start_marker: &str, end_marker: &str) -> String {
    let region = content.find(start_marker).and_then(|start| {
        let insert_at = start + start_marker.len();
        content[insert_at..]
            .find(end_marker)
            .map(|offset| (insert_at, insert_at + offset))
    });

    match region {
        Some((insert_at, end_at)) => {
            format!("{}\n{fragment}{}", &content[..insert_at], &content[end_at..])
        }
        None => {
            warn!("markers not found in document, appending badge section");
            format!("{content}\n\n{start_marker}\n{fragment}{end_marker}\n")
        }
    }
}

/// Full-document replace via a temp file in the same directory. A crash can
/// leave the document unmodified but never half-written.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    fs::write(&tmp_path, content)
        .with_context(|| format!("failed to write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
