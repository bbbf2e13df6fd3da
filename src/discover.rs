use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::sidecar::sidecar_path;

/// File-name suffixes queued for annotation. Matched exactly (`photo.JPG` is not queued).
const JPEG_SUFFIXES: &[&str] = &[".jpg", ".jpeg"];

/// Collect the images under `root` that still need a sidecar annotation.
///
/// Walks the tree depth-first in directory-listing order (no sorting) and
/// follows symlinks; `walkdir` reports symlink loops as errors, which are
/// logged and skipped along with any other unreadable entry. A `root` that is
/// a file is checked on its own.
///
/// # Example
///
/// ```rust,no_run
/// use photo_geotag::discover::discover;
/// use std::path::Path;
///
/// let queue = discover(Path::new("./photos"));
/// println!("{} image(s) need a place name", queue.len());
/// ```
pub fn discover(root: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if is_eligible(path) {
            log::info!("Queued: {}", path.display());
            candidates.push(path.to_path_buf());
        } else {
            log::info!("Skipping: {}", path.display());
        }
    }

    candidates
}

/// A file is eligible when its name ends in exactly `.jpg`/`.jpeg` and it
/// has no sidecar yet.
pub fn is_eligible(path: &Path) -> bool {
    let is_jpeg = path
        .file_name()
        .map(|name| {
            let name = name.to_string_lossy();
            JPEG_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
        })
        .unwrap_or(false);

    is_jpeg && !sidecar_path(path).exists()
}
