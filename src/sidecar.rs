use std::path::{Path, PathBuf};

use crate::geocode::PlaceLabel;

/// Path of the annotation for `image`: the full file name with `.txt` appended.
pub fn sidecar_path(image: &Path) -> PathBuf {
    let mut path = image.as_os_str().to_owned();
    path.push(".txt");
    PathBuf::from(path)
}

/// Write `label` as the entire UTF-8 contents of the image's sidecar file,
/// creating or truncating it.
pub fn write_sidecar(image: &Path, label: &PlaceLabel) -> std::io::Result<PathBuf> {
    let path = sidecar_path(image);
    std::fs::write(&path, label.as_str())?;
    log::debug!("Sidecar written: {}", path.display());
    Ok(path)
}
