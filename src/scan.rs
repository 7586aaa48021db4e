//! Texture file discovery.
//!
//! Turns the paths given on the command line into the list of assets a batch
//! runs over. Files are taken as-is; directories are walked for texture files:
//!
//! ```text
//! art/                          # texnaming apply art/
//! ├── rocks/
//! │   ├── T_Rock_cc_col.png     ✓
//! │   ├── T_Rock_cc_col.png.texture.json
//! │   └── notes.txt
//! ├── .cache/T_Tmp_cc_col.png   (hidden, skipped)
//! └── T_Sky_ww_col.tga          ✓
//! ```
//!
//! Results are sorted and de-duplicated so batch output is stable across runs
//! and platforms. Finding nothing is not an error.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions recognized as texture files (matched case-insensitively).
const TEXTURE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tga", "tif", "tiff", "webp"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Path not found: {0}")]
    NotFound(PathBuf),
}

/// Whether a path has a texture extension.
pub fn is_texture(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| TEXTURE_EXTENSIONS.contains(&ext.as_str()))
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Texture files under `dir`, sorted. Only the top level when not `recursive`.
pub fn collect_texture_paths(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::NotFound(dir.to_path_buf()));
    }

    let mut walker = WalkDir::new(dir).follow_links(true);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut found = BTreeSet::new();
    for entry in walker.into_iter().filter_entry(|e| !is_hidden(e)) {
        let entry = entry?;
        if entry.file_type().is_file() && is_texture(entry.path()) {
            found.insert(entry.into_path());
        }
    }
    Ok(found.into_iter().collect())
}

/// Expand command-line inputs: files are used directly, directories are
/// scanned. The combined list is sorted and de-duplicated.
pub fn expand_inputs(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>, ScanError> {
    let mut all = BTreeSet::new();
    for input in inputs {
        if input.is_dir() {
            all.extend(collect_texture_paths(input, recursive)?);
        } else if input.is_file() {
            all.insert(input.clone());
        } else {
            return Err(ScanError::NotFound(input.clone()));
        }
    }
    Ok(all.into_iter().collect())
}
