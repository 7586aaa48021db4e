//! Positional suffix validation and run-directory scoping.
//!
//! ## Suffix Grid
//!
//! The grid is an ordered list of rows, one per `suffix_index` entry. Row *i*
//! lists the tokens allowed at suffix position *i*. A name is valid only when it
//! carries exactly one suffix per row, each allowed by its row:
//!
//! ```text
//! grid:      [cc, cw, ww]   [col, msk, nml]
//! T_Rock_cc_col   ✓            ✓            ok
//! T_Rock_col_cc   ✗                         row 0
//! T_Rock_col                                count: expected=2, actual=1
//! ```
//!
//! Comparison ignores case, so `T_Rock_CC_col` passes. This is a strict schema
//! check, not set membership.
//!
//! ## Run Directories
//!
//! [`is_under_any`] decides whether an asset path lives at or below one of the
//! configured roots. Boundaries are path-component aware: `/Game/VFX` contains
//! `/Game/VFX/Smoke/T.T` but not `/Game/VFXFoo/T.T`.

use std::collections::BTreeSet;
use thiserror::Error;

/// Allowed tokens shown in a row mismatch message.
const PREVIEW_LIMIT: usize = 8;

/// Ordered per-position allowed-token rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuffixGrid {
    rows: Vec<Vec<String>>,
}

impl SuffixGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every token any row allows, sorted and de-duplicated. This is the
    /// extraction catalog.
    pub fn catalog(&self) -> Vec<String> {
        self.rows
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuffixMismatch {
    /// The name carries the wrong number of suffixes.
    #[error("suffix count does not match rule rows: expected={expected}, actual={actual}")]
    Count { expected: usize, actual: usize },
    /// A suffix is not allowed at its position.
    #[error("row {row}: suffix '{token}' is not allowed. allowed: [{allowed}]")]
    Row {
        row: usize,
        token: String,
        allowed: String,
    },
}

impl SuffixMismatch {
    /// 0-based grid row that failed. `None` for a count mismatch.
    pub fn failed_row_index(&self) -> Option<usize> {
        match self {
            SuffixMismatch::Count { .. } => None,
            SuffixMismatch::Row { row, .. } => Some(*row),
        }
    }
}

/// Check suffixes against the grid position by position.
///
/// On success returns the per-row matches, which are the input suffixes with
/// their original case.
pub fn validate_suffixes<S: AsRef<str>>(
    suffixes: &[S],
    grid: &SuffixGrid,
) -> Result<Vec<String>, SuffixMismatch> {
    if suffixes.len() != grid.len() {
        return Err(SuffixMismatch::Count {
            expected: grid.len(),
            actual: suffixes.len(),
        });
    }

    for (row, (token, allowed)) in suffixes.iter().zip(grid.rows()).enumerate() {
        let token = token.as_ref();
        let lowered = token.to_lowercase();
        if !allowed.iter().any(|a| a.to_lowercase() == lowered) {
            return Err(SuffixMismatch::Row {
                row,
                token: token.to_string(),
                allowed: allowed_preview(allowed),
            });
        }
    }

    Ok(suffixes.iter().map(|s| s.as_ref().to_string()).collect())
}

/// Lower-cased allowed tokens in row order, duplicates removed, capped at
/// [`PREVIEW_LIMIT`] with a trailing `...` when cut.
fn allowed_preview(allowed: &[String]) -> String {
    let mut seen = Vec::new();
    for token in allowed {
        let lowered = token.to_lowercase();
        if !seen.contains(&lowered) {
            seen.push(lowered);
        }
    }
    let truncated = seen.len() > PREVIEW_LIMIT;
    seen.truncate(PREVIEW_LIMIT);
    let mut preview = seen.join(", ");
    if truncated {
        preview.push_str("...");
    }
    preview
}

// =============================================================================
// Run directories
// =============================================================================

/// Canonical form of an asset path: trimmed, forward slashes only, no repeated
/// slashes, no trailing slash except for the root itself.
pub fn normalize_asset_path(path: &str) -> String {
    let mut s = path.trim().replace('\\', "/");
    while s.contains("//") {
        s = s.replace("//", "/");
    }
    if s.len() > 1 && s.ends_with('/') {
        s.pop();
    }
    s
}

/// Directory part of an asset path. The last component is always treated as
/// the asset itself, so `/Game/VFX` lives in `/Game`.
fn asset_dir(path: &str) -> Option<String> {
    let s = normalize_asset_path(path);
    match s.rfind('/') {
        Some(0) => Some("/".to_string()),
        Some(i) => Some(s[..i].to_string()),
        None => None,
    }
}

/// Whether `dir` equals `root` or lies below it.
fn dir_is_under(dir: &str, root: &str) -> bool {
    let root = normalize_asset_path(root);
    if dir.is_empty() || root.is_empty() {
        return false;
    }
    dir == root || dir.starts_with(&format!("{root}/"))
}

/// True when the asset's directory is one of `roots` or below one of them.
/// Case-sensitive; empty roots never match.
pub fn is_under_any<S: AsRef<str>>(asset_path: &str, roots: &[S]) -> bool {
    match asset_dir(asset_path) {
        Some(dir) => roots.iter().any(|root| dir_is_under(&dir, root.as_ref())),
        None => false,
    }
}
