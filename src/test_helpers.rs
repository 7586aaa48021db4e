//! Shared test utilities for the texnaming test suite.
//!
//! Provides a small reference rule table, shortcuts for building configs and
//! extracted names from it, and lookup helpers for batch reports.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let config = reference_config();
//! let name = extracted("/Game/Rocks/T_Rock_cc_col.png", &config);
//! assert_eq!(name.suffixes, vec!["cc", "col"]);
//! ```

use serde_json::{Value, json};

use crate::batch::{AssetReport, BatchSummary};
use crate::config::Config;
use crate::naming::{SuffixedName, extract_suffixes};

// =========================================================================
// Reference rule table
// =========================================================================

/// A compact rule table in canonical form: saving it reproduces it exactly.
///
/// Grid: row 0 is the 2D address table (`cc`, `cw`, `ww`), row 1 the texture
/// type (`col`, `msk`, `nml`).
pub fn reference_document() -> Value {
    json!({
        "run_dir": [],
        "texture_type": ["col", "msk", "nml"],
        "address_suffix_2d": {
            "cc": ["CLAMP", "CLAMP"],
            "cw": ["CLAMP", "WRAP"],
            "ww": ["WRAP", "WRAP"]
        },
        "suffix_index": ["address_suffix_2d", "texture_type"],
        "texture_config": {
            "col": {
                "compression": "DEFAULT",
                "srgb": "ON",
                "mip_gen": "FROM_TEXTURE_GROUP",
                "texture_group": "WORLD"
            },
            "msk": {
                "compression": "MASKS",
                "srgb": "OFF",
                "mip_gen": "FROM_TEXTURE_GROUP",
                "texture_group": "WORLD"
            },
            "nml": {
                "compression": "NORMAL_MAP",
                "srgb": "OFF",
                "mip_gen": "FROM_TEXTURE_GROUP",
                "texture_group": "WORLD_NORMAL_MAP"
            }
        },
        "enable_subuv_texture_override": true,
        "subuv_max_in_game": 512
    })
}

/// [`reference_document`] loaded into a [`Config`].
pub fn reference_config() -> Config {
    Config::from_value(&reference_document()).expect("reference document must load")
}

/// Load a modified reference document.
pub fn config_with(edit: impl FnOnce(&mut Value)) -> Config {
    let mut doc = reference_document();
    edit(&mut doc);
    Config::from_value(&doc).expect("edited reference document must load")
}

/// Extract a path's suffixes against the config's flattened grid.
pub fn extracted(path: &str, config: &Config) -> SuffixedName {
    extract_suffixes(path, &config.build_suffix_grid().catalog())
}

/// Owned string list from literals.
pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// =========================================================================
// Batch report lookups: panics with a clear message on miss
// =========================================================================

/// Find the report for a path. Panics if not found.
pub fn find_report<'a>(summary: &'a BatchSummary, path: &str) -> &'a AssetReport {
    summary
        .reports
        .iter()
        .find(|r| r.path == path)
        .unwrap_or_else(|| {
            let paths: Vec<&str> = summary.reports.iter().map(|r| r.path.as_str()).collect();
            panic!("report for '{path}' not found. Available: {paths:?}")
        })
}

/// All report paths in batch order.
pub fn report_paths(summary: &BatchSummary) -> Vec<&str> {
    summary.reports.iter().map(|r| r.path.as_str()).collect()
}
