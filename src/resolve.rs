//! Effective texture settings for one validated name.
//!
//! Resolution merges three independent lookups over the suffixes:
//!
//! 1. **Base record**: the first suffix with a `texture_config` entry, else the
//!    all-defaults record.
//! 2. **Address pair**: the first suffix in the 2D table, else the first in the
//!    3D table (W dropped), else `(WRAP, WRAP)`. The pair always replaces U/V.
//! 3. **Sub-UV size**: when enabled and any token of the whole name matches the
//!    trigger pattern, `subuv_max_in_game` replaces the max size.
//!
//! Every step copies; stored table entries are never modified.

use crate::config::{AddressPair, Config, TextureConfigParams};
use crate::naming::SuffixedName;
use crate::types::AddressMode;
use std::collections::BTreeMap;

/// Base record for the suffixes: the first one with an override entry wins.
pub fn base_params<S: AsRef<str>>(
    suffixes: &[S],
    overrides: &BTreeMap<String, TextureConfigParams>,
) -> TextureConfigParams {
    suffixes
        .iter()
        .find_map(|s| overrides.get(s.as_ref()))
        .cloned()
        .unwrap_or_default()
}

/// Address pair for the suffixes. 2D entries take priority over 3D entries
/// regardless of suffix position.
pub fn address_pair<S: AsRef<str>>(suffixes: &[S], config: &Config) -> AddressPair {
    let table = &config.address_suffix;
    suffixes
        .iter()
        .find_map(|s| table.uv.get(s.as_ref()).copied())
        .or_else(|| {
            suffixes
                .iter()
                .find_map(|s| table.uvw.get(s.as_ref()).map(|&(u, v, _)| (u, v)))
        })
        .unwrap_or((AddressMode::Wrap, AddressMode::Wrap))
}

/// Resolve the effective settings for an extracted name.
pub fn resolve(
    name: &SuffixedName,
    overrides: &BTreeMap<String, TextureConfigParams>,
    config: &Config,
) -> TextureConfigParams {
    let base = base_params(&name.suffixes, overrides);
    let (u, v) = address_pair(&name.suffixes, config);
    let params = base.with_address_uv(u, v);

    if config.subuv_triggered(&name.tokens) {
        params.with_max_in_game(config.subuv_max_in_game)
    } else {
        params
    }
}
