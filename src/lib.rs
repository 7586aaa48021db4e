//! # texnaming
//!
//! Suffix-driven texture settings for game asset pipelines. A texture's file
//! name says what it is: `T_Rock_cc_nml.png` is a normal map that clamps on
//! both axes. A declarative rule table says which suffixes are allowed where
//! and what each one means, and this crate turns names into settings.
//!
//! # Architecture: Per-Asset Pipeline
//!
//! The rule table is loaded once; every asset then goes through the same
//! pipeline:
//!
//! ```text
//! 1. Scope      path      →  in / out of run_dir
//! 2. Extract    file name →  trailing catalog suffixes + all tokens
//! 3. Validate   suffixes  →  positional check against the grid
//! 4. Resolve    suffixes  →  effective TextureConfigParams
//! 5. Apply      params    →  asset sink (sidecar on disk)
//! ```
//!
//! Steps 1 to 4 are pure functions over immutable inputs, so unit tests
//! exercise them without touching the filesystem. Only step 5 has side
//! effects, and it sits behind the [`sink::AssetSink`] trait.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Closed wire enums (address, compression, sRGB, size, mips, group) |
//! | [`config`] | Rule table loading, validation, canonical saving, grid construction |
//! | [`naming`] | Trailing suffix extraction from file names |
//! | [`validate`] | Positional grid validation and run-directory scoping |
//! | [`resolve`] | Merges base record, address pair and sub-UV size into final settings |
//! | [`sink`] | `AssetSink` trait, filesystem sink, sink-side size/sRGB rules |
//! | [`scan`] | Texture file discovery under input directories |
//! | [`batch`] | Runs the pipeline over many assets with independent failures |
//! | [`output`] | CLI output formatting for batch reports |
//!
//! # Design Decisions
//!
//! ## Positional Grid Over Set Membership
//!
//! `suffix_index` orders the rule rows, and each suffix must come from its own
//! row. `T_Rock_nml_cc` is rejected even though both tokens are known: the
//! convention is only useful if every name reads the same way.
//!
//! ## Strict Load, Lenient Batch
//!
//! Every problem in the rule table (unknown enum name, wrong arity, typo in a
//! key) fails the load. Once loaded, problems are per asset: a bad name or a
//! failing sink is reported and the batch moves on.
//!
//! ## Copy, Never Mutate
//!
//! Resolved settings are always fresh values. Override helpers return a new
//! record; the loaded table is never modified, so resolving the same name
//! twice gives the same answer.

pub mod batch;
pub mod config;
pub mod naming;
pub mod output;
pub mod resolve;
pub mod scan;
pub mod sink;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
