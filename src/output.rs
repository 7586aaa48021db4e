//! CLI output formatting for batch runs.
//!
//! # Asset Display
//!
//! Every asset is shown as a header line (positional index + texture name) and
//! indented context lines: the source path, the suffixes that were found, and
//! what happened to it.
//!
//! ## Apply
//!
//! ```text
//! 001 T_Rock_cc_nml
//!     Source: art/rocks/T_Rock_cc_nml.png
//!     Suffixes: cc, nml
//!     Settings: address=CLAMP/CLAMP compression=NORMAL_MAP srgb=OFF mip_gen=FROM_TEXTURE_GROUP texture_group=WORLD_NORMAL_MAP
//!     Applied: address, compression, srgb, texture_group, mip_gen
//! 002 T_Rock_BAD
//!     Source: art/rocks/T_Rock_BAD.png
//!     Suffixes: (none)
//!     Rejected: suffix count does not match rule rows: expected=2, actual=0
//!     Deleted
//!
//! Applied 1, rejected 1 (1 deleted), failed 0, skipped 0 of 2 textures
//! ```
//!
//! ## Check
//!
//! Same per-asset lines without the sink lines; the summary counts valid
//! names instead of applied ones.
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::batch::{AssetOutcome, AssetReport, BatchSummary, Deletion};
use crate::config::TextureConfigParams;
use crate::naming::{file_name, file_stem};
use crate::types::WireEnum;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn context(label: &str, value: impl std::fmt::Display) -> String {
    format!("{}{}: {}", indent(1), label, value)
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

/// One-line summary of resolved settings. Unset fields are left out.
///
/// ```text
/// address=CLAMP/WRAP/MIRROR max_in_game=512 (pow2) compression=BC7 srgb=AUTO mip_gen=SHARPEN2 texture_group=WORLD
/// ```
pub fn format_settings(params: &TextureConfigParams) -> String {
    let mut parts = Vec::new();

    let axes: Vec<&str> = [params.address_u, params.address_v, params.address_z]
        .iter()
        .flatten()
        .map(|m| m.name())
        .collect();
    if !axes.is_empty() {
        parts.push(format!("address={}", axes.join("/")));
    }
    if let Some(size) = params.max_in_game {
        let pow2 = if params.enforce_pow2 { " (pow2)" } else { "" };
        parts.push(format!("max_in_game={size}{pow2}"));
    }
    if let Some(compression) = params.compression {
        parts.push(format!("compression={compression}"));
    }
    if let Some(srgb) = params.srgb {
        parts.push(format!("srgb={srgb}"));
    }
    parts.push(format!("mip_gen={}", params.mip_gen));
    parts.push(format!("texture_group={}", params.texture_group));

    parts.join(" ")
}

// ============================================================================
// Per-asset reports
// ============================================================================

/// Format one asset report. `index` is its 1-based position in the batch.
pub fn format_asset_report(index: usize, report: &AssetReport) -> Vec<String> {
    let title = file_stem(file_name(&report.path));
    let mut lines = vec![
        format!("{} {}", format_index(index), title),
        context("Source", &report.path),
    ];

    if matches!(report.outcome, AssetOutcome::OutOfScope) {
        lines.push(context("Skipped", "outside run directories"));
        return lines;
    }
    lines.push(context("Suffixes", join_or_none(&report.suffixes)));

    match &report.outcome {
        AssetOutcome::OutOfScope => {}
        AssetOutcome::SuffixRejected { error, deletion } => {
            lines.push(context("Rejected", error));
            match deletion {
                Some(Deletion::Deleted) => lines.push(format!("{}Deleted", indent(1))),
                Some(Deletion::NotDeleted) => {
                    lines.push(context("Not deleted", "asset not found"))
                }
                Some(Deletion::Failed(e)) => lines.push(context("Delete failed", e)),
                None => {}
            }
        }
        AssetOutcome::Resolved { params } => {
            lines.push(context("Settings", format_settings(params)));
        }
        AssetOutcome::Applied { params, report } => {
            lines.push(context("Settings", format_settings(params)));
            lines.push(context("Applied", join_or_none(&report.applied)));
        }
        AssetOutcome::ApplyFailed { params, report } => {
            lines.push(context("Settings", format_settings(params)));
            lines.push(context("Failed", report.errors.join("; ")));
        }
        AssetOutcome::SinkFailed { params, error } => {
            lines.push(context("Settings", format_settings(params)));
            lines.push(context("Error", error));
        }
    }
    lines
}

pub fn print_asset_report(index: usize, report: &AssetReport) {
    for line in format_asset_report(index, report) {
        println!("{}", line);
    }
}

// ============================================================================
// Batch summary
// ============================================================================

/// Format the closing summary line of an `apply` run.
pub fn format_apply_summary(summary: &BatchSummary) -> Vec<String> {
    vec![format!(
        "Applied {}, rejected {} ({} deleted), failed {}, skipped {} of {} textures",
        summary.applied(),
        summary.rejected(),
        summary.deleted(),
        summary.failed(),
        summary.out_of_scope(),
        summary.total()
    )]
}

/// Format the closing summary line of a `check` run.
pub fn format_check_summary(summary: &BatchSummary) -> Vec<String> {
    vec![format!(
        "Valid {}, rejected {}, skipped {} of {} textures",
        summary.resolved(),
        summary.rejected(),
        summary.out_of_scope(),
        summary.total()
    )]
}

pub fn print_apply_summary(summary: &BatchSummary) {
    println!();
    for line in format_apply_summary(summary) {
        println!("{}", line);
    }
}

pub fn print_check_summary(summary: &BatchSummary) {
    println!();
    for line in format_check_summary(summary) {
        println!("{}", line);
    }
}
