//! Batch runner: the per-asset pipeline.
//!
//! Every asset goes through the same steps, strictly one after another:
//!
//! ```text
//! path ──▶ run_dir scope ──▶ extract ──▶ validate ──▶ resolve ──▶ sink
//!              │                            │
//!              └─ OutOfScope                └─ SuffixRejected (+ optional delete)
//! ```
//!
//! Each asset ends in exactly one [`AssetOutcome`]. Failures are per asset: a
//! rejected name, a refused apply or a sink error is recorded and the batch
//! moves on to the next path.
//!
//! An empty `run_dir` list puts every asset in scope.
//!
//! Finished reports are streamed to an optional channel so the CLI can print
//! progress while the batch runs; the full list is also returned in the
//! [`BatchSummary`].

use crate::config::{Config, TextureConfigParams};
use crate::naming::extract_suffixes;
use crate::resolve::resolve;
use crate::sink::{ApplyReport, AssetSink};
use crate::validate::{SuffixGrid, SuffixMismatch, is_under_any, validate_suffixes};
use std::sync::mpsc::Sender;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Delete assets whose names fail validation.
    pub delete_on_suffix_error: bool,
}

/// What happened when a rejected asset was deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    Deleted,
    /// The sink had nothing to delete.
    NotDeleted,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssetOutcome {
    /// Not under any configured run directory; untouched.
    OutOfScope,
    /// The name failed validation. `deletion` is set when deletion was requested.
    SuffixRejected {
        error: SuffixMismatch,
        deletion: Option<Deletion>,
    },
    /// Validated and resolved; no sink was involved (check mode).
    Resolved { params: TextureConfigParams },
    /// The sink applied every field.
    Applied {
        params: TextureConfigParams,
        report: ApplyReport,
    },
    /// The sink refused one or more fields and kept nothing.
    ApplyFailed {
        params: TextureConfigParams,
        report: ApplyReport,
    },
    /// The sink raised.
    SinkFailed {
        params: TextureConfigParams,
        error: String,
    },
}

/// One asset's trip through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetReport {
    pub path: String,
    /// Trailing suffixes found in the name.
    pub suffixes: Vec<String>,
    /// All tokens of the name.
    pub tokens: Vec<String>,
    pub outcome: AssetOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub reports: Vec<AssetReport>,
}

impl BatchSummary {
    fn count(&self, pred: impl Fn(&AssetOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn out_of_scope(&self) -> usize {
        self.count(|o| matches!(o, AssetOutcome::OutOfScope))
    }

    pub fn rejected(&self) -> usize {
        self.count(|o| matches!(o, AssetOutcome::SuffixRejected { .. }))
    }

    pub fn deleted(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                AssetOutcome::SuffixRejected {
                    deletion: Some(Deletion::Deleted),
                    ..
                }
            )
        })
    }

    pub fn resolved(&self) -> usize {
        self.count(|o| matches!(o, AssetOutcome::Resolved { .. }))
    }

    pub fn applied(&self) -> usize {
        self.count(|o| matches!(o, AssetOutcome::Applied { .. }))
    }

    /// Assets the sink refused or raised on.
    pub fn failed(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                AssetOutcome::ApplyFailed { .. } | AssetOutcome::SinkFailed { .. }
            )
        })
    }
}

/// Run every path through the pipeline, applying settings through `sink`.
pub fn run_batch<P: AsRef<str>>(
    paths: &[P],
    config: &Config,
    sink: &dyn AssetSink,
    options: BatchOptions,
    events: Option<Sender<AssetReport>>,
) -> BatchSummary {
    run(paths, config, Some(sink), options, events)
}

/// Validate and resolve every path without touching any asset.
pub fn check_batch<P: AsRef<str>>(
    paths: &[P],
    config: &Config,
    events: Option<Sender<AssetReport>>,
) -> BatchSummary {
    run(paths, config, None, BatchOptions::default(), events)
}

fn run<P: AsRef<str>>(
    paths: &[P],
    config: &Config,
    sink: Option<&dyn AssetSink>,
    options: BatchOptions,
    events: Option<Sender<AssetReport>>,
) -> BatchSummary {
    let grid = config.build_suffix_grid();
    let catalog = grid.catalog();
    let mut summary = BatchSummary::default();

    for path in paths {
        let report = process_asset(path.as_ref(), config, &grid, &catalog, sink, options);
        if let Some(tx) = &events {
            // The receiver may have hung up; the summary still has everything.
            let _ = tx.send(report.clone());
        }
        summary.reports.push(report);
    }
    summary
}

fn process_asset(
    path: &str,
    config: &Config,
    grid: &SuffixGrid,
    catalog: &[String],
    sink: Option<&dyn AssetSink>,
    options: BatchOptions,
) -> AssetReport {
    let name = extract_suffixes(path, catalog);
    let report = |outcome| AssetReport {
        path: path.to_string(),
        suffixes: name.suffixes.clone(),
        tokens: name.tokens.clone(),
        outcome,
    };

    if !config.run_dir.is_empty() && !is_under_any(path, &config.run_dir) {
        debug!(path, "outside run directories, skipped");
        return report(AssetOutcome::OutOfScope);
    }

    debug!(path, tokens = ?name.tokens, suffixes = ?name.suffixes, "extracted suffixes");

    if let Err(mismatch) = validate_suffixes(&name.suffixes, grid) {
        warn!(path, error = %mismatch, "suffix rejected");
        let deletion = match sink {
            Some(sink) if options.delete_on_suffix_error => Some(delete(sink, path)),
            _ => None,
        };
        return report(AssetOutcome::SuffixRejected {
            error: mismatch,
            deletion,
        });
    }

    let params = resolve(&name, &config.texture_config, config);
    debug!(path, ?params, "resolved texture settings");

    let Some(sink) = sink else {
        return report(AssetOutcome::Resolved { params });
    };

    match sink.apply_settings(path, &params) {
        Ok(applied) if applied.ok => {
            info!(path, fields = %applied.applied.join(", "), "texture configured");
            report(AssetOutcome::Applied {
                params,
                report: applied,
            })
        }
        Ok(refused) => {
            warn!(path, errors = ?refused.errors, "texture settings refused");
            report(AssetOutcome::ApplyFailed {
                params,
                report: refused,
            })
        }
        Err(e) => {
            error!(path, error = %e, "sink raised");
            report(AssetOutcome::SinkFailed {
                params,
                error: e.to_string(),
            })
        }
    }
}

fn delete(sink: &dyn AssetSink, path: &str) -> Deletion {
    match sink.delete_asset(path) {
        Ok(true) => {
            info!(path, "deleted asset with invalid suffixes");
            Deletion::Deleted
        }
        Ok(false) => Deletion::NotDeleted,
        Err(e) => {
            error!(path, error = %e, "delete failed");
            Deletion::Failed(e.to_string())
        }
    }
}
