//! Asset sinks: where resolved settings end up.
//!
//! The [`AssetSink`] trait is the boundary between pure resolution and the
//! asset store. It has two operations, apply and delete. A sink reports
//! failures in two ways:
//!
//! - `Ok(ApplyReport { ok: false, .. })`: the sink looked at the asset and
//!   refused one or more fields. Nothing is kept.
//! - `Err(SinkError)`: the sink could not work on the asset at all (missing
//!   file, not an image, I/O failure).
//!
//! Either way only that asset fails; the batch keeps going.
//!
//! The production implementation is [`FsSink`]: image files on disk, with the
//! effective settings recorded in a JSON sidecar next to each image.

mod calculations;
pub mod fs_sink;

pub use calculations::{auto_srgb, effective_max_size};
pub use fs_sink::{FsSink, TextureRecord, sidecar_path};

use crate::config::TextureConfigParams;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("asset not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("not a texture: {}: {reason}", .path.display())]
    NotATexture { path: PathBuf, reason: String },
    #[error("unreadable settings record {}: {reason}", .path.display())]
    Record { path: PathBuf, reason: String },
}

/// Outcome of applying settings to one asset.
///
/// `applied` lists the fields written, in application order: `address`,
/// `max_in_game`, `compression`, `srgb`, `texture_group`, `mip_gen`. When `ok`
/// is false every change was rolled back and `applied` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub ok: bool,
    pub applied: Vec<String>,
    pub errors: Vec<String>,
}

impl Default for ApplyReport {
    fn default() -> Self {
        Self {
            ok: true,
            applied: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl ApplyReport {
    pub(crate) fn mark_applied(&mut self, field: &str) {
        self.applied.push(field.to_string());
    }

    pub(crate) fn mark_failed(&mut self, field: &str, message: impl std::fmt::Display) {
        self.ok = false;
        self.errors.push(format!("{field}: {message}"));
    }
}

/// Destination for resolved texture settings.
pub trait AssetSink {
    /// Apply resolved settings to the asset at `locator`.
    fn apply_settings(
        &self,
        locator: &str,
        params: &TextureConfigParams,
    ) -> Result<ApplyReport, SinkError>;

    /// Delete the asset. `Ok(false)` when there was nothing to delete.
    fn delete_asset(&self, locator: &str) -> Result<bool, SinkError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock sink that records calls and replays queued responses.
    ///
    /// With nothing queued, applies succeed (recording the two fields every
    /// apply writes) and deletes return `true`.
    #[derive(Default)]
    pub struct MockSink {
        pub apply_results: Mutex<Vec<Result<ApplyReport, SinkError>>>,
        pub delete_results: Mutex<Vec<Result<bool, SinkError>>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Apply {
            locator: String,
            params: TextureConfigParams,
        },
        Delete(String),
    }

    impl MockSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue apply responses, consumed in order.
        pub fn with_apply_results(mut results: Vec<Result<ApplyReport, SinkError>>) -> Self {
            results.reverse();
            Self {
                apply_results: Mutex::new(results),
                ..Self::default()
            }
        }

        /// Queue delete responses, consumed in order.
        pub fn with_delete_results(mut results: Vec<Result<bool, SinkError>>) -> Self {
            results.reverse();
            Self {
                delete_results: Mutex::new(results),
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl AssetSink for MockSink {
        fn apply_settings(
            &self,
            locator: &str,
            params: &TextureConfigParams,
        ) -> Result<ApplyReport, SinkError> {
            self.operations.lock().unwrap().push(RecordedOp::Apply {
                locator: locator.to_string(),
                params: params.clone(),
            });

            self.apply_results.lock().unwrap().pop().unwrap_or_else(|| {
                let mut report = ApplyReport::default();
                for field in ["texture_group", "mip_gen"] {
                    report.mark_applied(field);
                }
                Ok(report)
            })
        }

        fn delete_asset(&self, locator: &str) -> Result<bool, SinkError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Delete(locator.to_string()));

            self.delete_results.lock().unwrap().pop().unwrap_or(Ok(true))
        }
    }

    #[test]
    fn failed_field_clears_ok() {
        let mut report = ApplyReport::default();
        assert!(report.ok);
        report.mark_applied("address");
        report.mark_failed("srgb", "no compression");
        assert!(!report.ok);
        assert_eq!(report.errors, vec!["srgb: no compression"]);
        assert_eq!(report.applied, vec!["address"]);
    }

    #[test]
    fn mock_replays_queued_results_in_order() {
        let sink = MockSink::with_delete_results(vec![Ok(false), Ok(true)]);
        assert!(!sink.delete_asset("a").unwrap());
        assert!(sink.delete_asset("b").unwrap());
        assert!(sink.delete_asset("c").unwrap());
        assert_eq!(
            sink.get_operations(),
            vec![
                RecordedOp::Delete("a".into()),
                RecordedOp::Delete("b".into()),
                RecordedOp::Delete("c".into()),
            ]
        );
    }

    #[test]
    fn sink_errors_display_paths() {
        let err = SinkError::NotFound(PathBuf::from("art/T_cc_col.png"));
        assert_eq!(err.to_string(), "asset not found: art/T_cc_col.png");
        let err = SinkError::NotATexture {
            path: PathBuf::from("a.png"),
            reason: "bad header".into(),
        };
        assert_eq!(err.to_string(), "not a texture: a.png: bad header");
    }
}
