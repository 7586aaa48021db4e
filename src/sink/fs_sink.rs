//! Filesystem asset sink.
//!
//! The asset store is a plain directory of images. A locator is an image path;
//! applying settings records the effective texture settings in a sidecar next to
//! the image:
//!
//! ```text
//! art/rocks/T_Rock_cc_col.png
//! art/rocks/T_Rock_cc_col.png.texture.json
//! ```
//!
//! ```json
//! {
//!   "address_x": "CLAMP",
//!   "address_y": "CLAMP",
//!   "compression_settings": "DEFAULT",
//!   "srgb": true,
//!   "lod_group": "WORLD",
//!   "mip_gen_settings": "FROM_TEXTURE_GROUP"
//! }
//! ```
//!
//! An existing sidecar is the starting point: fields the params leave unset keep
//! their recorded values, and keys this tool does not know are carried over.
//!
//! ## Apply Semantics
//!
//! 1. The image must exist and its header must decode (`image` crate probe),
//!    otherwise the apply raises.
//! 2. Fields are applied in order: `address`, `max_in_game`, `compression`,
//!    `srgb`, `texture_group`, `mip_gen`. A field that fails is reported and
//!    the rest are still attempted.
//! 3. If every field succeeded the sidecar is written atomically (temp file +
//!    rename). Otherwise nothing is written and `applied` is cleared.

use super::calculations::{auto_srgb, effective_max_size};
use super::{ApplyReport, AssetSink, SinkError};
use crate::config::TextureConfigParams;
use crate::types::{AddressMode, CompressionKind, MipGenKind, SrgbMode, TextureGroupKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extension appended to the image file name for its settings sidecar.
const SIDECAR_SUFFIX: &str = ".texture.json";

/// Stored texture settings, as the asset store sees them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_x: Option<AddressMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_y: Option<AddressMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_z: Option<AddressMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_texture_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_settings: Option<CompressionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srgb: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lod_group: Option<TextureGroupKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mip_gen_settings: Option<MipGenKind>,
    /// Keys written by other tools, preserved on rewrite.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl TextureRecord {
    /// Read a sidecar. A missing file is an empty record.
    pub fn load(path: &Path) -> Result<Self, SinkError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map_err(|e| SinkError::Record {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Write a sidecar atomically: a temp file next to it, then a rename.
    pub fn save(&self, path: &Path) -> Result<(), SinkError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| SinkError::Record {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let tmp = temp_path(path);
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

/// Sidecar path for an image: `T.png` → `T.png.texture.json`.
pub fn sidecar_path(image: &Path) -> PathBuf {
    let mut name = image.as_os_str().to_owned();
    name.push(SIDECAR_SUFFIX);
    PathBuf::from(name)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// sRGB flag for a mode, given the compression in effect.
fn desired_srgb(mode: SrgbMode, compression: Option<CompressionKind>) -> Result<bool, String> {
    match mode {
        SrgbMode::On => Ok(true),
        SrgbMode::Off => Ok(false),
        SrgbMode::Auto => compression
            .map(auto_srgb)
            .ok_or_else(|| "failed to read compression settings for AUTO sRGB".to_string()),
    }
}

/// Sink over image files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSink;

impl FsSink {
    pub fn new() -> Self {
        Self
    }

    /// Confirm the locator names a readable image and return its path.
    fn probe(&self, locator: &str) -> Result<PathBuf, SinkError> {
        let path = PathBuf::from(locator);
        if !path.is_file() {
            return Err(SinkError::NotFound(path));
        }
        let (width, height) =
            image::image_dimensions(&path).map_err(|e| SinkError::NotATexture {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        debug!(path = %path.display(), width, height, "probed texture");
        Ok(path)
    }
}

impl AssetSink for FsSink {
    fn apply_settings(
        &self,
        locator: &str,
        params: &TextureConfigParams,
    ) -> Result<ApplyReport, SinkError> {
        let image = self.probe(locator)?;
        let sidecar = sidecar_path(&image);
        let mut record = TextureRecord::load(&sidecar)?;
        let mut report = ApplyReport::default();

        // 1) Address
        if let (Some(u), Some(v)) = (params.address_u, params.address_v) {
            record.address_x = Some(u);
            record.address_y = Some(v);
            if let Some(z) = params.address_z {
                record.address_z = Some(z);
            }
            report.mark_applied("address");
        }

        // 2) Max in-game size
        if let Some(size) = params.max_in_game {
            record.max_texture_size = Some(effective_max_size(size, params.enforce_pow2));
            report.mark_applied("max_in_game");
        }

        // 3) Compression, read back by sRGB AUTO
        if let Some(compression) = params.compression {
            record.compression_settings = Some(compression);
            report.mark_applied("compression");
        }

        // 4) sRGB
        if let Some(mode) = params.srgb {
            match desired_srgb(mode, record.compression_settings) {
                Ok(srgb) => {
                    record.srgb = Some(srgb);
                    report.mark_applied("srgb");
                }
                Err(message) => report.mark_failed("srgb", message),
            }
        }

        // 5) Texture group
        record.lod_group = Some(params.texture_group);
        report.mark_applied("texture_group");

        // 6) Mip generation
        record.mip_gen_settings = Some(params.mip_gen);
        report.mark_applied("mip_gen");

        if report.ok {
            record.save(&sidecar)?;
            info!(
                path = %image.display(),
                applied = %report.applied.join(", "),
                "applied texture settings"
            );
        } else {
            report.applied.clear();
            warn!(
                path = %image.display(),
                errors = ?report.errors,
                "texture settings rolled back"
            );
        }
        Ok(report)
    }

    fn delete_asset(&self, locator: &str) -> Result<bool, SinkError> {
        let image = PathBuf::from(locator);
        if !image.is_file() {
            warn!(path = %image.display(), "delete skipped, asset not found");
            return Ok(false);
        }
        fs::remove_file(&image)?;

        let sidecar = sidecar_path(&image);
        if sidecar.is_file() {
            fs::remove_file(&sidecar)?;
        }
        info!(path = %image.display(), "deleted texture asset");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        image::RgbImage::new(4, 4).save(&path).unwrap();
        path
    }

    fn locator(path: &Path) -> &str {
        path.to_str().unwrap()
    }

    fn read_sidecar(image: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(sidecar_path(image)).unwrap()).unwrap()
    }

    #[test]
    fn sidecar_sits_next_to_image() {
        assert_eq!(
            sidecar_path(Path::new("art/T_cc_col.png")),
            PathBuf::from("art/T_cc_col.png.texture.json")
        );
    }

    #[test]
    fn srgb_modes() {
        assert_eq!(desired_srgb(SrgbMode::On, None), Ok(true));
        assert_eq!(desired_srgb(SrgbMode::Off, Some(CompressionKind::Default)), Ok(false));
        assert_eq!(
            desired_srgb(SrgbMode::Auto, Some(CompressionKind::NormalMap)),
            Ok(false)
        );
        assert_eq!(desired_srgb(SrgbMode::Auto, Some(CompressionKind::Bc7)), Ok(true));
        assert!(desired_srgb(SrgbMode::Auto, None).is_err());
    }

    #[test]
    fn apply_writes_every_field() {
        let tmp = TempDir::new().unwrap();
        let image = write_png(tmp.path(), "T_Rock_cc_mat.png");
        let params = TextureConfigParams {
            address_u: Some(AddressMode::Clamp),
            address_v: Some(AddressMode::Wrap),
            max_in_game: Some(1000),
            enforce_pow2: true,
            compression: Some(CompressionKind::Bc7),
            srgb: Some(SrgbMode::Auto),
            mip_gen: MipGenKind::Sharpen2,
            texture_group: TextureGroupKind::Character,
            ..Default::default()
        };

        let report = FsSink::new().apply_settings(locator(&image), &params).unwrap();
        assert!(report.ok);
        assert_eq!(
            report.applied,
            vec!["address", "max_in_game", "compression", "srgb", "texture_group", "mip_gen"]
        );
        assert_eq!(
            read_sidecar(&image),
            json!({
                "address_x": "CLAMP",
                "address_y": "WRAP",
                "max_texture_size": 512,
                "compression_settings": "BC7",
                "srgb": true,
                "lod_group": "CHARACTER",
                "mip_gen_settings": "SHARPEN2"
            })
        );
        assert!(!temp_path(&sidecar_path(&image)).exists());
    }

    #[test]
    fn address_needs_both_axes() {
        let tmp = TempDir::new().unwrap();
        let image = write_png(tmp.path(), "T.png");
        let params = TextureConfigParams {
            address_u: Some(AddressMode::Clamp),
            ..Default::default()
        };
        let report = FsSink::new().apply_settings(locator(&image), &params).unwrap();
        assert_eq!(report.applied, vec!["texture_group", "mip_gen"]);
        assert!(read_sidecar(&image).get("address_x").is_none());
    }

    #[test]
    fn volume_axis_is_recorded() {
        let tmp = TempDir::new().unwrap();
        let image = write_png(tmp.path(), "T.png");
        let params = TextureConfigParams {
            address_u: Some(AddressMode::Wrap),
            address_v: Some(AddressMode::Wrap),
            address_z: Some(AddressMode::Mirror),
            ..Default::default()
        };
        FsSink::new().apply_settings(locator(&image), &params).unwrap();
        assert_eq!(read_sidecar(&image)["address_z"], json!("MIRROR"));
    }

    #[test]
    fn auto_srgb_reads_recorded_compression() {
        let tmp = TempDir::new().unwrap();
        let image = write_png(tmp.path(), "T.png");
        fs::write(
            sidecar_path(&image),
            r#"{"compression_settings": "MASKS", "owner": "lighting"}"#,
        )
        .unwrap();

        let params = TextureConfigParams {
            srgb: Some(SrgbMode::Auto),
            ..Default::default()
        };
        let report = FsSink::new().apply_settings(locator(&image), &params).unwrap();
        assert!(report.ok);

        let written = read_sidecar(&image);
        assert_eq!(written["srgb"], json!(false));
        assert_eq!(written["compression_settings"], json!("MASKS"));
        assert_eq!(written["owner"], json!("lighting"));
    }

    #[test]
    fn auto_srgb_without_compression_rolls_back() {
        let tmp = TempDir::new().unwrap();
        let image = write_png(tmp.path(), "T.png");
        let params = TextureConfigParams {
            address_u: Some(AddressMode::Clamp),
            address_v: Some(AddressMode::Clamp),
            srgb: Some(SrgbMode::Auto),
            ..Default::default()
        };

        let report = FsSink::new().apply_settings(locator(&image), &params).unwrap();
        assert!(!report.ok);
        assert!(report.applied.is_empty());
        assert_eq!(
            report.errors,
            vec!["srgb: failed to read compression settings for AUTO sRGB"]
        );
        assert!(!sidecar_path(&image).exists());
    }

    #[test]
    fn rollback_keeps_existing_sidecar() {
        let tmp = TempDir::new().unwrap();
        let image = write_png(tmp.path(), "T.png");
        let original = r#"{"lod_group": "UI"}"#;
        fs::write(sidecar_path(&image), original).unwrap();

        let params = TextureConfigParams {
            srgb: Some(SrgbMode::Auto),
            ..Default::default()
        };
        let report = FsSink::new().apply_settings(locator(&image), &params).unwrap();
        assert!(!report.ok);
        assert_eq!(fs::read_to_string(sidecar_path(&image)).unwrap(), original);
    }

    #[test]
    fn missing_image_raises() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("gone.png");
        let err = FsSink::new()
            .apply_settings(locator(&missing), &TextureConfigParams::default())
            .unwrap_err();
        assert!(matches!(err, SinkError::NotFound(_)));
    }

    #[test]
    fn non_image_raises() {
        let tmp = TempDir::new().unwrap();
        let fake = tmp.path().join("fake.png");
        fs::write(&fake, "not a png").unwrap();
        let err = FsSink::new()
            .apply_settings(locator(&fake), &TextureConfigParams::default())
            .unwrap_err();
        assert!(matches!(err, SinkError::NotATexture { .. }));
        assert!(!sidecar_path(&fake).exists());
    }

    #[test]
    fn corrupt_sidecar_raises() {
        let tmp = TempDir::new().unwrap();
        let image = write_png(tmp.path(), "T.png");
        fs::write(sidecar_path(&image), "{ broken").unwrap();
        let err = FsSink::new()
            .apply_settings(locator(&image), &TextureConfigParams::default())
            .unwrap_err();
        assert!(matches!(err, SinkError::Record { .. }));
    }

    #[test]
    fn delete_removes_image_and_sidecar() {
        let tmp = TempDir::new().unwrap();
        let image = write_png(tmp.path(), "T_bad.png");
        fs::write(sidecar_path(&image), "{}").unwrap();

        assert!(FsSink::new().delete_asset(locator(&image)).unwrap());
        assert!(!image.exists());
        assert!(!sidecar_path(&image).exists());
    }

    #[test]
    fn delete_missing_returns_false() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("gone.png");
        assert!(!FsSink::new().delete_asset(locator(&missing)).unwrap());
    }
}
