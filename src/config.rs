//! Rule-table configuration.
//!
//! Handles loading, validating and saving the naming-rule document. A single
//! document drives a whole batch: it lists the suffix tables, which of them
//! form the positional validation grid, and the per-suffix texture settings.
//!
//! ## Document Shape
//!
//! ```json
//! {
//!   "run_dir": ["/Game/Environments"],
//!   "texture_type": ["col", "msk", "nml"],
//!   "address_suffix_2d": { "cc": ["CLAMP", "CLAMP"], "ww": ["WRAP", "WRAP"] },
//!   "address_suffix_3d": { "vol": ["WRAP", "WRAP", "CLAMP"] },
//!   "suffix_index": ["address_suffix_2d", "texture_type"],
//!   "texture_config": {
//!     "nml": { "compression": "NORMAL_MAP", "srgb": "OFF",
//!              "mip_gen": "FROM_TEXTURE_GROUP", "texture_group": "WORLD_NORMAL_MAP" }
//!   },
//!   "enable_subuv_texture_override": true,
//!   "subuv_max_in_game": 512
//! }
//! ```
//!
//! `.json` and `.toml` files are both accepted; the shape is the same. The
//! legacy `address_suffix` table mixes pairs and triples and is split by arity
//! on load; explicit `address_suffix_2d` / `address_suffix_3d` entries win over
//! legacy entries with the same key.
//!
//! The document is read into serde-derived `*Doc` structs first. Unknown keys
//! are rejected to catch typos early, and `null` reads as an absent field.
//! Checks serde cannot express (required fields, address arity, grid row
//! names) run while converting into [`Config`].
//!
//! ## Grid Rows
//!
//! `suffix_index` names the config fields whose keys (for tables) or elements
//! (for lists) make up each row of the validation grid. Names are resolved to a
//! [`GridRow`] once at load time, so a typo fails the load instead of silently
//! dropping a row.

use crate::types::{
    AddressMode, CompressionKind, MipGenKind, NumericSize, SrgbMode, TextureGroupKind,
};
use crate::validate::SuffixGrid;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default pattern for the sub-UV size trigger: `8x8`, `4X4`, `1x16`, ...
pub const DEFAULT_SUBUV_PATTERN: &str = r"^[1-9]\d*[xX][1-9]\d*$";

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
    #[error("invalid document: {0}")]
    Invalid(serde_json::Error),
    #[error("missing required field '{0}'")]
    Missing(&'static str),
    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    #[error("unknown {kind} name: {name}")]
    UnknownName { kind: &'static str, name: String },
    #[error("unknown {kind} ordinal: {ordinal}")]
    UnknownOrdinal { kind: &'static str, ordinal: String },
    #[error("address entry must list {expected} modes, found {found}")]
    AddressArity { expected: &'static str, found: usize },
    #[error("invalid size {0}: expected a non-negative integer, \"AUTO\" or \"P<digits>\"")]
    InvalidSize(String),
    #[error("no address suffixes: address_suffix_2d and address_suffix_3d are both empty")]
    NoAddressSuffixes,
    #[error(
        "suffix_index entry '{0}' is not a table or list field \
         (expected one of: run_dir, texture_type, address_suffix_2d, address_suffix_3d, \
         suffix_index, texture_config)"
    )]
    UnknownGridRow(String),
    #[error("invalid subuv_pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("{field}: {source}")]
    InField {
        field: String,
        source: Box<DocumentError>,
    },
}

impl DocumentError {
    /// Attach the document location the error was found at.
    fn at(self, field: impl Into<String>) -> Self {
        DocumentError::InField {
            field: field.into(),
            source: Box::new(self),
        }
    }
}

pub type AddressPair = (AddressMode, AddressMode);
pub type AddressTriple = (AddressMode, AddressMode, AddressMode);

/// Address table as written: suffix → list of modes.
type AddressDoc = BTreeMap<String, Vec<AddressMode>>;

// =============================================================================
// Per-suffix texture settings
// =============================================================================

/// Texture settings for one suffix, and the resolved settings for one asset.
///
/// - `address_u/v/z`: wrapping per axis (2D uses U/V, volume textures add Z)
/// - `max_in_game`: max in-game size; `None` or `0` means automatic
/// - `enforce_pow2`: round the max size down to a power of two (only meaningful
///   with `max_in_game`)
/// - `mip_gen` / `texture_group`: always set, defaulting to
///   `FROM_TEXTURE_GROUP` / `WORLD`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureConfigParams {
    pub address_u: Option<AddressMode>,
    pub address_v: Option<AddressMode>,
    pub address_z: Option<AddressMode>,
    pub max_in_game: Option<u32>,
    pub enforce_pow2: bool,
    pub compression: Option<CompressionKind>,
    pub srgb: Option<SrgbMode>,
    pub mip_gen: MipGenKind,
    pub texture_group: TextureGroupKind,
}

/// One `texture_config` entry as written in the document.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct TextureConfigParamsDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    address_u: Option<AddressMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address_v: Option<AddressMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address_z: Option<AddressMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_in_game: Option<NumericSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    enforce_pow2: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    compression: Option<CompressionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    srgb: Option<SrgbMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mip_gen: Option<MipGenKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    texture_group: Option<TextureGroupKind>,
}

const PARAM_FIELDS: &[&str] = &[
    "address_u",
    "address_v",
    "address_z",
    "max_in_game",
    "enforce_pow2",
    "compression",
    "srgb",
    "mip_gen",
    "texture_group",
];

impl From<TextureConfigParamsDoc> for TextureConfigParams {
    fn from(doc: TextureConfigParamsDoc) -> Self {
        Self {
            address_u: doc.address_u,
            address_v: doc.address_v,
            address_z: doc.address_z,
            max_in_game: doc.max_in_game.map(NumericSize::pixels),
            enforce_pow2: doc.enforce_pow2.unwrap_or(false),
            compression: doc.compression,
            srgb: doc.srgb,
            mip_gen: doc.mip_gen.unwrap_or_default(),
            texture_group: doc.texture_group.unwrap_or_default(),
        }
    }
}

impl TextureConfigParams {
    /// Build from a document object. Unknown keys, enum names or ordinals are
    /// errors.
    pub fn from_value(value: &Value) -> Result<Self, DocumentError> {
        TextureConfigParamsDoc::deserialize(value)
            .map(Self::from)
            .map_err(DocumentError::Invalid)
    }

    fn to_doc(&self) -> TextureConfigParamsDoc {
        TextureConfigParamsDoc {
            address_u: self.address_u,
            address_v: self.address_v,
            address_z: self.address_z,
            max_in_game: self
                .max_in_game
                .map(|size| NumericSize::Pixels(i64::from(size))),
            enforce_pow2: self.max_in_game.map(|_| self.enforce_pow2),
            compression: self.compression,
            srgb: self.srgb,
            mip_gen: Some(self.mip_gen),
            texture_group: Some(self.texture_group),
        }
    }

    /// Serialize to a document object with enums as names.
    ///
    /// With `compact`, absent fields are omitted; otherwise they are written as
    /// `null`. `enforce_pow2` is only written alongside `max_in_game`.
    pub fn to_value(&self, compact: bool) -> Result<Value, DocumentError> {
        let mut value = serde_json::to_value(self.to_doc())?;
        if let (false, Value::Object(map)) = (compact, &mut value) {
            for key in PARAM_FIELDS {
                map.entry(key.to_string()).or_insert(Value::Null);
            }
        }
        Ok(value)
    }

    /// Copy of these settings with U and V replaced. Z and every other field
    /// are kept as they are.
    pub fn with_address_uv(&self, u: AddressMode, v: AddressMode) -> Self {
        Self {
            address_u: Some(u),
            address_v: Some(v),
            ..self.clone()
        }
    }

    /// Copy of these settings with the max in-game size replaced.
    pub fn with_max_in_game(&self, size: NumericSize) -> Self {
        Self {
            max_in_game: Some(size.pixels()),
            ..self.clone()
        }
    }
}

// =============================================================================
// Address suffix tables
// =============================================================================

/// Suffix → address mode tables, split by arity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuffixTable {
    /// 2D textures: suffix → (U, V).
    pub uv: BTreeMap<String, AddressPair>,
    /// Volume textures: suffix → (U, V, W).
    pub uvw: BTreeMap<String, AddressTriple>,
}

fn arity_error(expected: &'static str, found: usize, at: String) -> DocumentError {
    DocumentError::AddressArity { expected, found }.at(at)
}

impl SuffixTable {
    /// Build the tables from the document's three address fields, routing
    /// legacy entries by arity. Explicit tables are applied last so they win.
    fn from_docs(
        legacy: Option<AddressDoc>,
        uv: Option<AddressDoc>,
        uvw: Option<AddressDoc>,
    ) -> Result<Self, DocumentError> {
        let mut table = SuffixTable::default();

        for (key, modes) in legacy.unwrap_or_default() {
            match modes.as_slice() {
                &[u, v] => {
                    table.uv.insert(key, (u, v));
                }
                &[u, v, w] => {
                    table.uvw.insert(key, (u, v, w));
                }
                other => {
                    return Err(arity_error(
                        "2 or 3",
                        other.len(),
                        format!("address_suffix.{key}"),
                    ));
                }
            }
        }

        for (key, modes) in uv.unwrap_or_default() {
            match modes.as_slice() {
                &[u, v] => {
                    table.uv.insert(key, (u, v));
                }
                other => {
                    return Err(arity_error(
                        "2",
                        other.len(),
                        format!("address_suffix_2d.{key}"),
                    ));
                }
            }
        }

        for (key, modes) in uvw.unwrap_or_default() {
            match modes.as_slice() {
                &[u, v, w] => {
                    table.uvw.insert(key, (u, v, w));
                }
                other => {
                    return Err(arity_error(
                        "3",
                        other.len(),
                        format!("address_suffix_3d.{key}"),
                    ));
                }
            }
        }

        if table.uv.is_empty() && table.uvw.is_empty() {
            return Err(DocumentError::NoAddressSuffixes);
        }
        Ok(table)
    }

    pub fn has_suffix_2d(&self, key: &str) -> bool {
        self.uv.contains_key(key)
    }

    pub fn has_suffix_3d(&self, key: &str) -> bool {
        self.uvw.contains_key(key)
    }

    /// (U, V) for a suffix. Volume entries drop their W axis.
    pub fn get_uv(&self, key: &str) -> Option<AddressPair> {
        self.uv
            .get(key)
            .copied()
            .or_else(|| self.uvw.get(key).map(|&(u, v, _)| (u, v)))
    }

    /// (U, V, W) for a suffix. 2D entries reuse V as W; suffixes that need real
    /// volume wrapping must have an `address_suffix_3d` entry.
    pub fn get_uvw(&self, key: &str) -> Option<AddressTriple> {
        self.uvw
            .get(key)
            .copied()
            .or_else(|| self.uv.get(key).map(|&(u, v)| (u, v, v)))
    }
}

// =============================================================================
// Grid row registry
// =============================================================================

/// A config field that can serve as one row of the validation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridRow {
    RunDir,
    TextureType,
    AddressSuffix2d,
    AddressSuffix3d,
    SuffixIndex,
    TextureConfig,
}

impl GridRow {
    pub const ALL: [GridRow; 6] = [
        GridRow::RunDir,
        GridRow::TextureType,
        GridRow::AddressSuffix2d,
        GridRow::AddressSuffix3d,
        GridRow::SuffixIndex,
        GridRow::TextureConfig,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GridRow::RunDir => "run_dir",
            GridRow::TextureType => "texture_type",
            GridRow::AddressSuffix2d => "address_suffix_2d",
            GridRow::AddressSuffix3d => "address_suffix_3d",
            GridRow::SuffixIndex => "suffix_index",
            GridRow::TextureConfig => "texture_config",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, DocumentError> {
        Self::ALL
            .into_iter()
            .find(|row| row.name() == name)
            .ok_or_else(|| DocumentError::UnknownGridRow(name.to_string()))
    }

    /// Allowed tokens for this row: table keys or list elements.
    ///
    /// Lists keep document order. Table rows come out sorted by key, since
    /// tables are held in ordered maps and documents do not preserve key order.
    pub fn tokens(self, config: &Config) -> Vec<String> {
        match self {
            GridRow::RunDir => config.run_dir.clone(),
            GridRow::TextureType => config.texture_type.clone(),
            GridRow::AddressSuffix2d => config.address_suffix.uv.keys().cloned().collect(),
            GridRow::AddressSuffix3d => config.address_suffix.uvw.keys().cloned().collect(),
            GridRow::SuffixIndex => config
                .suffix_index
                .iter()
                .map(|row| row.name().to_string())
                .collect(),
            GridRow::TextureConfig => config.texture_config.keys().cloned().collect(),
        }
    }
}

// =============================================================================
// Root config
// =============================================================================

/// The whole document as written. Every field is optional here; required
/// fields are checked when converting into [`Config`].
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    run_dir: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    texture_type: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address_suffix: Option<AddressDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address_suffix_2d: Option<AddressDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address_suffix_3d: Option<AddressDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suffix_index: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    texture_config: Option<BTreeMap<String, TextureConfigParamsDoc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    enable_subuv_texture_override: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subuv_max_in_game: Option<NumericSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subuv_pattern: Option<String>,
}

/// The whole rule table, loaded once per run and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Asset roots the tool runs under. Empty means every asset is in scope.
    pub run_dir: Vec<String>,
    /// Recognized texture-type labels (`col`, `nml`, ...).
    pub texture_type: Vec<String>,
    pub address_suffix: SuffixTable,
    /// Grid rows, in positional order.
    pub suffix_index: Vec<GridRow>,
    /// Suffix → base texture settings.
    pub texture_config: BTreeMap<String, TextureConfigParams>,
    pub enable_subuv_texture_override: bool,
    /// Size forced onto sub-UV (flipbook) textures when the trigger matches.
    pub subuv_max_in_game: NumericSize,
    /// Token pattern that marks a sub-UV texture.
    pub subuv_pattern: Regex,
}

impl Config {
    /// Build a config from a parsed document, validating everything.
    pub fn from_value(value: &Value) -> Result<Self, DocumentError> {
        let doc = ConfigDoc::deserialize(value).map_err(DocumentError::Invalid)?;
        Self::from_doc(doc)
    }

    fn from_doc(doc: ConfigDoc) -> Result<Self, DocumentError> {
        let texture_type = doc
            .texture_type
            .ok_or(DocumentError::Missing("texture_type"))?;

        let address_suffix = SuffixTable::from_docs(
            doc.address_suffix,
            doc.address_suffix_2d,
            doc.address_suffix_3d,
        )?;

        let suffix_index = doc
            .suffix_index
            .ok_or(DocumentError::Missing("suffix_index"))?
            .iter()
            .map(|name| GridRow::from_name(name))
            .collect::<Result<Vec<_>, _>>()?;

        let texture_config = doc
            .texture_config
            .ok_or(DocumentError::Missing("texture_config"))?
            .into_iter()
            .map(|(key, entry)| (key, TextureConfigParams::from(entry)))
            .collect();

        let subuv_pattern = Regex::new(
            doc.subuv_pattern
                .as_deref()
                .unwrap_or(DEFAULT_SUBUV_PATTERN),
        )?;

        Ok(Self {
            run_dir: doc.run_dir.unwrap_or_default(),
            texture_type,
            address_suffix,
            suffix_index,
            texture_config,
            enable_subuv_texture_override: doc.enable_subuv_texture_override.unwrap_or(false),
            subuv_max_in_game: doc.subuv_max_in_game.unwrap_or_default(),
            subuv_pattern,
        })
    }

    /// Canonical document: enums as names, compact texture settings, address
    /// tables split by arity and only written when non-empty.
    fn to_doc(&self) -> ConfigDoc {
        let uv: AddressDoc = self
            .address_suffix
            .uv
            .iter()
            .map(|(key, &(u, v))| (key.clone(), vec![u, v]))
            .collect();
        let uvw: AddressDoc = self
            .address_suffix
            .uvw
            .iter()
            .map(|(key, &(u, v, w))| (key.clone(), vec![u, v, w]))
            .collect();

        ConfigDoc {
            run_dir: Some(self.run_dir.clone()),
            texture_type: Some(self.texture_type.clone()),
            address_suffix: None,
            address_suffix_2d: (!uv.is_empty()).then_some(uv),
            address_suffix_3d: (!uvw.is_empty()).then_some(uvw),
            suffix_index: Some(
                self.suffix_index
                    .iter()
                    .map(|row| row.name().to_string())
                    .collect(),
            ),
            texture_config: Some(
                self.texture_config
                    .iter()
                    .map(|(key, params)| (key.clone(), params.to_doc()))
                    .collect(),
            ),
            enable_subuv_texture_override: self.enable_subuv_texture_override.then_some(true),
            subuv_max_in_game: Some(self.subuv_max_in_game),
            subuv_pattern: (self.subuv_pattern.as_str() != DEFAULT_SUBUV_PATTERN)
                .then(|| self.subuv_pattern.as_str().to_string()),
        }
    }

    /// Serialize to the canonical document shape. Loading the result yields an
    /// equivalent config.
    pub fn to_value(&self) -> Result<Value, DocumentError> {
        Ok(serde_json::to_value(self.to_doc())?)
    }

    /// Parse document text in the given format.
    pub fn parse(text: &str, format: DocumentFormat) -> Result<Self, DocumentError> {
        let value: Value = match format {
            DocumentFormat::Json => serde_json::from_str(text)?,
            DocumentFormat::Toml => toml::from_str(text)?,
        };
        Self::from_value(&value)
    }

    /// Load a config file. The format follows the file extension.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content, DocumentFormat::from_path(path))
    }

    /// Render the canonical document in the given format.
    pub fn render(&self, format: DocumentFormat) -> Result<String, DocumentError> {
        let value = self.to_value()?;
        Ok(match format {
            DocumentFormat::Json => serde_json::to_string_pretty(&value)?,
            DocumentFormat::Toml => toml::to_string_pretty(&value)?,
        })
    }

    /// Save the canonical document, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render(DocumentFormat::from_path(path))?)?;
        Ok(())
    }

    /// Collect each `suffix_index` row's allowed tokens, in row order.
    pub fn build_suffix_grid(&self) -> SuffixGrid {
        SuffixGrid::new(
            self.suffix_index
                .iter()
                .map(|row| row.tokens(self))
                .collect(),
        )
    }

    /// True when the sub-UV override is on and any token matches its pattern.
    pub fn subuv_triggered<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        self.enable_subuv_texture_override
            && tokens
                .iter()
                .any(|t| self.subuv_pattern.is_match(t.as_ref()))
    }
}

/// On-disk document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// `.toml` files are TOML; everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Json,
        }
    }
}

/// The stock rule table printed by `gen-config`.
pub fn stock_config_json() -> &'static str {
    r#"{
  "run_dir": [],
  "texture_type": ["col", "msk", "nml", "mat", "flw"],
  "address_suffix_2d": {
    "cc": ["CLAMP", "CLAMP"],
    "cw": ["CLAMP", "WRAP"],
    "cm": ["CLAMP", "MIRROR"],
    "wc": ["WRAP", "CLAMP"],
    "ww": ["WRAP", "WRAP"],
    "wm": ["WRAP", "MIRROR"],
    "mc": ["MIRROR", "CLAMP"],
    "mw": ["MIRROR", "WRAP"],
    "mm": ["MIRROR", "MIRROR"]
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
    },
    "mat": {
      "max_in_game": 2048,
      "enforce_pow2": true,
      "compression": "BC7",
      "srgb": "AUTO",
      "mip_gen": "FROM_TEXTURE_GROUP",
      "texture_group": "WORLD"
    },
    "flw": {
      "compression": "HDR",
      "srgb": "OFF",
      "mip_gen": "NO_MIPMAPS",
      "texture_group": "EFFECTS"
    }
  },
  "enable_subuv_texture_override": true,
  "subuv_max_in_game": 512
}
"#
}
