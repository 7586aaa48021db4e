//! Closed enumerations shared by the config document and the asset sink.
//!
//! Every enum here can appear in a configuration document either by its
//! canonical name (`"CLAMP"`) or by its declared ordinal (`1`). The
//! [`WireEnum`] trait carries both tables so parsing and serialization live in
//! one place, and unknown names or ordinals surface as a typed
//! [`DocumentError`] instead of a panic.
//!
//! Ordinals are part of the document format: they must never be renumbered.

use crate::config::DocumentError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// A closed enumeration with a stable name and ordinal per member.
pub trait WireEnum: Copy + Sized + 'static {
    /// Human-readable enum name used in error messages.
    const KIND: &'static str;
    /// Every member, in declaration order.
    const ALL: &'static [Self];

    fn name(self) -> &'static str;
    fn ordinal(self) -> i64;

    /// Look up a member by its canonical name (surrounding whitespace ignored).
    fn from_name(name: &str) -> Result<Self, DocumentError> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name() == name)
            .ok_or_else(|| DocumentError::UnknownName {
                kind: Self::KIND,
                name: name.to_string(),
            })
    }

    fn from_ordinal(ordinal: i64) -> Result<Self, DocumentError> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.ordinal() == ordinal)
            .ok_or_else(|| DocumentError::UnknownOrdinal {
                kind: Self::KIND,
                ordinal: ordinal.to_string(),
            })
    }

    /// Parse a document value: a string is a name, an integer is an ordinal.
    fn from_value(value: &Value) -> Result<Self, DocumentError> {
        match value {
            Value::String(s) => Self::from_name(s),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::from_ordinal(i),
                None => Err(DocumentError::UnknownOrdinal {
                    kind: Self::KIND,
                    ordinal: n.to_string(),
                }),
            },
            other => Err(DocumentError::WrongType {
                expected: "enum name or ordinal",
                found: value_kind(other),
            }),
        }
    }
}

/// Short description of a JSON value's type, for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Texture coordinate wrapping for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    Wrap,
    Clamp,
    Mirror,
}

impl WireEnum for AddressMode {
    const KIND: &'static str = "AddressMode";
    const ALL: &'static [Self] = &[Self::Wrap, Self::Clamp, Self::Mirror];

    /// Address modes ignore case: `"clamp"` is `CLAMP`.
    fn from_name(name: &str) -> Result<Self, DocumentError> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| DocumentError::UnknownName {
                kind: Self::KIND,
                name: name.to_string(),
            })
    }

    fn name(self) -> &'static str {
        match self {
            Self::Wrap => "WRAP",
            Self::Clamp => "CLAMP",
            Self::Mirror => "MIRROR",
        }
    }

    fn ordinal(self) -> i64 {
        match self {
            Self::Wrap => 0,
            Self::Clamp => 1,
            Self::Mirror => 2,
        }
    }
}

/// Compression settings applied to the texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionKind {
    Default,
    NormalMap,
    Masks,
    Grayscale,
    Hdr,
    Alpha,
    EditorIcon,
    DistanceFieldFont,
    Bc7,
}

impl WireEnum for CompressionKind {
    const KIND: &'static str = "CompressionKind";
    const ALL: &'static [Self] = &[
        Self::Default,
        Self::NormalMap,
        Self::Masks,
        Self::Grayscale,
        Self::Hdr,
        Self::Alpha,
        Self::EditorIcon,
        Self::DistanceFieldFont,
        Self::Bc7,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::NormalMap => "NORMAL_MAP",
            Self::Masks => "MASKS",
            Self::Grayscale => "GRAYSCALE",
            Self::Hdr => "HDR",
            Self::Alpha => "ALPHA",
            Self::EditorIcon => "EDITOR_ICON",
            Self::DistanceFieldFont => "DISTANCE_FIELD_FONT",
            Self::Bc7 => "BC7",
        }
    }

    fn ordinal(self) -> i64 {
        match self {
            Self::Default => 0,
            Self::NormalMap => 1,
            Self::Masks => 2,
            Self::Grayscale => 3,
            Self::Hdr => 4,
            Self::Alpha => 5,
            Self::EditorIcon => 6,
            Self::DistanceFieldFont => 7,
            Self::Bc7 => 8,
        }
    }
}

/// sRGB handling. `Auto` defers to the compression in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SrgbMode {
    On,
    Off,
    Auto,
}

impl WireEnum for SrgbMode {
    const KIND: &'static str = "SRGBMode";
    const ALL: &'static [Self] = &[Self::On, Self::Off, Self::Auto];

    fn name(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
            Self::Auto => "AUTO",
        }
    }

    fn ordinal(self) -> i64 {
        match self {
            Self::On => 1,
            Self::Off => 0,
            Self::Auto => -1,
        }
    }
}

/// Named max-size presets. The ordinal is the pixel size itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizePreset {
    Auto,
    P256,
    P512,
    P1024,
    P2048,
    P4096,
}

impl SizePreset {
    pub fn pixels(self) -> u32 {
        match self {
            Self::Auto => 0,
            Self::P256 => 256,
            Self::P512 => 512,
            Self::P1024 => 1024,
            Self::P2048 => 2048,
            Self::P4096 => 4096,
        }
    }
}

impl WireEnum for SizePreset {
    const KIND: &'static str = "SizePreset";
    const ALL: &'static [Self] = &[
        Self::Auto,
        Self::P256,
        Self::P512,
        Self::P1024,
        Self::P2048,
        Self::P4096,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::P256 => "P256",
            Self::P512 => "P512",
            Self::P1024 => "P1024",
            Self::P2048 => "P2048",
            Self::P4096 => "P4096",
        }
    }

    fn ordinal(self) -> i64 {
        i64::from(self.pixels())
    }
}

/// Mip generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MipGenKind {
    #[default]
    FromTextureGroup,
    NoMipmaps,
    SimpleAverage,
    Sharpen0,
    Sharpen1,
    Sharpen2,
    Sharpen3,
    Sharpen4,
    Sharpen5,
    Sharpen6,
    Sharpen7,
    Sharpen8,
}

impl WireEnum for MipGenKind {
    const KIND: &'static str = "MipGenKind";
    const ALL: &'static [Self] = &[
        Self::FromTextureGroup,
        Self::NoMipmaps,
        Self::SimpleAverage,
        Self::Sharpen0,
        Self::Sharpen1,
        Self::Sharpen2,
        Self::Sharpen3,
        Self::Sharpen4,
        Self::Sharpen5,
        Self::Sharpen6,
        Self::Sharpen7,
        Self::Sharpen8,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::FromTextureGroup => "FROM_TEXTURE_GROUP",
            Self::NoMipmaps => "NO_MIPMAPS",
            Self::SimpleAverage => "SIMPLE_AVERAGE",
            Self::Sharpen0 => "SHARPEN0",
            Self::Sharpen1 => "SHARPEN1",
            Self::Sharpen2 => "SHARPEN2",
            Self::Sharpen3 => "SHARPEN3",
            Self::Sharpen4 => "SHARPEN4",
            Self::Sharpen5 => "SHARPEN5",
            Self::Sharpen6 => "SHARPEN6",
            Self::Sharpen7 => "SHARPEN7",
            Self::Sharpen8 => "SHARPEN8",
        }
    }

    fn ordinal(self) -> i64 {
        match self {
            Self::FromTextureGroup => 0,
            Self::NoMipmaps => 1,
            Self::SimpleAverage => 2,
            Self::Sharpen0 => 10,
            Self::Sharpen1 => 11,
            Self::Sharpen2 => 12,
            Self::Sharpen3 => 13,
            Self::Sharpen4 => 14,
            Self::Sharpen5 => 15,
            Self::Sharpen6 => 16,
            Self::Sharpen7 => 17,
            Self::Sharpen8 => 18,
        }
    }
}

/// Texture (LOD) group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureGroupKind {
    #[default]
    World,
    WorldNormalMap,
    WorldSpecular,
    Character,
    CharacterNormalMap,
    CharacterSpecular,
    Ui,
    Lightmap,
    Shadowmap,
    Skybox,
    Vehicle,
    Cinematic,
    Effects,
    Media,
}

impl WireEnum for TextureGroupKind {
    const KIND: &'static str = "TextureGroupKind";
    const ALL: &'static [Self] = &[
        Self::World,
        Self::WorldNormalMap,
        Self::WorldSpecular,
        Self::Character,
        Self::CharacterNormalMap,
        Self::CharacterSpecular,
        Self::Ui,
        Self::Lightmap,
        Self::Shadowmap,
        Self::Skybox,
        Self::Vehicle,
        Self::Cinematic,
        Self::Effects,
        Self::Media,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::World => "WORLD",
            Self::WorldNormalMap => "WORLD_NORMAL_MAP",
            Self::WorldSpecular => "WORLD_SPECULAR",
            Self::Character => "CHARACTER",
            Self::CharacterNormalMap => "CHARACTER_NORMAL_MAP",
            Self::CharacterSpecular => "CHARACTER_SPECULAR",
            Self::Ui => "UI",
            Self::Lightmap => "LIGHTMAP",
            Self::Shadowmap => "SHADOWMAP",
            Self::Skybox => "SKYBOX",
            Self::Vehicle => "VEHICLE",
            Self::Cinematic => "CINEMATIC",
            Self::Effects => "EFFECTS",
            Self::Media => "MEDIA",
        }
    }

    fn ordinal(self) -> i64 {
        match self {
            Self::World => 0,
            Self::WorldNormalMap => 1,
            Self::WorldSpecular => 2,
            Self::Character => 3,
            Self::CharacterNormalMap => 4,
            Self::CharacterSpecular => 5,
            Self::Ui => 6,
            Self::Lightmap => 7,
            Self::Shadowmap => 8,
            Self::Skybox => 9,
            Self::Vehicle => 10,
            Self::Cinematic => 11,
            Self::Effects => 12,
            Self::Media => 13,
        }
    }
}

// Names on the wire and in display output, for every wire enum.
macro_rules! by_name {
    ($($ty:ty),* $(,)?) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = Value::deserialize(deserializer)?;
                <$ty as WireEnum>::from_value(&value).map_err(D::Error::custom)
            }
        }
    )*};
}

by_name!(
    AddressMode,
    CompressionKind,
    SrgbMode,
    SizePreset,
    MipGenKind,
    TextureGroupKind,
);

/// A size value: either a named preset or a plain pixel count.
///
/// Plain counts keep their sign until [`NumericSize::pixels`] floors them at 0,
/// so a document round-trips the way it was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericSize {
    Preset(SizePreset),
    Pixels(i64),
}

impl NumericSize {
    /// Normalized pixel size: presets collapse to their value, counts floor at 0.
    pub fn pixels(self) -> u32 {
        match self {
            Self::Preset(preset) => preset.pixels(),
            Self::Pixels(n) => u32::try_from(n.max(0)).unwrap_or(u32::MAX),
        }
    }

    /// Parse a size from a document value.
    ///
    /// Accepts an integer, `"AUTO"`, a preset name like `"P1024"`, `"P<digits>"`
    /// for any other count, or a bare digit string. Strings are matched
    /// case-insensitively. Counts above `u32::MAX` are rejected.
    pub fn from_value(value: &Value) -> Result<Self, DocumentError> {
        let invalid = || DocumentError::InvalidSize(value.to_string());
        match value {
            Value::Number(n) => {
                let n = n.as_i64().ok_or_else(invalid)?;
                if n > i64::from(u32::MAX) {
                    return Err(invalid());
                }
                Ok(Self::Pixels(n))
            }
            Value::String(s) => {
                let s = s.trim().to_uppercase();
                if let Ok(preset) = SizePreset::from_name(&s) {
                    return Ok(Self::Preset(preset));
                }
                let digits = s.strip_prefix('P').unwrap_or(&s);
                if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                digits
                    .parse::<u32>()
                    .map(|n| Self::Pixels(i64::from(n)))
                    .map_err(|_| invalid())
            }
            _ => Err(invalid()),
        }
    }
}

impl Serialize for NumericSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Preset(preset) => serializer.serialize_str(preset.name()),
            Self::Pixels(n) => serializer.serialize_i64(*n),
        }
    }
}

impl<'de> Deserialize<'de> for NumericSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(D::Error::custom)
    }
}

impl Default for NumericSize {
    fn default() -> Self {
        Self::Pixels(2048)
    }
}
