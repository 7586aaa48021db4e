//! Pure sink-side calculations.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::types::CompressionKind;

/// Smallest max size a texture is clamped to.
const MIN_TEXTURE_SIZE: u32 = 16;
/// Largest max size a texture is clamped to.
const MAX_TEXTURE_SIZE: u32 = 16384;

/// The max texture size actually stored for a requested size.
///
/// `0` means automatic and passes through untouched. Anything else is first
/// rounded down to a power of two when `enforce_pow2` is set, then clamped to
/// 16..=16384.
///
/// ```
/// # use texnaming::sink::effective_max_size;
/// assert_eq!(effective_max_size(1000, true), 512);
/// assert_eq!(effective_max_size(1000, false), 1000);
/// assert_eq!(effective_max_size(8, false), 16);
/// assert_eq!(effective_max_size(0, true), 0);
/// ```
pub fn effective_max_size(size: u32, enforce_pow2: bool) -> u32 {
    if size == 0 {
        return 0;
    }
    let size = if enforce_pow2 {
        1 << (u32::BITS - 1 - size.leading_zeros())
    } else {
        size
    };
    size.clamp(MIN_TEXTURE_SIZE, MAX_TEXTURE_SIZE)
}

/// sRGB state implied by a compression kind when sRGB is `AUTO`.
///
/// Data textures (normals, masks, single-channel, HDR, distance fields) are
/// linear; everything else is color.
pub fn auto_srgb(compression: CompressionKind) -> bool {
    !matches!(
        compression,
        CompressionKind::NormalMap
            | CompressionKind::Masks
            | CompressionKind::Grayscale
            | CompressionKind::Hdr
            | CompressionKind::Alpha
            | CompressionKind::DistanceFieldFont
    )
}
