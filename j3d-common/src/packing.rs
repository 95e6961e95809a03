//! Vertex data quantization utilities
//!
//! Converts f32 vertex data to the fixed-function pipeline's storage formats:
//! - f32 → s16 fixed point (normals: 14 fraction bits, texcoords: 8)
//! - f32 → u8 color channels (RGBA8)
//! - radians → s16 binary angle (joint rotations)

use std::f32::consts::PI;

// ============================================================================
// Fixed-Point Constants
// ============================================================================

/// Fraction bits used for normal, tangent and bitangent components
pub const FIXED_POINT_EXP_NORMAL: u8 = 0x0E;
/// Fraction bits used for texture coordinates
pub const FIXED_POINT_EXP_TEXCOORD: u8 = 0x08;

/// Scale from radians to the s16 binary angle used by joint rotations
const S16_RADIAN_RATIO: f32 = 32768.0 / PI;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Quantize a value to s16 fixed point with `exponent` fraction bits.
///
/// The value is divided by `2^-exponent` and truncated toward zero.
/// Out-of-range values saturate to the i16 limits.
#[inline]
pub fn to_fixed_point(value: f32, exponent: u8) -> i16 {
    (value / 0.5f32.powi(exponent as i32)) as i16
}

/// Inverse of [`to_fixed_point`]
#[inline]
pub fn from_fixed_point(value: i16, exponent: u8) -> f32 {
    value as f32 * 0.5f32.powi(exponent as i32)
}

/// Pack a normalized RGBA color into four bytes (truncating `v * 255`)
#[inline]
pub fn pack_color_rgba8(r: f32, g: f32, b: f32, a: f32) -> [u8; 4] {
    [
        (r * 255.0) as u8,
        (g * 255.0) as u8,
        (b * 255.0) as u8,
        (a * 255.0) as u8,
    ]
}

/// Convert an angle in radians to the s16 binary angle (π ↦ 32768, saturating)
#[inline]
pub fn angle_to_s16(radians: f32) -> i16 {
    (radians * S16_RADIAN_RATIO) as i16
}
