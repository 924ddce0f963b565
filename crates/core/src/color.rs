//! sRGB and linear RGB color types.
//!
//! Palette colors are authored as sRGB hex strings and converted once into
//! linear RGB, which is the working space for every interpolation the
//! animator performs (particle ramp, fog easing). Renderers convert back to
//! sRGB when writing pixels. Components are `f32` so colors can be written
//! straight into vertex-color buffers.

use crate::error::FieldError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Gamma-encoded sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Linear RGB color (gamma-decoded).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearRgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Srgb {
    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    pub fn from_hex(hex: &str) -> Result<Srgb, FieldError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(FieldError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|e| FieldError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb {
            r: channel(0..2, "red")?,
            g: channel(2..4, "green")?,
            b: channel(4..6, "blue")?,
        })
    }

    /// Builds a color from a packed `0xRRGGBB` value.
    pub fn from_u32(rgb: u32) -> Srgb {
        Srgb {
            r: ((rgb >> 16) & 0xff) as f32 / 255.0,
            g: ((rgb >> 8) & 0xff) as f32 / 255.0,
            b: (rgb & 0xff) as f32 / 255.0,
        }
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Quantizes to 8-bit channels with clamping and rounding.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    pub fn to_linear(self) -> LinearRgb {
        srgb_to_linear(self)
    }
}

impl LinearRgb {
    /// Linear interpolation toward `other`; `t` is not clamped.
    pub fn lerp(self, other: LinearRgb, t: f32) -> LinearRgb {
        LinearRgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn to_srgb(self) -> Srgb {
        linear_to_srgb(self)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

fn srgb_component_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_component_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Converts sRGB to linear RGB by applying inverse sRGB gamma.
pub fn srgb_to_linear(c: Srgb) -> LinearRgb {
    LinearRgb {
        r: srgb_component_to_linear(c.r),
        g: srgb_component_to_linear(c.g),
        b: srgb_component_to_linear(c.b),
    }
}

/// Converts linear RGB to sRGB by applying sRGB gamma.
pub fn linear_to_srgb(c: LinearRgb) -> Srgb {
    Srgb {
        r: linear_component_to_srgb(c.r),
        g: linear_component_to_srgb(c.g),
        b: linear_component_to_srgb(c.b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn from_hex_parses_with_and_without_hash() {
        let a = Srgb::from_hex("#2b0057").unwrap();
        let b = Srgb::from_hex("2B0057").unwrap();
        assert_eq!(a, b);
        assert!(approx_eq(a.r, 0x2b as f32 / 255.0));
        assert!(approx_eq(a.g, 0.0));
        assert!(approx_eq(a.b, 0x57 as f32 / 255.0));
    }

    #[test]
    fn from_hex_rejects_malformed_input() {
        assert!(Srgb::from_hex("#gggggg").is_err());
        assert!(Srgb::from_hex("#fff").is_err());
        assert!(Srgb::from_hex("").is_err());
        assert!(Srgb::from_hex("#ff00ff00").is_err());
        assert!(Srgb::from_hex("#ff00é").is_err());
    }

    #[test]
    fn from_u32_matches_from_hex() {
        assert_eq!(Srgb::from_u32(0x00f0ff), Srgb::from_hex("#00f0ff").unwrap());
    }

    #[test]
    fn to_hex_clamps_out_of_range() {
        let color = Srgb {
            r: 1.5,
            g: -0.1,
            b: 0.5,
        };
        assert_eq!(color.to_hex(), "#ff0080");
    }

    #[test]
    fn hex_round_trip_is_exact_for_8_bit_colors() {
        for hex in ["#020205", "#f0f0f0", "#3a86ff", "#80ffdb"] {
            assert_eq!(Srgb::from_hex(hex).unwrap().to_hex(), hex);
        }
    }

    #[test]
    fn linear_conversion_keeps_black_and_white_fixed() {
        let black = Srgb::from_u32(0x000000).to_linear();
        let white = Srgb::from_u32(0xffffff).to_linear();
        assert!(approx_eq(black.r, 0.0) && approx_eq(black.g, 0.0) && approx_eq(black.b, 0.0));
        assert!(approx_eq(white.r, 1.0) && approx_eq(white.g, 1.0) && approx_eq(white.b, 1.0));
    }

    #[test]
    fn mid_gray_is_darker_in_linear_space() {
        let gray = Srgb {
            r: 0.5,
            g: 0.5,
            b: 0.5,
        };
        let lin = gray.to_linear();
        assert!(lin.r < 0.25 && lin.r > 0.2, "got {}", lin.r);
        assert!(approx_eq(lin.to_srgb().r, 0.5));
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = LinearRgb {
            r: 0.0,
            g: 0.2,
            b: 1.0,
        };
        let b = LinearRgb {
            r: 1.0,
            g: 0.4,
            b: 0.0,
        };
        assert_eq!(a.lerp(b, 0.0), a);
        let end = a.lerp(b, 1.0);
        assert!(approx_eq(end.r, b.r) && approx_eq(end.g, b.g) && approx_eq(end.b, b.b));
        let mid = a.lerp(b, 0.5);
        assert!(approx_eq(mid.r, 0.5));
        assert!(approx_eq(mid.g, 0.3));
        assert!(approx_eq(mid.b, 0.5));
    }

    #[test]
    fn srgb_serializes_as_hex_string() {
        let json = serde_json::to_string(&Srgb::from_u32(0xff0000)).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let back: Srgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_hex(), "#ff0000");
    }

    #[test]
    fn srgb_deserialize_rejects_invalid_hex() {
        let result: Result<Srgb, _> = serde_json::from_str("\"not-a-color\"");
        assert!(result.is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn linear_round_trip_within_epsilon(r in 0.0_f32..=1.0, g in 0.0_f32..=1.0, b in 0.0_f32..=1.0) {
                let original = Srgb { r, g, b };
                let back = original.to_linear().to_srgb();
                prop_assert!((back.r - r).abs() < 1e-4, "r: {} vs {}", back.r, r);
                prop_assert!((back.g - g).abs() < 1e-4, "g: {} vs {}", back.g, g);
                prop_assert!((back.b - b).abs() < 1e-4, "b: {} vs {}", back.b, b);
            }

            #[test]
            fn lerp_stays_between_endpoints(t in 0.0_f32..=1.0, x in 0.0_f32..=1.0, y in 0.0_f32..=1.0) {
                let a = LinearRgb { r: x, g: x, b: x };
                let b = LinearRgb { r: y, g: y, b: y };
                let c = a.lerp(b, t);
                let (lo, hi) = (x.min(y), x.max(y));
                prop_assert!(c.r >= lo - 1e-6 && c.r <= hi + 1e-6);
            }
        }
    }
}
