//! Framebuffer to RGBA8 conversion.
//!
//! Always available (no feature gate) so hosts that blit into their own
//! image type can share the conversion with the `png` snapshot path.

use tidefield_core::LinearRgb;

/// Encodes linear RGB pixels as sRGB RGBA8 bytes.
///
/// Channels above 1.0 (from additive blending) saturate to 255. Alpha is
/// always 255. The buffer length is `pixels.len() * 4`.
pub fn linear_to_rgba(pixels: &[LinearRgb]) -> Vec<u8> {
    pixels
        .iter()
        .flat_map(|&p| {
            let [r, g, b] = p.to_srgb().to_rgb8();
            [r, g, b, 255u8]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_to_rgba_correct_length() {
        let buf = linear_to_rgba(&[LinearRgb::default(); 12]);
        assert_eq!(buf.len(), 48);
    }

    #[test]
    fn linear_to_rgba_alpha_always_255() {
        let px = LinearRgb {
            r: 0.2,
            g: 0.4,
            b: 0.6,
        };
        let buf = linear_to_rgba(&[px; 5]);
        for (i, &byte) in buf.iter().enumerate() {
            if i % 4 == 3 {
                assert_eq!(byte, 255, "alpha at pixel {} should be 255", i / 4);
            }
        }
    }

    #[test]
    fn linear_to_rgba_applies_gamma_and_saturates() {
        let buf = linear_to_rgba(&[
            LinearRgb::default(),
            LinearRgb {
                r: 0.214,
                g: 1.0,
                b: 7.5,
            },
        ]);
        assert_eq!(&buf[..3], &[0, 0, 0]);
        // Linear 0.214 is roughly sRGB 0.5.
        assert!((126..=129).contains(&buf[4]), "mid grey: {}", buf[4]);
        assert_eq!(buf[5], 255);
        assert_eq!(buf[6], 255);
    }
}
