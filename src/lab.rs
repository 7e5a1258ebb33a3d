//! sRGB to CIE L*a*b* conversion under the D65/2° reference white.

use image::Rgb;

// sRGB primaries, D65
const RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.412424, 0.357579, 0.180464],
    [0.212656, 0.715158, 0.0721856],
    [0.0193324, 0.119193, 0.950444],
];

// D65 2° observer
const X_N: f64 = 0.95047;
const Y_N: f64 = 1.0;
const Z_N: f64 = 1.08883;

// (6/29)^3
const EPSILON: f64 = 216.0 / 24389.0;
const KAPPA_INV: f64 = 7.787;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }
}

impl From<Rgb<u8>> for Lab {
    fn from(rgb: Rgb<u8>) -> Self {
        srgb_to_lab(rgb)
    }
}

#[inline]
fn srgb_to_linear(c: u8) -> f64 {
    let v = c as f64 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        KAPPA_INV * t + 16.0 / 116.0
    }
}

/// Converts an 8-bit sRGB color to Lab. L is in 0..=100.
pub fn srgb_to_lab(rgb: Rgb<u8>) -> Lab {
    let [r, g, b] = rgb.0.map(srgb_to_linear);
    let xyz = RGB_TO_XYZ.map(|row| row[0] * r + row[1] * g + row[2] * b);

    let fx = lab_f(xyz[0] / X_N);
    let fy = lab_f(xyz[1] / Y_N);
    let fz = lab_f(xyz[2] / Z_N);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_lab_close(actual: Lab, expected: Lab) {
        assert!(
            (actual.l - expected.l).abs() < 0.1
                && (actual.a - expected.a).abs() < 0.1
                && (actual.b - expected.b).abs() < 0.1,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn black_is_origin() {
        assert_eq!(srgb_to_lab(Rgb::from([0, 0, 0])), Lab::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn reference_colors() {
        assert_lab_close(
            srgb_to_lab(Rgb::from([255, 255, 255])),
            Lab::new(100.0, 0.0, 0.0),
        );
        assert_lab_close(
            srgb_to_lab(Rgb::from([255, 0, 0])),
            Lab::new(53.24, 80.09, 67.20),
        );
        assert_lab_close(
            srgb_to_lab(Rgb::from([0, 255, 0])),
            Lab::new(87.74, -86.18, 83.18),
        );
        assert_lab_close(
            srgb_to_lab(Rgb::from([0, 0, 255])),
            Lab::new(32.30, 79.19, -107.86),
        );
        assert_lab_close(
            srgb_to_lab(Rgb::from([128, 128, 128])),
            Lab::new(53.59, 0.0, 0.0),
        );
    }

    #[test]
    fn lightness_is_monotonic_on_greys() {
        let mut prev = -1.0;
        for v in 0..=255u8 {
            let lab = srgb_to_lab(Rgb::from([v, v, v]));
            assert!(lab.l > prev, "L not increasing at {v}");
            prev = lab.l;
        }
    }
}
