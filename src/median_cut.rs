use crate::error::ExtractError;
use image::Rgb;

/// The color a block collapses to when it is kept as a single median-cut box:
/// the rounded per-channel mean of its pixels.
pub fn dominant_color(pixels: &[Rgb<u8>]) -> Result<Rgb<u8>, ExtractError> {
    if pixels.is_empty() {
        return Err(ExtractError::EmptyBlock);
    }
    let len = pixels.len() as u64;
    let mut sum = [0u64; 3];
    for c in pixels {
        sum.iter_mut().zip(c.0).for_each(|(s, v)| *s += v as u64);
    }
    Ok(Rgb::from(sum.map(|s| ((s + len / 2) / len) as u8)))
}
