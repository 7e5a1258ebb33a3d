use crate::subjects::Subjects;
use image::RgbaImage;

/// A mask cell belongs to its subject when its alpha is strictly above this.
pub const MASK_ALPHA_THRESHOLD: u8 = 128;

/// First subject, in map order, whose mask claims cell `(x, y)`.
///
/// Overlapping masks are not blended: earlier subjects always win.
pub fn route(x: u32, y: u32, masks: &Subjects<RgbaImage>) -> Option<&str> {
    masks
        .iter()
        .find(|(_, mask)| {
            mask.get_pixel_checked(x, y)
                .is_some_and(|p| p[3] > MASK_ALPHA_THRESHOLD)
        })
        .map(|(subject, _)| subject)
}
