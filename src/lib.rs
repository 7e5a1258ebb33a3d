//! Segmentation-aware pixel art.
//!
//! An image is cut into `block_size` x `block_size` blocks. Each block becomes
//! one output pixel: its dominant color is matched, by CIEDE2000 distance,
//! against the palette of the subject whose segmentation mask claims that
//! cell. Blocks outside every mask use the combined palette of all subjects.
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use segpix::{generate, Subjects};
//!
//! let original = RgbaImage::from_pixel(20, 20, Rgba([200, 40, 30, 255]));
//! let masks: Subjects<_> = [("skin", RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255])))]
//!     .into_iter()
//!     .collect();
//! let palettes: Subjects<_> = [("skin", vec!["#FF0000".to_owned()])].into_iter().collect();
//!
//! let art = generate(&original, &masks, &palettes, 10).unwrap();
//! assert_eq!(art.dimensions(), (2, 2));
//! assert_eq!(*art.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
//! ```

pub mod delta_e;
pub mod error;
pub mod generator;
pub mod input;
pub mod lab;
pub mod median_cut;
pub mod palette;
pub mod router;
pub mod subjects;

pub use error::{ExtractError, GenerateError, MaskError, ParseColorError};
pub use generator::{generate, required_mask_dims, Generator};
pub use lab::{srgb_to_lab, Lab};
pub use palette::{parse_hex, LabPalette, PreparedPalettes};
pub use subjects::Subjects;
