//! Block mapper: turns an image into one palette color per block.

use crate::error::GenerateError;
use crate::lab::srgb_to_lab;
use crate::median_cut::dominant_color;
use crate::palette::PreparedPalettes;
use crate::router::route;
use crate::subjects::Subjects;
use image::{Pixel, Rgb, Rgba, RgbaImage};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Output grid size for an image of `width`x`height` split into
/// `block_size` blocks. Segmentation masks must have exactly this size.
pub fn required_mask_dims(
    width: u32,
    height: u32,
    block_size: u32,
) -> Result<(u32, u32), GenerateError> {
    if width == 0 || height == 0 {
        return Err(GenerateError::EmptyImage);
    }
    if block_size == 0 || width % block_size != 0 || height % block_size != 0 {
        return Err(GenerateError::InvalidScale {
            width,
            height,
            block_size,
        });
    }
    Ok((width / block_size, height / block_size))
}

/// Generates pixel art with default options. See [`Generator::generate`].
pub fn generate(
    original: &RgbaImage,
    masks: &Subjects<RgbaImage>,
    palettes: &Subjects<Vec<String>>,
    block_size: u32,
) -> Result<RgbaImage, GenerateError> {
    Generator::new(block_size).generate(original, masks, palettes)
}

type ProgressFn<'a> = dyn Fn(u8) + Sync + 'a;

pub struct Generator<'a> {
    block_size: u32,
    parallel: bool,
    progress: Option<Box<ProgressFn<'a>>>,
}

impl<'a> Generator<'a> {
    pub fn new(block_size: u32) -> Self {
        Self {
            block_size,
            parallel: true,
            progress: None,
        }
    }

    /// Process output rows on the rayon pool. Output is identical either way.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Called with the percentage of output rows completed, roughly every 10%
    /// and once at 100%. With parallel processing, calls may come from any
    /// worker thread.
    pub fn on_progress(mut self, f: impl Fn(u8) + Sync + 'a) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    /// Maps every `block_size` block of `original` to the nearest color of
    /// the palette selected by the segmentation masks.
    ///
    /// Validation happens before any block is touched: the block size must
    /// divide the image, every mask must match the output grid, and at least
    /// one palette color must be usable. Blocks whose dominant color cannot be
    /// extracted become transparent.
    pub fn generate(
        &self,
        original: &RgbaImage,
        masks: &Subjects<RgbaImage>,
        palettes: &Subjects<Vec<String>>,
    ) -> Result<RgbaImage, GenerateError> {
        let (out_w, out_h) =
            required_mask_dims(original.width(), original.height(), self.block_size)?;
        for (subject, mask) in masks {
            if mask.dimensions() != (out_w, out_h) {
                return Err(GenerateError::MaskDimensionMismatch {
                    subject: subject.to_owned(),
                    expected: (out_w, out_h),
                    actual: mask.dimensions(),
                });
            }
        }
        let palettes = PreparedPalettes::prepare(palettes)?;

        info!(
            block_size = self.block_size,
            width = out_w,
            height = out_h,
            subjects = masks.len(),
            "generating pixel art"
        );

        let mut output = RgbaImage::new(out_w, out_h);
        let row_len = out_w as usize * 4;
        let rows_done = AtomicUsize::new(0);
        let block_len = (self.block_size as usize).pow(2);
        let render = |(y, row): (usize, &mut [u8])| {
            let mut block = Vec::with_capacity(block_len);
            for (x, out) in row.chunks_exact_mut(4).enumerate() {
                let pixel =
                    self.map_block(original, masks, &palettes, x as u32, y as u32, &mut block);
                out.copy_from_slice(&pixel.0);
            }
            let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
            self.report_progress(done, out_h as usize);
        };
        if self.parallel {
            output.par_chunks_mut(row_len).enumerate().for_each(render);
        } else {
            output.chunks_mut(row_len).enumerate().for_each(render);
        }

        info!("pixel art generated");
        Ok(output)
    }

    fn map_block(
        &self,
        original: &RgbaImage,
        masks: &Subjects<RgbaImage>,
        palettes: &PreparedPalettes,
        x: u32,
        y: u32,
        block: &mut Vec<Rgb<u8>>,
    ) -> Rgba<u8> {
        let target = palettes.target(route(x, y, masks));

        let size = self.block_size;
        block.clear();
        for by in y * size..(y + 1) * size {
            for bx in x * size..(x + 1) * size {
                block.push(original.get_pixel(bx, by).to_rgb());
            }
        }
        let dominant = match dominant_color(block) {
            Ok(rgb) => rgb,
            Err(e) => {
                warn!(x, y, "block left transparent: {e}");
                return TRANSPARENT;
            }
        };

        match target.nearest(&srgb_to_lab(dominant)) {
            Some(i) => target.rgb()[i].to_rgba(),
            None => {
                warn!(x, y, "block left transparent: empty target palette");
                TRANSPARENT
            }
        }
    }

    fn report_progress(&self, done: usize, total: usize) {
        let step = (total / 10).max(1);
        if done % step != 0 && done != total {
            return;
        }
        let percent = (done * 100 / total) as u8;
        debug!(percent, "progress");
        if let Some(progress) = &self.progress {
            progress(percent);
        }
    }
}
