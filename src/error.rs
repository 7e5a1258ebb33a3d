use image::ImageError;

/// Fatal conditions that abort a whole [`generate`](crate::generate) call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("image has no pixels")]
    EmptyImage,

    #[error("block size {block_size} does not evenly divide image size {width}x{height}")]
    InvalidScale {
        width: u32,
        height: u32,
        block_size: u32,
    },

    #[error(
        "mask '{subject}' has wrong dimensions ({}x{}), expected {}x{}",
        .actual.0, .actual.1, .expected.0, .expected.1
    )]
    MaskDimensionMismatch {
        subject: String,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("no valid palette was provided for any subject")]
    NoValidPalettes,

    #[error("palettes contain no usable colors for the fallback palette")]
    NoUsableColors,
}

/// A palette entry that is not a `#RRGGBB` token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseColorError {
    #[error("hex color must start with '#'")]
    MissingHash,

    #[error("invalid hex color length {0} (expected 6 digits)")]
    InvalidLength(usize),

    #[error("invalid hex digit '{0}'")]
    InvalidDigit(char),
}

/// Per-block failure; the block is written as a transparent pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("block contains no pixels")]
    EmptyBlock,
}

/// A segmentation mask file that could not be used.
#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    #[error("{file}: failed to read ({source})")]
    Read {
        file: String,
        #[source]
        source: ImageError,
    },

    #[error(
        "{file}: wrong dimensions (expected {}x{}, found {}x{})",
        .expected.0, .expected.1, .actual.0, .actual.1
    )]
    Dimensions {
        file: String,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("{file}: duplicate subject name '{subject}'")]
    DuplicateSubject { file: String, subject: String },
}
