use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditError {
    #[error("Pixel data cannot be read as 8-bit RGBA: {0}")]
    FormatError(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Mask is {mask_width}x{mask_height} but image is {image_width}x{image_height}")]
    DimensionMismatch {
        mask_width: usize,
        mask_height: usize,
        image_width: usize,
        image_height: usize,
    },

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode input image: {0}")]
    DecodeError(String),

    #[error("Failed to encode output image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EditError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        EditError::InvalidParameter(message.into())
    }
}

pub type Result<T> = std::result::Result<T, EditError>;
