//! Image metadata lookup.
//!
//! The engine only needs an image's natural size, so this reads the header
//! and never decodes pixels.

use crate::error::{Error, Result};
use lightbox_gesture::ImageSize;
use std::path::Path;

/// Read the natural dimensions of the image at `path`.
pub fn image_size(path: &Path) -> Result<ImageSize> {
    let (width, height) = image::image_dimensions(path)?;
    let size = ImageSize::new(width, height);
    if size.is_empty() {
        return Err(Error::EmptyImage {
            path: path.to_path_buf(),
        });
    }
    log::debug!("Image {:?} is {}x{}", path, width, height);
    Ok(size)
}
