//! Convenience helpers for decoding images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{PixelGrid, Rgba};
use crate::util::{InkMatchError, InkMatchResult};
use std::path::Path;

/// Converts a decoded image into a pixel grid at 16 bits per channel.
pub fn grid_from_dynamic_image(img: &image::DynamicImage) -> InkMatchResult<PixelGrid> {
    let rgba = img.to_rgba16();
    let width = rgba.width() as usize;
    let height = rgba.height() as usize;
    let pixels = rgba
        .pixels()
        .map(|px| {
            let [r, g, b, a] = px.0;
            Rgba::new(r, g, b, a)
        })
        .collect();
    PixelGrid::new(pixels, width, height)
}

/// Loads an image from disk as a pixel grid.
pub fn load_pixel_grid<P: AsRef<Path>>(path: P) -> InkMatchResult<PixelGrid> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| InkMatchError::Decode {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    grid_from_dynamic_image(&img)
}
