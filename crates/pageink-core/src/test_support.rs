//! Helpers shared by unit tests.

use crate::color::BrushColor;
use crate::shapes::{ImageSource, Stroke};
use crate::surface::DrawingSurface;
use image::{DynamicImage, Rgba, RgbaImage};
use kurbo::Point;
use std::io::Cursor;

/// Encode a blank white PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// A 200x100 page surface with display width 300.
pub fn surface(index: usize) -> DrawingSurface {
    let source = ImageSource::bytes(format!("page-{index}"), png_bytes(200, 100));
    DrawingSurface::initialize(&source, index, 300.0).unwrap()
}

/// A short two-point stroke.
pub fn stroke() -> Stroke {
    Stroke::from_points(
        vec![Point::new(1.0, 1.0), Point::new(5.0, 5.0)],
        BrushColor::black(),
        1.0,
    )
}
