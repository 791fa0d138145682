//! Page background image, the immutable object 0 of every surface.

use super::DrawableId;
use crate::error::{Result, WhiteboardError};
use image::RgbaImage;
use resvg::{tiny_skia, usvg};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Image format of a background source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    /// Vector page, rasterized at its intrinsic size.
    Svg,
}

/// How far into an SVG file the root element is looked for.
const SVG_SNIFF_LEN: usize = 1024;

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Svg => "image/svg+xml",
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        // SVG: text, optionally behind a BOM and an XML prolog
        let head = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
        let head = head[..head.len().min(SVG_SNIFF_LEN)].trim_ascii_start();
        if (head.starts_with(b"<?xml") || head.starts_with(b"<svg")) && head.windows(4).any(|w| w == b"<svg") {
            return Some(ImageFormat::Svg);
        }

        None
    }

    /// Raster decoder for this format. `None` for vector formats.
    fn decoder_format(self) -> Option<image::ImageFormat> {
        match self {
            ImageFormat::Png => Some(image::ImageFormat::Png),
            ImageFormat::Jpeg => Some(image::ImageFormat::Jpeg),
            ImageFormat::WebP => Some(image::ImageFormat::WebP),
            ImageFormat::Svg => None,
        }
    }
}

/// Where a page background comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// An image file on disk.
    Path(PathBuf),
    /// Encoded image bytes already in memory.
    Bytes { label: String, data: Vec<u8> },
}

impl ImageSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        ImageSource::Path(path.into())
    }

    pub fn bytes(label: impl Into<String>, data: Vec<u8>) -> Self {
        ImageSource::Bytes {
            label: label.into(),
            data,
        }
    }

    /// Human-readable name used in logs and errors.
    pub fn label(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Bytes { label, .. } => label.clone(),
        }
    }
}

/// A decoded page background.
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    id: DrawableId,
    /// Source label (path or caller-provided name).
    pub source: String,
    pub format: ImageFormat,
    /// Decoded pixels, shared with whoever renders them.
    pub pixels: Arc<RgbaImage>,
}

impl BackgroundImage {
    /// Read and decode a background image.
    ///
    /// Fails with [`WhiteboardError::ImageLoad`] when the source cannot be
    /// read, is not a supported format, does not decode, or reports a zero
    /// dimension.
    pub fn load(source: &ImageSource) -> Result<Self> {
        let label = source.label();
        match source {
            ImageSource::Path(path) => {
                let data = std::fs::read(path).map_err(|e| WhiteboardError::image_load(&label, e))?;
                Self::decode(label, &data)
            }
            ImageSource::Bytes { data, .. } => Self::decode(label, data),
        }
    }

    fn decode(label: String, data: &[u8]) -> Result<Self> {
        let format = ImageFormat::from_magic_bytes(data)
            .ok_or_else(|| WhiteboardError::image_load(&label, "unrecognized image format"))?;

        let pixels = match format.decoder_format() {
            Some(decoder) => image::load_from_memory_with_format(data, decoder)
                .map_err(|e| WhiteboardError::image_load(&label, e))?
                .to_rgba8(),
            None => rasterize_svg(&label, data)?,
        };

        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(WhiteboardError::image_load(
                &label,
                format!("image has no usable dimensions ({width}x{height})"),
            ));
        }

        log::debug!("Decoded {} background {} ({}x{})", format.mime_type(), label, width, height);

        Ok(Self {
            id: Uuid::new_v4(),
            source: label,
            format,
            pixels: Arc::new(pixels),
        })
    }

    pub fn id(&self) -> DrawableId {
        self.id
    }

    /// Intrinsic width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Intrinsic height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Render an SVG document at its intrinsic size into straight-alpha RGBA.
fn rasterize_svg(label: &str, data: &[u8]) -> Result<RgbaImage> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default())
        .map_err(|e| WhiteboardError::image_load(label, e))?;

    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height()).ok_or_else(|| {
        WhiteboardError::image_load(
            label,
            format!("image has no usable dimensions ({}x{})", size.width(), size.height()),
        )
    })?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let raw: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();
    RgbaImage::from_raw(size.width(), size.height(), raw)
        .ok_or_else(|| WhiteboardError::image_load(label, "rasterized SVG has an unexpected buffer size"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::png_bytes;

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_magic_bytes(&png_bytes(2, 2)), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_magic_bytes(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::from_magic_bytes(b"<svg"), Some(ImageFormat::Svg));
        assert_eq!(
            ImageFormat::from_magic_bytes(b"\xEF\xBB\xBF\n<?xml version=\"1.0\"?>\n<svg/>"),
            Some(ImageFormat::Svg)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"<?xml version=\"1.0\"?><html/>"), None);
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a\x01\x00"), None);
        assert_eq!(ImageFormat::from_magic_bytes(&[0x89]), None);
    }

    #[test]
    fn test_load_svg_page() {
        let svg = br##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="60" height="40">
  <rect x="0" y="0" width="60" height="40" fill="#ff0000"/>
</svg>"##;
        let image = BackgroundImage::load(&ImageSource::bytes("page-1.svg", svg.to_vec())).unwrap();
        assert_eq!(image.format, ImageFormat::Svg);
        assert_eq!((image.width(), image.height()), (60, 40));
        assert_eq!(image.pixels.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(image.pixels.get_pixel(59, 39).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_broken_svg_is_image_load_error() {
        let result = BackgroundImage::load(&ImageSource::bytes("broken.svg", b"<svg width=\"10\"".to_vec()));
        assert!(matches!(result, Err(WhiteboardError::ImageLoad { .. })));
    }

    #[test]
    fn test_load_from_bytes() {
        let image = BackgroundImage::load(&ImageSource::bytes("page-1", png_bytes(40, 30))).unwrap();
        assert_eq!(image.width(), 40);
        assert_eq!(image.height(), 30);
        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!(image.source, "page-1");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        std::fs::write(&path, png_bytes(8, 12)).unwrap();

        let image = BackgroundImage::load(&ImageSource::path(&path)).unwrap();
        assert_eq!((image.width(), image.height()), (8, 12));
    }

    #[test]
    fn test_missing_file_is_image_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = BackgroundImage::load(&ImageSource::path(dir.path().join("missing.png")));
        assert!(matches!(result, Err(WhiteboardError::ImageLoad { .. })));
    }

    #[test]
    fn test_undecodable_bytes_are_image_load_error() {
        let result = BackgroundImage::load(&ImageSource::bytes("junk", b"not an image".to_vec()));
        assert!(matches!(result, Err(WhiteboardError::ImageLoad { .. })));

        // Correct magic, truncated body
        let mut truncated = png_bytes(4, 4);
        truncated.truncate(12);
        let result = BackgroundImage::load(&ImageSource::bytes("truncated", truncated));
        assert!(matches!(result, Err(WhiteboardError::ImageLoad { .. })));
    }
}
