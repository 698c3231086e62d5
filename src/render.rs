//! Output adapters for finished matrices.
//!
//! Every renderer includes the quiet zone and draws dark modules black on a
//! white background. No styling is applied.

use std::fmt::Write;

use image::{GrayImage, Luma};

use crate::models::{BitMatrix, QrMatrix};

const DARK: u8 = 0;
const LIGHT: u8 = 255;

/// Grayscale raster with `module_px` pixels per module (minimum 1)
pub fn to_luma_image(matrix: &QrMatrix, module_px: u32) -> GrayImage {
    let scale = module_px.max(1);
    let side = matrix.size() as u32 * scale;
    GrayImage::from_fn(side, side, |px, py| {
        let dark = matrix.is_dark((px / scale) as usize, (py / scale) as usize);
        Luma([if dark { DARK } else { LIGHT }])
    })
}

/// Sample a raster produced by [`to_luma_image`] back into modules
///
/// Reads the center pixel of every module. Returns `None` when the image is
/// not square or its side is not a multiple of `module_px`.
pub fn from_luma_image(image: &GrayImage, module_px: u32) -> Option<BitMatrix> {
    let scale = module_px.max(1);
    let (width, height) = image.dimensions();
    if width != height || width % scale != 0 {
        return None;
    }
    let modules = (width / scale) as usize;
    let mut matrix = BitMatrix::square(modules);
    for y in 0..modules {
        for x in 0..modules {
            let px = x as u32 * scale + scale / 2;
            let py = y as u32 * scale + scale / 2;
            let Luma([level]) = *image.get_pixel(px, py);
            matrix.set(x, y, level < 128);
        }
    }
    Some(matrix)
}

/// SVG document with one path of unit squares in a module-sized viewBox
pub fn to_svg(matrix: &QrMatrix, module_px: u32) -> String {
    let size = matrix.size();
    let px = size as u32 * module_px.max(1);

    let mut path = String::new();
    for y in 0..size {
        for x in 0..size {
            if matrix.is_dark(x, y) {
                let _ = write!(path, "M{x},{y}h1v1h-1z");
            }
        }
    }

    format!(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" version="1.1" viewBox="0 0 {size} {size}" width="{px}" height="{px}" shape-rendering="crispEdges">
<rect width="100%" height="100%" fill="#FFFFFF"/>
<path d="{path}" fill="#000000"/>
</svg>
"##
    )
}

/// Terminal text, two characters per module so the output stays square
pub fn to_text(matrix: &QrMatrix) -> String {
    let size = matrix.size();
    let mut out = String::with_capacity(size * (size * 2 * 3 + 1));
    for y in 0..size {
        for x in 0..size {
            out.push_str(if matrix.is_dark(x, y) { "██" } else { "  " });
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ECLevel, MaskPattern, Version};

    fn sample() -> QrMatrix {
        let mut symbol = BitMatrix::square(21);
        symbol.set(0, 0, true);
        symbol.set(20, 20, true);
        QrMatrix::new(&symbol, Version::MIN, ECLevel::M, MaskPattern::Pattern0, 2)
    }

    #[test]
    fn test_luma_image() {
        let image = to_luma_image(&sample(), 3);
        assert_eq!(image.dimensions(), (75, 75));
        assert_eq!(image.get_pixel(0, 0).0, [LIGHT]);
        assert_eq!(image.get_pixel(6, 6).0, [DARK]);
        assert_eq!(image.get_pixel(8, 8).0, [DARK]);
        assert_eq!(image.get_pixel(9, 9).0, [LIGHT]);
    }

    #[test]
    fn test_luma_image_samples_back() {
        let qr = sample();
        let image = to_luma_image(&qr, 4);
        assert_eq!(from_luma_image(&image, 4).as_ref(), Some(qr.modules()));
        assert_eq!(from_luma_image(&image, 7), None);
    }

    #[test]
    fn test_svg() {
        let svg = to_svg(&sample(), 10);
        assert!(svg.contains(r#"viewBox="0 0 25 25""#));
        assert!(svg.contains(r#"width="250""#));
        assert_eq!(svg.matches("h1v1h-1z").count(), 2);
        assert!(svg.contains("M2,2h1v1h-1z"));
        assert!(svg.contains("M22,22h1v1h-1z"));
    }

    #[test]
    fn test_text() {
        let text = to_text(&sample());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 25);
        assert_eq!(lines[2].chars().count(), 50);
        assert!(lines[2].starts_with("    ██"));
        assert!(lines[0].trim().is_empty());
    }
}
