use std::io::Cursor;

use image::error::{ImageError, LimitError, LimitErrorKind};
use image::{ColorType, GrayImage, ImageFormat, Limits, Luma, Rgb, RgbImage};

use crate::builder::QR;
use crate::common::error::{QRError, QRResult};
use crate::common::metadata::Color;

const QUIET_ZONE: usize = 4;

// Matrix
//------------------------------------------------------------------------------

/// Row major snapshot of a finished symbol, `1` for dark modules and `0` for
/// light ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    w: usize,
    modules: Vec<u8>,
}

impl Matrix {
    pub fn width(&self) -> usize {
        self.w
    }

    pub fn get(&self, r: usize, c: usize) -> u8 {
        self.modules[r * self.w + c]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.modules.chunks_exact(self.w)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.modules
    }
}

// Renderers
//------------------------------------------------------------------------------

impl QR {
    pub fn to_matrix(&self) -> Matrix {
        let w = self.width() as i16;
        let modules = (0..w)
            .flat_map(|r| (0..w).map(move |c| (r, c)))
            .map(|(r, c)| self.color_at(r, c).select(0, 1))
            .collect();
        Matrix { w: self.width(), modules }
    }

    /// SVG document with one rectangle per dark module. No quiet zone is added.
    pub fn to_svg(&self, cell_w: usize, cell_h: usize, color: &str) -> QRResult<String> {
        let (img_w, img_h) = self.canvas_size(cell_w, cell_h)?;
        let mut svg = String::new();
        svg.push_str("<?xml version=\"1.0\" standalone=\"no\" ?>\n");
        svg.push_str(&format!(
            "<svg width=\"{img_w}\" height=\"{img_h}\" version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\">\n"
        ));
        svg.push_str(&format!("\t<g fill=\"{color}\" stroke=\"none\">\n"));
        for (r, c) in self.dark_modules() {
            svg.push_str(&format!(
                "\t\t<rect x=\"{}\" y=\"{}\" width=\"{cell_w}\" height=\"{cell_h}\" />\n",
                c * cell_w,
                r * cell_h
            ));
        }
        svg.push_str("\t</g>\n</svg>\n");
        Ok(svg)
    }

    /// Absolutely positioned `div`s, one per dark module. No quiet zone is added.
    pub fn to_html(&self, cell_w: usize, cell_h: usize, color: &str) -> QRResult<String> {
        let (img_w, img_h) = self.canvas_size(cell_w, cell_h)?;
        let mut html = format!(
            "<div style=\"font-size:0;position:relative;width:{img_w}px;height:{img_h}px;\">\n"
        );
        for (r, c) in self.dark_modules() {
            html.push_str(&format!(
                "<div style=\"background-color:{color};width:{cell_w}px;height:{cell_h}px;\
                 position:absolute;left:{}px;top:{}px;\">&nbsp;</div>\n",
                c * cell_w,
                r * cell_h
            ));
        }
        html.push_str("</div>\n");
        Ok(html)
    }

    /// PNG bytes with dark modules in `rgb` over a white background. Oversized
    /// canvases and encoder failures surface as [`QRError::Render`].
    pub fn to_png(&self, cell_w: u32, cell_h: u32, rgb: [u8; 3]) -> QRResult<Vec<u8>> {
        let w = self.width() as u32;
        let (img_w, img_h) = match (w.checked_mul(cell_w), w.checked_mul(cell_h)) {
            (Some(img_w), Some(img_h)) => (img_w, img_h),
            _ => return Err(too_large()),
        };
        Limits::default().reserve_buffer(img_w, img_h, ColorType::Rgb8)?;

        let canvas = RgbImage::from_fn(img_w, img_h, |x, y| {
            let (r, c) = ((y / cell_h) as i16, (x / cell_w) as i16);
            self.color_at(r, c).select(Rgb([255, 255, 255]), Rgb(rgb))
        });

        let mut bytes = Vec::new();
        canvas.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Greyscale image with a 4 module quiet zone.
    pub fn to_image(&self, module_sz: u32) -> GrayImage {
        let qz_sz = QUIET_ZONE as u32 * module_sz;
        let qr_sz = self.width() as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        GrayImage::from_fn(total_sz, total_sz, |x, y| {
            if x < qz_sz || x >= qz_sz + qr_sz || y < qz_sz || y >= qz_sz + qr_sz {
                return Luma([255]);
            }
            let r = ((y - qz_sz) / module_sz) as i16;
            let c = ((x - qz_sz) / module_sz) as i16;
            self.color_at(r, c).select(Luma([255]), Luma([0]))
        })
    }

    /// Block characters for dark terminal backgrounds: light modules are drawn
    /// as `█`, with a 4 module quiet zone.
    pub fn to_str(&self, module_sz: usize) -> String {
        let qz_sz = QUIET_ZONE * module_sz;
        let qr_sz = self.width() * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = String::with_capacity(total_sz * (total_sz * 3 + 1));
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.push('█');
                    continue;
                }
                let r = ((i - qz_sz) / module_sz) as i16;
                let c = ((j - qz_sz) / module_sz) as i16;
                canvas.push(self.color_at(r, c).select('█', ' '));
            }
            canvas.push('\n');
        }
        canvas
    }

    // Pixel size of the symbol without quiet zone
    fn canvas_size(&self, cell_w: usize, cell_h: usize) -> QRResult<(usize, usize)> {
        let w = self.width();
        match (w.checked_mul(cell_w), w.checked_mul(cell_h)) {
            (Some(img_w), Some(img_h)) => Ok((img_w, img_h)),
            _ => Err(too_large()),
        }
    }

    fn color_at(&self, r: i16, c: i16) -> Color {
        *self.get(r, c)
    }

    fn dark_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let w = self.width();
        (0..w)
            .flat_map(move |r| (0..w).map(move |c| (r, c)))
            .filter(|&(r, c)| self.color_at(r as i16, c as i16) == Color::Dark)
    }
}

fn too_large() -> QRError {
    QRError::Render(ImageError::Limits(LimitError::from_kind(LimitErrorKind::DimensionError)))
}
