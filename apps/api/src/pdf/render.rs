//! Page rasterization for vision models.
//!
//! Two strategies sit behind `PageRenderer`:
//! - `PdfiumRenderer` binds the pdfium shared library and renders real pages.
//! - `PlaceholderRenderer` produces one white 800×1000 page with the file name
//!   and size drawn onto it, also copied into a JPEG comment segment.
//!
//! `Rasterizer::detect` probes for pdfium once at startup. At call time a
//! render error or an empty result from the primary renderer falls back to the
//! placeholder, so a missing rendering library never fails a request.

// Pixel dimensions are computed from f32 point sizes.
#![allow(clippy::cast_possible_truncation)]

use std::path::Path;
use std::sync::Arc;

use base64::prelude::{Engine as _, BASE64_STANDARD};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use pdfium_render::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::page::PageImage;
use crate::pdf::UploadedPdf;

pub const MAX_RENDERED_PAGES: usize = 2;
pub const RENDER_DPI: f32 = 150.0;
pub const JPEG_QUALITY: u8 = 85;
pub const PLACEHOLDER_WIDTH: u32 = 800;
pub const PLACEHOLDER_HEIGHT: u32 = 1000;

/// Caption lines start at x = 50 and are 50px apart from y = 50.
const CAPTION_ORIGIN: (u32, u32) = (50, 50);
const CAPTION_LINE_STEP: u32 = 50;
/// Each 8×8 glyph cell is drawn as a GLYPH_SCALE × GLYPH_SCALE block.
const GLYPH_SCALE: u32 = 2;
const GLYPH_SIZE: u32 = 8;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
const GREEN: Rgb<u8> = Rgb([0, 128, 0]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);

/// PDF dimensions are in points; 1 inch = 72 points.
const PDF_POINTS_PER_INCH: f32 = 72.0;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF backend error: {0}")]
    Backend(String),

    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// A strategy that turns an uploaded PDF into page images.
pub trait PageRenderer: Send + Sync {
    fn name(&self) -> &'static str;

    fn render(&self, upload: &UploadedPdf) -> Result<Vec<PageImage>, RenderError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PdfiumRenderer
// ────────────────────────────────────────────────────────────────────────────

pub struct PdfiumRenderer {
    pdfium: Pdfium,
}

impl PdfiumRenderer {
    /// Binds pdfium from `library_dir`, or from the system library path when `None`.
    pub fn bind(library_dir: Option<&Path>) -> Result<Self, RenderError> {
        let bindings = match library_dir {
            Some(dir) => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| RenderError::Backend(format!("{e:?}")))?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PageRenderer for PdfiumRenderer {
    fn name(&self) -> &'static str {
        "pdfium"
    }

    fn render(&self, upload: &UploadedPdf) -> Result<Vec<PageImage>, RenderError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(upload.bytes.as_ref(), None)
            .map_err(|e| RenderError::Backend(format!("Failed to load PDF: {e:?}")))?;

        let mut pages = Vec::with_capacity(MAX_RENDERED_PAGES);

        for (index, page) in document.pages().iter().take(MAX_RENDERED_PAGES).enumerate() {
            let page_number = index as u32 + 1;
            let width = (page.width().value * RENDER_DPI / PDF_POINTS_PER_INCH) as i32;
            let height = (page.height().value * RENDER_DPI / PDF_POINTS_PER_INCH) as i32;

            let render_config = PdfRenderConfig::new()
                .set_target_width(width)
                .set_maximum_height(height);

            let bitmap = page.render_with_config(&render_config).map_err(|e| {
                RenderError::Backend(format!("Failed to render page {page_number}: {e:?}"))
            })?;

            let jpeg = encode_jpeg(&bitmap.as_image().to_rgb8())?;
            pages.push(PageImage::jpeg(BASE64_STANDARD.encode(jpeg), page_number));
        }

        Ok(pages)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PlaceholderRenderer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

impl PlaceholderRenderer {
    fn caption_lines(upload: &UploadedPdf) -> [(String, Rgb<u8>); 4] {
        [
            ("PDF Content Preview".to_string(), BLACK),
            (format!("File: {}", upload.name), BLUE),
            (format!("Size: {} bytes", upload.size()), GREEN),
            ("Using fallback processing".to_string(), RED),
        ]
    }

    fn caption(upload: &UploadedPdf) -> String {
        Self::caption_lines(upload)
            .map(|(line, _)| line)
            .join("\n")
    }

    fn canvas(upload: &UploadedPdf) -> RgbImage {
        let mut canvas =
            RgbImage::from_pixel(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT, Rgb([255, 255, 255]));
        let (x, mut y) = CAPTION_ORIGIN;
        for (line, color) in Self::caption_lines(upload) {
            draw_text(&mut canvas, x, y, &line, color);
            y += CAPTION_LINE_STEP;
        }
        canvas
    }
}

impl PageRenderer for PlaceholderRenderer {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn render(&self, upload: &UploadedPdf) -> Result<Vec<PageImage>, RenderError> {
        let jpeg = annotate_jpeg(encode_jpeg(&Self::canvas(upload))?, &Self::caption(upload));
        Ok(vec![PageImage::jpeg(BASE64_STANDARD.encode(jpeg), 1)])
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rasterizer: strategy selection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Rasterizer {
    primary: Option<Arc<dyn PageRenderer>>,
    placeholder: PlaceholderRenderer,
}

impl Rasterizer {
    /// Capability check: uses pdfium when it binds, the placeholder otherwise.
    pub fn detect(library_dir: Option<&Path>) -> Self {
        match PdfiumRenderer::bind(library_dir) {
            Ok(renderer) => {
                info!("PDF renderer: pdfium");
                Self::with_primary(Arc::new(renderer))
            }
            Err(e) => {
                warn!("pdfium unavailable ({e}); resumes will be sent as placeholder pages");
                Self::placeholder_only()
            }
        }
    }

    pub fn with_primary(primary: Arc<dyn PageRenderer>) -> Self {
        Self {
            primary: Some(primary),
            placeholder: PlaceholderRenderer,
        }
    }

    pub fn placeholder_only() -> Self {
        Self {
            primary: None,
            placeholder: PlaceholderRenderer,
        }
    }

    /// Name of the renderer tried first.
    pub fn backend(&self) -> &'static str {
        self.primary
            .as_ref()
            .map(|r| r.name())
            .unwrap_or_else(|| self.placeholder.name())
    }

    /// Renders up to two pages, falling back to a single placeholder page.
    pub fn rasterize(&self, upload: &UploadedPdf) -> Result<Vec<PageImage>, RenderError> {
        if let Some(primary) = &self.primary {
            match primary.render(upload) {
                Ok(pages) if !pages.is_empty() => return Ok(pages),
                Ok(_) => warn!(
                    renderer = primary.name(),
                    file = %upload.name,
                    "Renderer produced no pages; using placeholder"
                ),
                Err(e) => warn!(
                    renderer = primary.name(),
                    file = %upload.name,
                    "Rendering failed ({e}); using placeholder"
                ),
            }
        }
        self.placeholder.render(upload)
    }
}

fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>, image::ImageError> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).encode_image(image)?;
    Ok(out)
}

/// Draws `text` with the 8×8 bitmap font, top-left at (`x`, `y`).
/// Glyphs past the right edge are clipped; characters without a glyph are skipped.
fn draw_text(canvas: &mut RgbImage, x: u32, y: u32, text: &str, color: Rgb<u8>) {
    let advance = GLYPH_SIZE * GLYPH_SCALE;
    for (i, ch) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch) else {
            continue;
        };
        let origin_x = x + i as u32 * advance;
        if origin_x >= canvas.width() {
            break;
        }
        for (row, &bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                // Least significant bit is the leftmost pixel.
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                let px = origin_x + col * GLYPH_SCALE;
                let py = y + row as u32 * GLYPH_SCALE;
                for dy in 0..GLYPH_SCALE {
                    for dx in 0..GLYPH_SCALE {
                        if px + dx < canvas.width() && py + dy < canvas.height() {
                            canvas.put_pixel(px + dx, py + dy, color);
                        }
                    }
                }
            }
        }
    }
}

/// Inserts a COM segment right after the SOI marker.
fn annotate_jpeg(jpeg: Vec<u8>, comment: &str) -> Vec<u8> {
    const SOI: [u8; 2] = [0xFF, 0xD8];
    const COM: [u8; 2] = [0xFF, 0xFE];
    // Segment length counts its own two bytes.
    const MAX_COMMENT_BYTES: usize = u16::MAX as usize - 2;

    if !jpeg.starts_with(&SOI) {
        return jpeg;
    }

    let text = &comment.as_bytes()[..comment.len().min(MAX_COMMENT_BYTES)];
    let segment_len = (text.len() + 2) as u16;

    let mut out = Vec::with_capacity(jpeg.len() + text.len() + 4);
    out.extend_from_slice(&SOI);
    out.extend_from_slice(&COM);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(text);
    out.extend_from_slice(&jpeg[SOI.len()..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use image::{GenericImageView, ImageFormat};

    use crate::pdf::fixtures::ONE_PAGE_PDF;

    struct FailingRenderer;

    impl PageRenderer for FailingRenderer {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn render(&self, _upload: &UploadedPdf) -> Result<Vec<PageImage>, RenderError> {
            Err(RenderError::Backend("library missing".to_string()))
        }
    }

    struct FixedRenderer(Vec<PageImage>);

    impl PageRenderer for FixedRenderer {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn render(&self, _upload: &UploadedPdf) -> Result<Vec<PageImage>, RenderError> {
            Ok(self.0.clone())
        }
    }

    fn upload() -> UploadedPdf {
        UploadedPdf::new("jane_doe.pdf", None, Bytes::from_static(ONE_PAGE_PDF))
    }

    fn decode(page: &PageImage) -> Vec<u8> {
        BASE64_STANDARD.decode(&page.data).unwrap()
    }

    #[test]
    fn test_placeholder_is_single_annotated_jpeg_page() {
        let pages = PlaceholderRenderer.render(&upload()).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[0].mime_type, "image/jpeg");

        let jpeg = decode(&pages[0]);
        assert_eq!(&jpeg[..4], &[0xFF, 0xD8, 0xFF, 0xFE]);
        let caption = String::from_utf8_lossy(&jpeg[6..200]);
        assert!(caption.contains("File: jane_doe.pdf"));
        assert!(caption.contains(&format!("Size: {} bytes", ONE_PAGE_PDF.len())));
    }

    fn is_inked(pixel: &Rgb<u8>) -> bool {
        pixel.0.iter().any(|&c| c < 200)
    }

    #[test]
    fn test_placeholder_caption_is_drawn_into_pixels() {
        let pages = PlaceholderRenderer.render(&upload()).unwrap();
        let image = image::load_from_memory_with_format(&decode(&pages[0]), ImageFormat::Jpeg)
            .unwrap()
            .to_rgb8();

        // One band per caption line, starting at y = 50, 100, 150, 200.
        for line in 0..4 {
            let top = CAPTION_ORIGIN.1 + line * CAPTION_LINE_STEP;
            let inked = (top..top + GLYPH_SIZE * GLYPH_SCALE)
                .flat_map(|y| (CAPTION_ORIGIN.0..400).map(move |x| (x, y)))
                .filter(|&(x, y)| is_inked(image.get_pixel(x, y)))
                .count();
            assert!(inked > 50, "caption line {line} has {inked} inked pixels");
        }

        // Nothing is drawn above or left of the caption block.
        let stray = (0..40)
            .flat_map(|y| (0..PLACEHOLDER_WIDTH).map(move |x| (x, y)))
            .filter(|&(x, y)| is_inked(image.get_pixel(x, y)))
            .count();
        assert_eq!(stray, 0);
    }

    #[test]
    fn test_draw_text_clips_at_canvas_edge() {
        let mut canvas = RgbImage::from_pixel(40, 20, Rgb([255, 255, 255]));
        draw_text(&mut canvas, 30, 10, "WWWW", BLUE);
        assert_eq!(canvas.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert!(canvas.pixels().any(|p| *p == BLUE));
    }

    /// Three US Letter pages (612×792 pt) with a valid xref table.
    fn three_page_pdf() -> Vec<u8> {
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R 4 0 R 5 0 R] /Count 3 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>".to_string(),
        ];
        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }
        let xref_at = pdf.len();
        pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
        for offset in offsets {
            pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
                objects.len() + 1
            )
            .as_bytes(),
        );
        pdf
    }

    #[test]
    fn test_pdfium_renders_first_two_pages_at_150_dpi() {
        let renderer = match PdfiumRenderer::bind(None) {
            Ok(renderer) => renderer,
            Err(e) => {
                eprintln!("skipping pdfium render test: {e}");
                return;
            }
        };
        let upload = UploadedPdf::new("three_pages.pdf", None, Bytes::from(three_page_pdf()));

        let pages = renderer.render(&upload).unwrap();
        assert_eq!(pages.len(), MAX_RENDERED_PAGES);
        assert_eq!(pages.iter().map(|p| p.page_number).collect::<Vec<_>>(), vec![1, 2]);

        let expected_width = (612.0 * RENDER_DPI / PDF_POINTS_PER_INCH) as u32;
        for page in &pages {
            assert_eq!(page.mime_type, "image/jpeg");
            let image = image::load_from_memory_with_format(&decode(page), ImageFormat::Jpeg).unwrap();
            let (width, height) = image.dimensions();
            assert!(width.abs_diff(expected_width) <= 2, "width {width}");
            assert!(height.abs_diff(1650) <= 2, "height {height}");
        }
    }

    #[test]
    fn test_placeholder_decodes_at_fixed_size() {
        let pages = PlaceholderRenderer.render(&upload()).unwrap();
        let image = image::load_from_memory_with_format(&decode(&pages[0]), ImageFormat::Jpeg).unwrap();
        assert_eq!(image.dimensions(), (PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT));
    }

    #[test]
    fn test_rasterizer_falls_back_when_primary_errors() {
        let rasterizer = Rasterizer::with_primary(Arc::new(FailingRenderer));
        assert_eq!(rasterizer.backend(), "failing");
        let pages = rasterizer.rasterize(&upload()).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
    }

    #[test]
    fn test_rasterizer_falls_back_on_empty_output() {
        let rasterizer = Rasterizer::with_primary(Arc::new(FixedRenderer(vec![])));
        let pages = rasterizer.rasterize(&upload()).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(decode(&pages[0]).starts_with(&[0xFF, 0xD8, 0xFF, 0xFE]));
    }

    #[test]
    fn test_rasterizer_prefers_primary_output() {
        let rendered = vec![
            PageImage::jpeg("cGFnZTE=".to_string(), 1),
            PageImage::jpeg("cGFnZTI=".to_string(), 2),
        ];
        let rasterizer = Rasterizer::with_primary(Arc::new(FixedRenderer(rendered.clone())));
        assert_eq!(rasterizer.rasterize(&upload()).unwrap(), rendered);
    }

    #[test]
    fn test_placeholder_only_backend_name() {
        assert_eq!(Rasterizer::placeholder_only().backend(), "placeholder");
    }

    #[test]
    fn test_annotate_leaves_non_jpeg_untouched() {
        let data = vec![1, 2, 3];
        assert_eq!(annotate_jpeg(data.clone(), "note"), data);
    }

    #[test]
    fn test_annotate_writes_segment_length() {
        let out = annotate_jpeg(vec![0xFF, 0xD8, 0xFF, 0xD9], "abc");
        assert_eq!(out, vec![0xFF, 0xD8, 0xFF, 0xFE, 0x00, 0x05, b'a', b'b', b'c', 0xFF, 0xD9]);
    }
}
