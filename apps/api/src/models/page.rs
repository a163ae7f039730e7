use serde::Serialize;

pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// One rasterized resume page, base64-encoded JPEG.
/// Lives only for the request that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageImage {
    pub mime_type: &'static str,
    pub data: String,
    /// 1-based, follows source PDF page order.
    pub page_number: u32,
}

impl PageImage {
    pub fn jpeg(data: String, page_number: u32) -> Self {
        Self {
            mime_type: JPEG_MIME_TYPE,
            data,
            page_number,
        }
    }
}
