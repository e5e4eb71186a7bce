//! Embedded image decoding.
//!
//! Only `data:` URIs are supported; images are never fetched.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::error::ImageDecodeError;
use crate::model::{Image, ImageFormat};
use crate::util::image_dimensions;

/// Standard alphabet, padding optional: generators frequently drop it.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Raw bytes of a data URI plus the MIME subtype its header declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedData {
    pub data: Vec<u8>,
    pub subtype: Option<String>,
}

/// Decode a `data:image/...;base64,` URI.
pub fn decode_data_uri(uri: &str) -> Result<DecodedData, ImageDecodeError> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or(ImageDecodeError::NotDataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(ImageDecodeError::NotDataUri)?;

    let mut params = header.split(';');
    let mime = params.next().unwrap_or_default();
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(ImageDecodeError::NotBase64Encoded);
    }

    // Generated markup wraps long payloads across lines.
    let payload: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if payload.is_empty() {
        return Err(ImageDecodeError::EmptyPayload);
    }

    let data = PAYLOAD_ENGINE.decode(payload.as_bytes())?;
    if data.is_empty() {
        return Err(ImageDecodeError::EmptyPayload);
    }

    let subtype = mime
        .trim()
        .split_once('/')
        .map(|(_, sub)| sub.to_ascii_lowercase())
        .filter(|sub| !sub.is_empty());

    Ok(DecodedData { data, subtype })
}

/// Turns data URIs into model images sized for a fixed presentation box.
#[derive(Debug, Clone, Copy)]
pub struct ImageDecoder {
    /// Display box in pixels.
    pub box_size: (u32, u32),
    /// Scale pictures with a readable header to fit the box instead of
    /// stretching them to fill it.
    pub preserve_aspect: bool,
}

impl Default for ImageDecoder {
    fn default() -> Self {
        Self {
            box_size: (550, 350),
            preserve_aspect: false,
        }
    }
}

impl ImageDecoder {
    pub fn decode(&self, uri: &str, alt: Option<&str>) -> Result<Image, ImageDecodeError> {
        let DecodedData { data, subtype } = decode_data_uri(uri)?;

        let format = ImageFormat::sniff(&data)
            .or_else(|| subtype.as_deref().and_then(ImageFormat::from_subtype))
            .unwrap_or(ImageFormat::Png);

        let (width, height) = self.display_size(&data);

        Ok(Image {
            data,
            format,
            width,
            height,
            alt: alt.map(str::trim).filter(|a| !a.is_empty()).map(str::to_string),
        })
    }

    fn display_size(&self, data: &[u8]) -> (u32, u32) {
        let (box_w, box_h) = self.box_size;
        if !self.preserve_aspect {
            return (box_w, box_h);
        }
        match image_dimensions(data) {
            Some((w, h)) if w > 0 && h > 0 => {
                let scale = f64::min(box_w as f64 / w as f64, box_h as f64 / h as f64).min(1.0);
                let width = ((w as f64 * scale).round() as u32).max(1);
                let height = ((h as f64 * scale).round() as u32).max(1);
                (width, height)
            }
            _ => (box_w, box_h),
        }
    }
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD;

    use super::*;

    #[test]
    fn test_decode_minimal_payload() {
        let decoded = decode_data_uri("data:image/png;base64,AAAA").unwrap();
        assert_eq!(decoded.data, vec![0, 0, 0]);
        assert_eq!(decoded.subtype.as_deref(), Some("png"));
    }

    #[test]
    fn test_decode_accepts_missing_padding() {
        let decoded = decode_data_uri("data:image/png;base64,AAA").unwrap();
        assert_eq!(decoded.data, vec![0, 0]);
    }

    #[test]
    fn test_decode_strips_whitespace() {
        let decoded = decode_data_uri("data:image/gif;base64,R0lG\n  ODlh").unwrap();
        assert!(decoded.data.starts_with(b"GIF89a"));
    }

    #[test]
    fn test_decode_failures() {
        assert!(matches!(
            decode_data_uri("data:image/png;base64,!!!"),
            Err(ImageDecodeError::InvalidBase64(_))
        ));
        assert!(matches!(
            decode_data_uri("data:image/png;base64,"),
            Err(ImageDecodeError::EmptyPayload)
        ));
        assert!(matches!(
            decode_data_uri("data:image/svg+xml,<svg/>"),
            Err(ImageDecodeError::NotBase64Encoded)
        ));
        assert!(matches!(
            decode_data_uri("https://example.com/a.png"),
            Err(ImageDecodeError::NotDataUri)
        ));
    }

    #[test]
    fn test_fixed_box_by_default() {
        let image = ImageDecoder::default()
            .decode("data:image/png;base64,AAAA", Some("  "))
            .unwrap();
        assert_eq!((image.width, image.height), (550, 350));
        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!(image.alt, None);
    }

    #[test]
    fn test_preserve_aspect_fits_box() {
        // 64x16 GIF header.
        let gif = STANDARD.encode(b"GIF89a\x40\x00\x10\x00\x00\x00\x00");
        let decoder = ImageDecoder {
            box_size: (32, 32),
            preserve_aspect: true,
        };
        let image = decoder
            .decode(&format!("data:image/gif;base64,{gif}"), Some("chart"))
            .unwrap();
        assert_eq!((image.width, image.height), (32, 8));
        assert_eq!(image.format, ImageFormat::Gif);
        assert_eq!(image.alt.as_deref(), Some("chart"));
    }
}
