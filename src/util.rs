//! Utility functions with platform-specific implementations.

use std::borrow::Cow;

/// Current time as seconds since the Unix epoch.
///
/// On native platforms, uses `SystemTime::now()`.
/// On WASM, uses `js_sys::Date::now()`.
#[cfg(not(target_arch = "wasm32"))]
pub fn time_now_secs() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
pub fn time_now_secs() -> u64 {
    // js_sys::Date::now() returns milliseconds as f64
    (js_sys::Date::now() / 1000.0) as u64
}

/// Format Unix seconds as an ISO 8601 UTC timestamp (`2026-10-18T09:30:00Z`).
pub fn iso8601_utc(secs: u64) -> String {
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}Z",
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

/// Days since 1970-01-01 to (year, month, day), proleptic Gregorian.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Whether XML 1.0 allows `c` in character data.
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// `text` without the control characters XML 1.0 forbids.
pub fn strip_xml_invalid(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

/// Decode HTML bytes to a string.
///
/// Tries UTF-8 first (BOM handled by encoding_rs), then the encoding named
/// by a `<meta charset>` declaration, then Windows-1252.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    if let Some(label) = extract_meta_charset(bytes)
        && let Some(encoding) = encoding_rs::Encoding::for_label(label.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Find `charset=` in the first kilobyte of an HTML document.
fn extract_meta_charset(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(1024)];
    let pos = prefix
        .windows(8)
        .position(|w| w.eq_ignore_ascii_case(b"charset="))?;
    let rest = &prefix[pos + 8..];
    let rest = rest.strip_prefix(b"\"").or_else(|| rest.strip_prefix(b"'")).unwrap_or(rest);
    let end = rest
        .iter()
        .position(|&b| !(b.is_ascii_alphanumeric() || b == b'-' || b == b'_'))
        .unwrap_or(rest.len());
    std::str::from_utf8(&rest[..end]).ok().filter(|s| !s.is_empty())
}

/// Extract image dimensions from PNG, JPEG or GIF header bytes.
pub fn image_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() >= 24 && data.starts_with(b"\x89PNG") {
        let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
        let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
        return Some((width, height));
    }

    if data.len() >= 4 && data[0] == 0xFF && data[1] == 0xD8 {
        return jpeg_dimensions(data);
    }

    if data.len() >= 10 && data.starts_with(b"GIF") {
        let width = u16::from_le_bytes([data[6], data[7]]) as u32;
        let height = u16::from_le_bytes([data[8], data[9]]) as u32;
        return Some((width, height));
    }

    None
}

/// Walk JPEG segments to the first SOF marker.
fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let mut i = 2;
    while i + 4 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }

        let marker = data[i + 1];
        let is_sof = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof && i + 9 < data.len() {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Some((width, height));
        }

        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + length;
    }
    None
}

/// File name for an exported document: whitespace runs in `title` become
/// `_`, an optional Unix-seconds suffix avoids collisions.
pub fn derive_filename(title: &str, timestamp: Option<u64>, extension: &str) -> String {
    let stem = title
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| {
                    !c.is_control()
                        && !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
                })
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    let stem = if stem.is_empty() { "document" } else { stem.as_str() };

    match timestamp {
        Some(ts) => format!("{stem}_{ts}.{extension}"),
        None => format!("{stem}.{extension}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_filename() {
        assert_eq!(derive_filename("SOP: Disk Full", None, "docx"), "SOP_Disk_Full.docx");
        assert_eq!(
            derive_filename("  Runbook \t v2 ", Some(1_760_000_000), "docx"),
            "Runbook_v2_1760000000.docx"
        );
        assert_eq!(derive_filename("   ", None, "docx"), "document.docx");
        assert_eq!(derive_filename("a/b", None, "docx"), "ab.docx");
    }

    #[test]
    fn test_strip_xml_invalid() {
        assert!(matches!(strip_xml_invalid("plain\ttext\n"), Cow::Borrowed(_)));
        assert_eq!(strip_xml_invalid("disk\u{1}full\u{b}\u{c}x\u{fffe}"), "diskfullx");
        assert_eq!(strip_xml_invalid("caf\u{e9} \u{1F4BE}"), "caf\u{e9} \u{1F4BE}");
        assert_eq!(derive_filename("t\u{1}itle", None, "docx"), "title.docx");
    }

    #[test]
    fn test_iso8601() {
        assert_eq!(iso8601_utc(0), "1970-01-01T00:00:00Z");
        assert_eq!(iso8601_utc(951_782_400), "2000-02-29T00:00:00Z");
        assert_eq!(iso8601_utc(1_700_000_000), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_png_dimensions() {
        let mut png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
        png.extend_from_slice(&640u32.to_be_bytes());
        png.extend_from_slice(&480u32.to_be_bytes());
        assert_eq!(image_dimensions(&png), Some((640, 480)));
        assert_eq!(image_dimensions(&[0, 0, 0]), None);
    }

    #[test]
    fn test_gif_dimensions() {
        let gif = b"GIF89a\x20\x00\x10\x00rest";
        assert_eq!(image_dimensions(gif), Some((32, 16)));
    }

    #[test]
    fn test_decode_text_falls_back() {
        assert_eq!(decode_text("<p>caf\u{e9}</p>".as_bytes()), "<p>caf\u{e9}</p>");

        let latin1 = b"<meta charset=\"iso-8859-1\"><p>caf\xe9</p>";
        assert!(decode_text(latin1).contains("caf\u{e9}"));

        let unlabeled = b"<p>\x93quoted\x94</p>";
        assert_eq!(decode_text(unlabeled), "<p>\u{201c}quoted\u{201d}</p>");
    }
}
