//! WASM bindings for in-browser export.
//!
//! This module exposes the export entry points to JavaScript via wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::ExportConfig;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Convert article HTML to DOCX.
///
/// Returns the archive bytes (a `Uint8Array` on the JavaScript side). Use
/// [`suggested_filename`] for the download name.
#[wasm_bindgen]
pub fn html_to_docx(html: &str, title: &str) -> Result<Vec<u8>, JsValue> {
    let export = crate::export_docx_with_config(html, title, &ExportConfig::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(export.bytes)
}

/// Download name for an article titled `title`, with a timestamp suffix.
#[wasm_bindgen]
pub fn suggested_filename(title: &str) -> String {
    crate::suggested_filename(title, Some(crate::util::time_now_secs()))
}
