//! MIME type detection module
//!
//! Guesses the Content-Type of a brand asset from its file name.

use std::path::Path;

/// Returned when the extension is unknown
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Get MIME Content-Type based on file extension (case-insensitive)
///
/// # Examples
/// ```
/// use brandgate::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("css")), "text/css");
/// assert_eq!(get_content_type(Some("PNG")), "image/png");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    let Some(ext) = extension else {
        return OCTET_STREAM;
    };
    match ext.to_ascii_lowercase().as_str() {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "txt" => "text/plain; charset=utf-8",
        "xml" => "application/xml",

        // Scripts
        "js" | "mjs" => "application/javascript",
        "json" | "map" => "application/json",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "avif" => "image/avif",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",

        _ => OCTET_STREAM,
    }
}

/// Guess the Content-Type of a file path or asset name
pub fn guess_type(path: &str) -> &'static str {
    get_content_type(Path::new(path).extension().and_then(|e| e.to_str()))
}

/// Media type without parameters, e.g. `text/html` for `text/html; charset=utf-8`
pub fn essence(content_type: &str) -> &str {
    content_type
        .split_once(';')
        .map_or(content_type, |(essence, _)| essence)
        .trim()
}
