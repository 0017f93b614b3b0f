// src/catalog.rs

//! Static lookup tables used as evidence by the naming engine.

/// Content types the crawler knows how to name, mapped to their extension.
pub static MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("application/pdf", ".pdf"),
    ("application/msword", ".doc"),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ".docx",
    ),
    ("application/vnd.ms-excel", ".xls"),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ".xlsx",
    ),
    ("application/vnd.ms-powerpoint", ".ppt"),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        ".pptx",
    ),
    ("text/plain", ".txt"),
    ("text/html", ".html"),
    ("image/jpeg", ".jpg"),
    ("image/png", ".png"),
    ("image/gif", ".gif"),
    ("application/zip", ".zip"),
    ("application/x-rar-compressed", ".rar"),
    ("video/mp4", ".mp4"),
    ("video/quicktime", ".mov"),
    ("audio/mpeg", ".mp3"),
    ("application/json", ".json"),
];

/// Leading byte sequences and the extension they identify. Checked in order.
pub static FILE_SIGNATURES: &[(&[u8], &str)] = &[
    (b"%PDF", ".pdf"),
    (b"PK", ".zip"),
    (b"\xFF\xD8", ".jpg"),
    (b"\x89PNG", ".png"),
];

/// Strips parameters (`; charset=...`) and case from a content-type value.
pub fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

pub fn extension_for_mime(content_type: &str) -> Option<&'static str> {
    let mime = essence(content_type);
    MIME_EXTENSIONS
        .iter()
        .find(|(known, _)| *known == mime)
        .map(|(_, ext)| *ext)
}

pub fn extension_for_signature(prefix: &[u8]) -> Option<&'static str> {
    FILE_SIGNATURES
        .iter()
        .find(|(signature, _)| prefix.starts_with(signature))
        .map(|(_, ext)| *ext)
}

pub fn is_html(content_type: &str) -> bool {
    essence(content_type) == "text/html"
}
