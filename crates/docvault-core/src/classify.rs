//! Category classification
//!
//! Maps a declared MIME type, or failing that the filename extension, onto one
//! [`Category`]. Total: anything unrecognised is `Category::Other`.

use crate::models::Category;

/// Extension lookup used when no content type was declared. Checked in order.
const EXTENSION_TABLE: &[(Category, &[&str])] = &[
    (Category::Pdf, &["pdf"]),
    (
        Category::Image,
        &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp"],
    ),
    (Category::Excel, &["xls", "xlsx", "csv"]),
    (Category::Word, &["doc", "docx", "odt", "rtf"]),
    (Category::Powerpoint, &["ppt", "pptx"]),
    (Category::Text, &["txt", "md"]),
    (Category::Video, &["mp4", "mov", "avi", "mkv", "webm"]),
    (Category::Audio, &["mp3", "wav", "ogg", "flac"]),
    (Category::Zip, &["zip", "rar", "7z", "tar", "gz"]),
    (
        Category::Text,
        &["js", "ts", "tsx", "jsx", "py", "html", "css", "json"],
    ),
];

/// Classify a file by its declared content type, falling back to its extension.
pub fn classify(declared_type: &str, file_name: &str) -> Category {
    let declared = declared_type.trim();
    if declared.is_empty() {
        classify_extension(file_name)
    } else {
        classify_mime(&declared.to_lowercase())
    }
}

fn classify_mime(mime: &str) -> Category {
    let contains_any = |needles: &[&str]| needles.iter().any(|n| mime.contains(n));

    if mime == "application/pdf" {
        Category::Pdf
    } else if mime.starts_with("image/") {
        Category::Image
    } else if mime.starts_with("video/") {
        Category::Video
    } else if mime.starts_with("audio/") {
        Category::Audio
    } else if contains_any(&["spreadsheet", "excel"]) || mime == "text/csv" {
        Category::Excel
    } else if contains_any(&["word", "opendocument.text"]) {
        Category::Word
    } else if contains_any(&["presentation", "powerpoint"]) {
        Category::Powerpoint
    } else if mime == "text/plain" || contains_any(&["javascript", "json", "html"]) {
        Category::Text
    } else if contains_any(&["zip", "rar", "tar"]) {
        Category::Zip
    } else {
        Category::Other
    }
}

/// The text after the last `.`; a name without a dot is its own "extension".
fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

fn classify_extension(file_name: &str) -> Category {
    let ext = extension_of(file_name);
    EXTENSION_TABLE
        .iter()
        .find(|(_, exts)| exts.contains(&ext.as_str()))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}
