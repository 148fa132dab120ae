//! Path utilities for stored media files.
//!
//! MIME derivation for streamed video, plus the filename sanitisation shared
//! by the stream resolver and the upload receiver.

use std::path::Path;

/// Known video extensions and their MIME types.
const VIDEO_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
    ("mov", "video/quicktime"),
    ("ts", "video/mp2t"),
];

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// MIME type for a video path, derived from its extension.
///
/// Returns `None` for unknown extensions so callers can pick their own
/// fallback.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use homestream_common::paths::video_content_type;
///
/// assert_eq!(video_content_type(Path::new("a.webm")), Some("video/webm"));
/// assert_eq!(video_content_type(Path::new("a.bin")), None);
/// ```
pub fn video_content_type(path: &Path) -> Option<&'static str> {
    let ext = lowercase_extension(path)?;
    VIDEO_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

/// Check that a request-supplied name is a single plain path segment.
///
/// Rejects empty names, `.` and `..`, anything containing a separator or NUL,
/// and absolute paths. Names passing this check can be joined onto a
/// directory without escaping it.
pub fn is_safe_file_name(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }
    if name.contains(['/', '\\', '\0']) {
        return false;
    }
    let path = Path::new(name);
    if path.is_absolute() || path.has_root() {
        return false;
    }
    let mut components = path.components();
    matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    )
}

/// Extension to keep when storing an upload under a generated name.
///
/// Lowercased, and only kept when it is short and alphanumeric so a
/// user-supplied filename can never smuggle separators into the stored name.
pub fn stored_extension(original_name: &str) -> Option<String> {
    let ext = lowercase_extension(Path::new(original_name))?;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext)
}
