use std::path::Path;

/// Fixed extension → MIME table for video assets. Shared by everything that
/// needs a content type for an upload key, so the mapping lives in one place.
const VIDEO_MIME_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("mov", "video/quicktime"),
    ("m4v", "video/x-m4v"),
    ("webm", "video/webm"),
    ("ogv", "video/ogg"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/avi"),
    ("mpg", "video/mpeg"),
    ("mpeg", "video/mpeg"),
    ("3gp", "video/3gpp"),
];

/// Content type for a video file extension. Unrecognized extensions fall back
/// to a `video/<ext>` literal rather than octet-stream.
pub fn video_content_type(ext: &str) -> String {
    let ext = ext.to_lowercase();
    VIDEO_MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| (*mime).to_string())
        .unwrap_or_else(|| format!("video/{ext}"))
}

/// Lowercased extension of an uploaded file name, if it has one.
pub fn file_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map_to_fixed_mimes() {
        assert_eq!(video_content_type("mp4"), "video/mp4");
        assert_eq!(video_content_type("mov"), "video/quicktime");
        assert_eq!(video_content_type("mkv"), "video/x-matroska");
        assert_eq!(video_content_type("3gp"), "video/3gpp");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(video_content_type("MP4"), "video/mp4");
        assert_eq!(video_content_type("MoV"), "video/quicktime");
    }

    #[test]
    fn unknown_extension_falls_back_to_literal() {
        assert_eq!(video_content_type("flv"), "video/flv");
        assert_eq!(video_content_type("WMV"), "video/wmv");
    }

    #[test]
    fn extension_from_file_name() {
        assert_eq!(file_extension("clip.MP4").as_deref(), Some("mp4"));
        assert_eq!(file_extension("archive.tar.mkv").as_deref(), Some("mkv"));
        assert_eq!(file_extension("no-extension"), None);
    }
}
