//! Static tool capability registry: which output formats each tool can
//! produce. Read-only at run time. Whether a tool is installed is a
//! separate question answered by the resolver.

use super::ToolId;

const SIPS_FORMATS: &[&str] = &[
    "jpeg", "jpg", "png", "tiff", "tif", "bmp", "gif", "pict", "pdf", "heic",
];

const AFCONVERT_FORMATS: &[&str] = &["aac", "m4a", "wav", "aiff", "aif", "caf"];

// textutil has no PDF output.
const TEXTUTIL_FORMATS: &[&str] = &[
    "txt", "html", "rtf", "rtfd", "doc", "docx", "wordml", "odt", "webarchive",
];

const PANDOC_FORMATS: &[&str] = &[
    "html", "pdf", "docx", "md", "rst", "tex", "epub", "txt", "rtf",
];

const FFMPEG_FORMATS: &[&str] = &[
    "mp3", "wav", "aac", "m4a", "flac", "ogg", "mp4", "avi", "mkv", "mov", "webm", "gif",
];

const MAGICK_FORMATS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tiff", "ico", "svg", "pdf",
];

/// Whether `tool` can produce `target`. Total: case of the target does not
/// matter, and the in-process data tool always claims support — its own
/// conversion routine is the real gate and fails closed on pairs it cannot
/// handle.
pub fn supports(tool: ToolId, target: &str) -> bool {
    let target = target.to_lowercase();
    let target = target.as_str();
    match tool {
        ToolId::Data => true,
        ToolId::Sips => SIPS_FORMATS.contains(&target),
        ToolId::Afconvert => AFCONVERT_FORMATS.contains(&target),
        ToolId::Textutil => TEXTUTIL_FORMATS.contains(&target),
        ToolId::Pandoc => PANDOC_FORMATS.contains(&target),
        ToolId::Ffmpeg => FFMPEG_FORMATS.contains(&target),
        ToolId::Magick => MAGICK_FORMATS.contains(&target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_supports_everything_it_is_asked() {
        assert!(supports(ToolId::Data, "csv"));
        assert!(supports(ToolId::Data, "json"));
    }

    #[test]
    fn test_sips_formats() {
        for fmt in ["jpeg", "png", "tiff", "gif", "heic"] {
            assert!(supports(ToolId::Sips, fmt), "sips should support {}", fmt);
        }
        assert!(!supports(ToolId::Sips, "webp"));
        assert!(!supports(ToolId::Sips, "mp4"));
    }

    #[test]
    fn test_afconvert_formats() {
        for fmt in ["aac", "m4a", "wav", "aiff"] {
            assert!(supports(ToolId::Afconvert, fmt));
        }
        assert!(!supports(ToolId::Afconvert, "mp3"));
        assert!(!supports(ToolId::Afconvert, "flac"));
    }

    #[test]
    fn test_textutil_formats() {
        for fmt in ["txt", "html", "rtf", "docx"] {
            assert!(supports(ToolId::Textutil, fmt));
        }
    }

    #[test]
    fn test_textutil_cannot_output_pdf() {
        assert!(!supports(ToolId::Textutil, "pdf"));
    }

    #[test]
    fn test_pandoc_formats() {
        for fmt in ["html", "pdf", "docx", "md", "epub"] {
            assert!(supports(ToolId::Pandoc, fmt));
        }
    }

    #[test]
    fn test_ffmpeg_formats() {
        for fmt in ["mp3", "mp4", "wav", "avi", "gif"] {
            assert!(supports(ToolId::Ffmpeg, fmt));
        }
    }

    #[test]
    fn test_magick_formats() {
        for fmt in ["jpg", "png", "webp", "gif", "ico"] {
            assert!(supports(ToolId::Magick, fmt));
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert!(supports(ToolId::Sips, "PNG"));
        assert!(supports(ToolId::Sips, "JPEG"));
        assert!(supports(ToolId::Ffmpeg, "Mp3"));
    }

    #[test]
    fn test_outside_declared_sets_is_false() {
        assert!(!supports(ToolId::Pandoc, "mp3"));
        assert!(!supports(ToolId::Ffmpeg, "docx"));
        assert!(!supports(ToolId::Magick, "wav"));
    }
}
