//! Conversion candidate tables.
//!
//! The exact map pairs a `.src->.dst` key with an ordered candidate list;
//! order encodes priority. When no exact key exists, a category heuristic
//! guesses a default list from the broad category of either side. The exact
//! map always takes priority over the heuristic, even if the heuristic
//! would suggest a tool that resolves better — predictability over
//! opportunism.

use super::ToolId;
use once_cell::sync::Lazy;
use otto_common::FileCategory;
use std::collections::HashMap;

static CONVERSION_MAP: Lazy<HashMap<&'static str, &'static [ToolId]>> = Lazy::new(|| {
    use ToolId::*;

    const SIPS_MAGICK: &[ToolId] = &[Sips, Magick];
    const MAGICK_ONLY: &[ToolId] = &[Magick];
    const MAGICK_SIPS: &[ToolId] = &[Magick, Sips];
    const DATA_ONLY: &[ToolId] = &[Data];
    const AF_FFMPEG: &[ToolId] = &[Afconvert, Ffmpeg];
    const FFMPEG_AF: &[ToolId] = &[Ffmpeg, Afconvert];
    const FFMPEG_ONLY: &[ToolId] = &[Ffmpeg];
    const TEXTUTIL_PANDOC: &[ToolId] = &[Textutil, Pandoc];
    const PANDOC_ONLY: &[ToolId] = &[Pandoc];

    let mut map: HashMap<&'static str, &'static [ToolId]> = HashMap::new();

    // Data
    map.insert(".json->.csv", DATA_ONLY);
    map.insert(".csv->.json", DATA_ONLY);

    // Images
    map.insert(".png->.jpg", SIPS_MAGICK);
    map.insert(".jpg->.png", SIPS_MAGICK);
    map.insert(".png->.webp", MAGICK_ONLY);
    map.insert(".webp->.png", MAGICK_SIPS);

    // Audio
    map.insert(".wav->.aac", AF_FFMPEG);
    map.insert(".wav->.m4a", AF_FFMPEG);
    map.insert(".mp3->.wav", FFMPEG_AF);
    map.insert(".wav->.mp3", FFMPEG_ONLY);

    // Video
    map.insert(".mp4->.mp3", FFMPEG_ONLY);
    map.insert(".mp4->.wav", FFMPEG_ONLY);

    // Documents
    map.insert(".txt->.html", TEXTUTIL_PANDOC);
    map.insert(".docx->.pdf", PANDOC_ONLY);
    map.insert(".md->.html", PANDOC_ONLY);
    map.insert(".md->.pdf", PANDOC_ONLY);

    map
});

/// Exact-map key for a dotted source extension and bare target token.
pub fn conversion_key(source_ext: &str, target: &str) -> String {
    format!("{}->.{}", source_ext, target)
}

pub fn exact_candidates(key: &str) -> Option<&'static [ToolId]> {
    CONVERSION_MAP.get(key).copied()
}

/// All exact-map keys, for completeness checks.
pub fn exact_keys() -> Vec<&'static str> {
    CONVERSION_MAP.keys().copied().collect()
}

/// Category fallback when no exact key matches. Media (audio or video on
/// either side) goes to the transcoder list — video always needs the
/// heavyweight transcoder, and the lighter in-process audio path only
/// exists through exact keys. Images and documents get their platform
/// defaults.
pub fn heuristic_candidates(source_ext: &str, target: &str) -> Option<&'static [ToolId]> {
    let target_ext = format!(".{}", target);
    let src = FileCategory::of_extension(source_ext);
    let dst = FileCategory::of_extension(&target_ext);

    let either = |cat: FileCategory| src == Some(cat) || dst == Some(cat);

    if either(FileCategory::Audio) || either(FileCategory::Video) {
        Some(&[ToolId::Ffmpeg, ToolId::Afconvert])
    } else if either(FileCategory::Images) {
        Some(&[ToolId::Sips, ToolId::Magick])
    } else if either(FileCategory::Documents) {
        Some(&[ToolId::Textutil, ToolId::Pandoc])
    } else {
        None
    }
}

/// Whether a bare target token is a Documents-category format.
pub fn is_document_target(target: &str) -> bool {
    FileCategory::of_extension(&format!(".{}", target)) == Some(FileCategory::Documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_image_pairs_present() {
        for key in [".png->.jpg", ".jpg->.png", ".png->.webp", ".webp->.png"] {
            assert!(exact_candidates(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_audio_pairs_present() {
        for key in [".wav->.aac", ".wav->.m4a", ".mp3->.wav", ".wav->.mp3"] {
            assert!(exact_candidates(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_video_pairs_present() {
        for key in [".mp4->.mp3", ".mp4->.wav"] {
            assert!(exact_candidates(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_document_pairs_present() {
        for key in [".txt->.html", ".docx->.pdf", ".md->.html", ".md->.pdf"] {
            assert!(exact_candidates(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_data_pairs_present() {
        assert_eq!(exact_candidates(".json->.csv"), Some(&[ToolId::Data][..]));
        assert_eq!(exact_candidates(".csv->.json"), Some(&[ToolId::Data][..]));
    }

    #[test]
    fn test_no_empty_candidate_lists() {
        for key in exact_keys() {
            let list = exact_candidates(key).unwrap();
            assert!(!list.is_empty(), "{} has an empty candidate list", key);
        }
    }

    #[test]
    fn test_key_format() {
        assert_eq!(conversion_key(".png", "jpg"), ".png->.jpg");
        assert_eq!(conversion_key("", "jpg"), "->.jpg");
    }

    #[test]
    fn test_heuristic_media() {
        assert_eq!(
            heuristic_candidates(".flac", "ogg"),
            Some(&[ToolId::Ffmpeg, ToolId::Afconvert][..])
        );
        assert_eq!(
            heuristic_candidates(".mkv", "mp4"),
            Some(&[ToolId::Ffmpeg, ToolId::Afconvert][..])
        );
    }

    #[test]
    fn test_heuristic_images() {
        assert_eq!(
            heuristic_candidates(".heic", "jpg"),
            Some(&[ToolId::Sips, ToolId::Magick][..])
        );
    }

    #[test]
    fn test_heuristic_documents() {
        assert_eq!(
            heuristic_candidates(".rst", "html"),
            Some(&[ToolId::Textutil, ToolId::Pandoc][..])
        );
    }

    #[test]
    fn test_heuristic_unknown_is_none() {
        assert_eq!(heuristic_candidates(".xyz", "unknown"), None);
    }

    #[test]
    fn test_media_beats_image_when_both_sides_match() {
        // a video-to-gif request is media first even though gif is an image
        assert_eq!(
            heuristic_candidates(".mov", "gif"),
            Some(&[ToolId::Ffmpeg, ToolId::Afconvert][..])
        );
    }
}
