//! Canonical file category tables.
//!
//! Categories group file extensions for the organize command and for the
//! conversion engine's fallback heuristic. Extensions are stored lowercase
//! with a leading dot; an extension belongs to at most one category.

use serde::{Deserialize, Serialize};

/// The closed set of file categories otto knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileCategory {
    Images,
    Documents,
    Spreadsheets,
    Audio,
    Video,
    Archives,
    Code,
    Data,
    Presentations,
    Design,
}

impl FileCategory {
    /// All categories, in display order.
    pub const ALL: [FileCategory; 10] = [
        FileCategory::Images,
        FileCategory::Documents,
        FileCategory::Spreadsheets,
        FileCategory::Audio,
        FileCategory::Video,
        FileCategory::Archives,
        FileCategory::Code,
        FileCategory::Data,
        FileCategory::Presentations,
        FileCategory::Design,
    ];

    /// Extensions belonging to this category (lowercase, dotted).
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileCategory::Images => &[
                ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".tiff", ".webp", ".svg", ".ico",
                ".heic", ".heif",
            ],
            FileCategory::Documents => &[
                ".pdf", ".doc", ".docx", ".txt", ".rtf", ".odt", ".pages", ".tex", ".md",
                ".rst", ".epub",
            ],
            FileCategory::Spreadsheets => &[".csv", ".xlsx", ".xls", ".tsv", ".ods", ".numbers"],
            FileCategory::Audio => &[
                ".mp3", ".wav", ".flac", ".ogg", ".aac", ".m4a", ".wma", ".opus",
            ],
            FileCategory::Video => &[
                ".mp4", ".avi", ".mkv", ".mov", ".webm", ".flv", ".wmv", ".m4v",
            ],
            FileCategory::Archives => &[
                ".zip", ".tar", ".gz", ".bz2", ".rar", ".7z", ".xz", ".dmg", ".iso",
            ],
            FileCategory::Code => &[
                ".py", ".js", ".ts", ".html", ".css", ".java", ".c", ".cpp", ".h", ".swift",
                ".go", ".rs", ".rb", ".sh",
            ],
            FileCategory::Data => &[
                ".json", ".xml", ".yaml", ".yml", ".toml", ".sql", ".db", ".sqlite",
            ],
            FileCategory::Presentations => &[".ppt", ".pptx", ".key", ".odp"],
            FileCategory::Design => &[".psd", ".ai", ".sketch", ".fig", ".xd"],
        }
    }

    /// Folder name used when organizing files by category.
    pub fn folder_name(&self) -> &'static str {
        match self {
            FileCategory::Images => "Images",
            FileCategory::Documents => "Documents",
            FileCategory::Spreadsheets => "Spreadsheets",
            FileCategory::Audio => "Audio",
            FileCategory::Video => "Video",
            FileCategory::Archives => "Archives",
            FileCategory::Code => "Code",
            FileCategory::Data => "Data",
            FileCategory::Presentations => "Presentations",
            FileCategory::Design => "Design",
        }
    }

    /// Look up the category of a dotted, case-insensitive extension.
    pub fn of_extension(ext: &str) -> Option<FileCategory> {
        let ext = ext.to_lowercase();
        FileCategory::ALL
            .into_iter()
            .find(|c| c.extensions().contains(&ext.as_str()))
    }
}

/// Categorize a file by its name. Files with no or unknown extension fall
/// into the "Other" bucket.
pub fn categorize_filename(name: &str) -> &'static str {
    extension_of(name)
        .and_then(|ext| FileCategory::of_extension(&ext))
        .map(|c| c.folder_name())
        .unwrap_or("Other")
}

/// Dotted lowercase extension of a path or filename, if any.
pub fn extension_of(name: &str) -> Option<String> {
    std::path::Path::new(name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
}

/// True for extensions the LLM can receive as inline vision input.
pub fn is_vision_image(ext: &str) -> bool {
    matches!(
        ext.to_lowercase().as_str(),
        ".jpg" | ".jpeg" | ".png" | ".gif" | ".webp" | ".bmp"
    )
}
