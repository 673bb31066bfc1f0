//! The conversion engine.
//!
//! Given a source file and a target format token, picks the first candidate
//! tool that is both capable of producing the target and actually available
//! on the host, then invokes it through a per-tool adapter. Candidate lists
//! come from an exact conversion table, with a category heuristic as the
//! fallback; the exact table always wins.

pub mod adapters;
pub mod data;
pub mod registry;
pub mod resolve;
pub mod table;

use otto_common::OttoConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The closed set of converter tools. Identifiers are not file paths;
/// mapping one onto an executable or an in-process routine happens in the
/// resolver and the adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    /// In-process structured-data converter (JSON/CSV)
    Data,
    /// macOS image converter (OS-bundled)
    Sips,
    /// macOS audio converter (OS-bundled)
    Afconvert,
    /// macOS document converter (OS-bundled)
    Textutil,
    /// General-purpose media transcoder (external binary)
    Ffmpeg,
    /// ImageMagick (external binary, `magick` or legacy `convert`)
    Magick,
    /// Universal document converter (external binary)
    Pandoc,
}

impl ToolId {
    pub const ALL: [ToolId; 7] = [
        ToolId::Data,
        ToolId::Sips,
        ToolId::Afconvert,
        ToolId::Textutil,
        ToolId::Ffmpeg,
        ToolId::Magick,
        ToolId::Pandoc,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolId::Data => "data",
            ToolId::Sips => "sips",
            ToolId::Afconvert => "afconvert",
            ToolId::Textutil => "textutil",
            ToolId::Ffmpeg => "ffmpeg",
            ToolId::Magick => "magick",
            ToolId::Pandoc => "pandoc",
        }
    }

    pub fn from_name(name: &str) -> Option<ToolId> {
        ToolId::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Conversion-engine failures, ordered roughly by how early in the pipeline
/// they occur. `ToolUnavailable` carries an install hint so the caller can
/// offer the install flow.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Don't know how to convert {src} -> .{target}")]
    NoKnownConverter { src: String, target: String },

    #[error("No known tool can convert {src} -> .{target}")]
    NoCapableTool { src: String, target: String },

    #[error("No available tool for {src} -> .{target}")]
    ToolUnavailable {
        src: String,
        target: String,
        /// First capable candidate otto knows how to install, if any.
        install_hint: Option<ToolId>,
    },

    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    #[error("Command blocked by safety filter")]
    Blocked,

    #[error("Conversion timed out")]
    Timeout,
}

/// A resolved conversion: where to read, what to produce, which tool runs.
#[derive(Debug, Clone)]
pub struct ConversionPlan {
    pub source: PathBuf,
    /// Dotted lowercase source extension ("" when the file has none)
    pub source_ext: String,
    /// Normalized target format token, no dot
    pub target: String,
    pub output: PathBuf,
    pub tool: ToolId,
}

/// Normalize a target format token: accept free text like "convert to jpg",
/// "to jpg", ".jpg" or "JPG" and reduce it to a bare lowercase token.
/// Unrecognized wrapping is left alone and simply fails later lookups.
pub fn normalize_target(token: &str) -> String {
    let token = token.trim().to_lowercase();
    let stripped = ["convert to ", "into ", "as ", "to "]
        .iter()
        .find_map(|p| token.strip_prefix(p))
        .unwrap_or(&token);
    stripped.trim_start_matches('.').trim().to_string()
}

/// Dotted lowercase extension of a path ("" when absent).
pub fn source_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Resolve a conversion request into a plan: validate the source, normalize
/// the target token, look up candidates (exact table, then category
/// heuristic), filter by capability with the narrow PDF rescue, resolve
/// availability, and compute the output path.
pub fn plan_conversion(
    source: &Path,
    target_token: &str,
    config: &OttoConfig,
) -> Result<ConversionPlan, ConvertError> {
    plan_conversion_with(source, target_token, |cmd| resolve::is_available(cmd, config))
}

/// Same as [`plan_conversion`] with an injectable availability probe.
pub fn plan_conversion_with(
    source: &Path,
    target_token: &str,
    probe: impl Fn(&str) -> bool,
) -> Result<ConversionPlan, ConvertError> {
    if !source.exists() {
        return Err(ConvertError::FileNotFound(source.to_path_buf()));
    }

    let target = normalize_target(target_token);
    let source_ext = source_extension(source);
    let key = table::conversion_key(&source_ext, &target);

    let candidates = match table::exact_candidates(&key) {
        Some(list) => list,
        None => table::heuristic_candidates(&source_ext, &target).ok_or_else(|| {
            ConvertError::NoKnownConverter {
                src: source_ext.clone(),
                target: target.clone(),
            }
        })?,
    };

    let capable: Vec<ToolId> = candidates
        .iter()
        .copied()
        .filter(|t| registry::supports(*t, &target))
        .collect();

    let capable = if capable.is_empty() {
        // Narrow rescue: a Documents-category pdf target falls back to the
        // known PDF-capable list instead of failing outright.
        if target == "pdf" && table::is_document_target(&target) {
            vec![ToolId::Pandoc]
        } else {
            return Err(ConvertError::NoCapableTool {
                src: source_ext,
                target,
            });
        }
    } else {
        capable
    };

    let tool = resolve::resolve_with(&capable, &probe).ok_or_else(|| {
        let install_hint = capable
            .iter()
            .copied()
            .find(|t| crate::install::is_installable(*t));
        ConvertError::ToolUnavailable {
            src: source_ext.clone(),
            target: target.clone(),
            install_hint,
        }
    })?;

    let output = source.with_extension(&target);

    Ok(ConversionPlan {
        source: source.to_path_buf(),
        source_ext,
        target,
        output,
        tool,
    })
}
