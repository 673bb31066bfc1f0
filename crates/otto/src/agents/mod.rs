//! Agent dispatch layer: per-intent prompt templates and context building.
//!
//! An agent is a named prompt template plus the file/folder context that
//! turns a natural-language request into a structured plan (see
//! [`plan`]). Templates ship embedded in the binary; `OTTO_AGENTS_DIR`
//! points at a directory of `<agent>.md` files to override them.

pub mod plan;

use otto_common::categories::{extension_of, is_vision_image};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Most entries shown for a folder in the dispatch context.
const FOLDER_LISTING_CAP: usize = 50;

/// The closed set of agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Convert,
    Organize,
    Summarize,
    Rename,
    Command,
}

impl AgentKind {
    pub const ALL: [AgentKind; 5] = [
        AgentKind::Convert,
        AgentKind::Organize,
        AgentKind::Summarize,
        AgentKind::Rename,
        AgentKind::Command,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AgentKind::Convert => "convert",
            AgentKind::Organize => "organize",
            AgentKind::Summarize => "summarize",
            AgentKind::Rename => "rename",
            AgentKind::Command => "command",
        }
    }

    pub fn from_name(name: &str) -> Option<AgentKind> {
        AgentKind::ALL.into_iter().find(|a| a.name() == name)
    }

    fn builtin_template(&self) -> &'static str {
        match self {
            AgentKind::Convert => include_str!("../../agents/convert.md"),
            AgentKind::Organize => include_str!("../../agents/organize.md"),
            AgentKind::Summarize => include_str!("../../agents/summarize.md"),
            AgentKind::Rename => include_str!("../../agents/rename.md"),
            AgentKind::Command => include_str!("../../agents/command.md"),
        }
    }
}

/// Instruction template for an agent. `OTTO_AGENTS_DIR` overrides the
/// embedded default; an unreadable override falls back gracefully.
pub fn agent_prompt(agent: AgentKind) -> String {
    if let Ok(dir) = std::env::var("OTTO_AGENTS_DIR") {
        let path = Path::new(&dir).join(format!("{}.md", agent.name()));
        match std::fs::read_to_string(&path) {
            Ok(text) => return text,
            Err(_) => warn!(
                "OTTO_AGENTS_DIR set but {} is unreadable; using built-in template",
                path.display()
            ),
        }
    }
    agent.builtin_template().to_string()
}

/// Describe the request and its paths for the model: per-file name, size
/// and extension; per-folder a capped listing with hidden entries
/// excluded; missing paths are noted rather than dropped.
pub fn build_context(query: &str, paths: &[PathBuf]) -> String {
    let mut ctx = String::new();
    let _ = writeln!(ctx, "USER REQUEST: {}", query);

    for path in paths {
        if path.is_file() {
            let name = file_name(path);
            let size = path.metadata().map(|m| m.len()).unwrap_or(0);
            let ext = extension_of(&name).unwrap_or_else(|| "(no extension)".to_string());
            let _ = writeln!(
                ctx,
                "FILE: {} ({}, {})",
                name,
                crate::util::human_size(size),
                ext
            );
        } else if path.is_dir() {
            let _ = writeln!(ctx, "FOLDER: {}", path.display());
            match list_visible_files(path) {
                Ok(entries) => {
                    for entry in entries.iter().take(FOLDER_LISTING_CAP) {
                        let _ = writeln!(ctx, "  - {}", entry);
                    }
                    if entries.len() > FOLDER_LISTING_CAP {
                        let _ = writeln!(
                            ctx,
                            "  ... and {} more",
                            entries.len() - FOLDER_LISTING_CAP
                        );
                    }
                }
                Err(e) => {
                    let _ = writeln!(ctx, "  (unreadable: {})", e);
                }
            }
        } else {
            let _ = writeln!(ctx, "PATH: {} (not found)", path.display());
        }
    }

    ctx
}

/// Non-hidden entries of a directory, sorted by name.
pub fn list_visible_files(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| !n.starts_with('.'))
        .collect();
    names.sort();
    Ok(names)
}

/// Image files among the given paths, usable as vision input.
pub fn vision_images(paths: &[PathBuf], cap: usize) -> Vec<PathBuf> {
    paths
        .iter()
        .filter(|p| p.is_file())
        .filter(|p| {
            extension_of(&file_name(p))
                .map(|ext| is_vision_image(&ext))
                .unwrap_or(false)
        })
        .take(cap)
        .cloned()
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
