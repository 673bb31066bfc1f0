//! `otto execute <planJson>`
//!
//! Runs a structured plan, usually one produced by `otto dispatch`.
//! Validation errors (bad JSON, unknown action, missing fields) fail the
//! invocation; per-item problems inside a batch are logged, skipped, and
//! reported in the final count.

use crate::agents::plan::{parse_plan, Plan};
use crate::commands::{ask, organize, summarize};
use crate::convert::ToolId;
use anyhow::{bail, Result};
use otto_common::exec::{run_python_script, run_shell, ExecStatus};
use otto_common::OttoConfig;
use owo_colors::OwoColorize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

pub async fn run(plan_json: &str, config: &OttoConfig) -> Result<()> {
    let plan = parse_plan(plan_json)?;

    match plan {
        Plan::None { explanation } => {
            println!("{}", explanation);
            Ok(())
        }
        Plan::Convert {
            input_file,
            target_format,
            ..
        } => super::convert::run(Path::new(&input_file), &target_format, config).await,
        Plan::Resize {
            input_file,
            width,
            height,
            ..
        } => resize(Path::new(&input_file), width, height, config).await,
        Plan::Organize { folder, plan, .. } => {
            let root = PathBuf::from(&folder);
            if !root.is_dir() {
                bail!("Directory not found: {}", folder);
            }
            let moved = organize::apply_plan(&root, &plan)?;
            println!("{} Moved {} file(s).", "Done.".green().bold(), moved);
            Ok(())
        }
        Plan::Summarize { files, style, .. } => {
            if files.is_empty() {
                bail!("No files to summarize.");
            }
            let paths: Vec<PathBuf> = files.iter().map(PathBuf::from).collect();
            let reply = summarize::summarize_files(&paths, style, config).await?;
            println!("\n{}", reply);
            Ok(())
        }
        Plan::Rename { renames, .. } => {
            apply_renames(&renames);
            Ok(())
        }
        Plan::Run { language, code, .. } => {
            if code.trim().is_empty() {
                bail!("No code to run.");
            }
            match language.as_str() {
                "python" => ask::report(run_python_script(&code, config).await),
                "shell" | "bash" | "sh" => {
                    eprintln!("{} {}", "$".blue().bold(), code);
                    ask::report(run_shell(&code, config).await);
                }
                other => bail!("Unknown language: {}", other),
            }
            Ok(())
        }
    }
}

/// Per-file moves from an old path to a new name in the same directory.
/// Missing sources and occupied destinations are skipped and logged; the
/// batch always finishes with an explicit count.
fn apply_renames(renames: &BTreeMap<String, String>) {
    if renames.is_empty() {
        println!("No renames to apply.");
        return;
    }
    let mut count = 0;
    for (old, new_name) in renames {
        let old_path = Path::new(old);
        if !old_path.is_file() {
            println!("{} {}", "Skipped (missing):".yellow(), old);
            continue;
        }
        let dest = match old_path.parent() {
            Some(dir) => dir.join(new_name),
            None => PathBuf::from(new_name),
        };
        if dest.exists() {
            println!("{} {}", "Skipped (destination exists):".yellow(), new_name);
            continue;
        }
        match std::fs::rename(old_path, &dest) {
            Ok(()) => count += 1,
            Err(e) => warn!("Failed to rename {}: {}", old, e),
        }
    }
    println!("{} Renamed {} file(s).", "Done.".green().bold(), count);
}

/// Resample an image into a `_WxH`-suffixed sibling file using the
/// OS-bundled image tool.
async fn resize(input: &Path, width: u32, height: u32, config: &OttoConfig) -> Result<()> {
    if !input.exists() {
        bail!("File not found: {}", input.display());
    }
    let output = resize_output_path(input, width, height);
    let command = format!(
        "{} --resampleHeightWidth {} {} \"{}\" --out \"{}\"",
        ToolId::Sips,
        height,
        width,
        input.display(),
        output.display()
    );
    let result = run_shell(&command, config).await;
    match result.status {
        ExecStatus::Succeeded => {
            println!("{} {}", "Output:".green().bold(), output.display());
            Ok(())
        }
        ExecStatus::Blocked => bail!("Command blocked by safety filter"),
        ExecStatus::TimedOut => bail!("Resize timed out"),
        ExecStatus::Failed => bail!("Resize failed: {}", result.stderr.trim()),
    }
}

fn resize_output_path(input: &Path, width: u32, height: u32) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    input.with_file_name(format!("{}_{}x{}{}", stem, width, height, ext))
}
