//! `otto organize <dir> [--instructions TEXT] [--confirm]`
//!
//! Without instructions, files are grouped by their category tables; with
//! instructions, the LLM produces the plan (vision-assisted when the
//! folder contains images). Moves only happen under `--confirm`, and a
//! move whose destination already exists is skipped.

use crate::agents::plan::ParsedReply;
use crate::agents::{agent_prompt, build_context, vision_images, AgentKind};
use anyhow::{bail, Result};
use otto_common::categories::categorize_filename;
use otto_common::llm::is_llm_error;
use otto_common::{LlmClient, OttoConfig};
use owo_colors::OwoColorize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// Most images attached when asking the model for an organize plan.
const ORGANIZE_VISION_CAP: usize = 10;

/// Files shown per folder in the preview before eliding.
const PREVIEW_FILES_PER_FOLDER: usize = 5;

pub async fn run(path: &Path, instructions: &str, confirm: bool, config: &OttoConfig) -> Result<()> {
    if !path.is_dir() {
        bail!("Directory not found: {}", path.display());
    }

    let files: Vec<String> = crate::agents::list_visible_files(path)?
        .into_iter()
        .filter(|name| path.join(name).is_file())
        .collect();
    if files.is_empty() {
        println!("Folder is empty. Nothing to organize.");
        return Ok(());
    }

    let plan = if instructions.trim().is_empty() {
        category_plan(&files)
    } else {
        ai_plan(path, instructions, config).await?
    };
    if plan.is_empty() {
        println!("No files to move.");
        return Ok(());
    }

    let total: usize = plan.values().map(Vec::len).sum();
    println!(
        "\n{} Move {} file(s) into {} folder(s):\n",
        "Plan:".bold(),
        total,
        plan.len()
    );
    for (folder, names) in &plan {
        println!("  {}/", folder.blue());
        for name in names.iter().take(PREVIEW_FILES_PER_FOLDER) {
            println!("    {}", name);
        }
        if names.len() > PREVIEW_FILES_PER_FOLDER {
            println!("    ... and {} more", names.len() - PREVIEW_FILES_PER_FOLDER);
        }
    }

    if !confirm {
        println!(
            "\n{}",
            "This is a preview. Re-run with --confirm to execute.".yellow()
        );
        return Ok(());
    }

    let moved = apply_plan(path, &plan)?;
    println!("{} Moved {} file(s).", "Done.".green().bold(), moved);
    Ok(())
}

/// Deterministic grouping by category tables.
fn category_plan(files: &[String]) -> BTreeMap<String, Vec<String>> {
    let mut plan: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for name in files {
        plan.entry(categorize_filename(name).to_string())
            .or_default()
            .push(name.clone());
    }
    plan
}

/// Ask the model for a plan. Unparseable replies degrade to an empty plan
/// rather than failing the command.
async fn ai_plan(
    path: &Path,
    instructions: &str,
    config: &OttoConfig,
) -> Result<BTreeMap<String, Vec<String>>> {
    let query = format!("Organize this folder. USER INSTRUCTIONS: {}", instructions);
    let context = build_context(&query, &[path.to_path_buf()]);
    let prompt = format!("{}\n\n{}", agent_prompt(AgentKind::Organize), context);

    let image_names = crate::agents::list_visible_files(path)?;
    let image_paths: Vec<_> = image_names.iter().map(|n| path.join(n)).collect();
    let images = vision_images(&image_paths, ORGANIZE_VISION_CAP);

    let client = LlmClient::new(config);
    let reply = client.complete_with_images(&prompt, &images).await;
    if is_llm_error(&reply) {
        bail!("{}", reply);
    }

    Ok(plan_from_reply(&reply))
}

/// Accept either the full organize plan object or a bare folder->files map.
pub fn plan_from_reply(reply: &str) -> BTreeMap<String, Vec<String>> {
    let value = match ParsedReply::from_reply(reply) {
        ParsedReply::Plan(v) => v.get("plan").cloned().unwrap_or(Value::Null),
        ParsedReply::Fallback(text) => {
            serde_json::from_str::<Value>(&otto_common::llm::strip_json_fences(&text))
                .unwrap_or(Value::Null)
        }
    };
    match serde_json::from_value(value) {
        Ok(map) => map,
        Err(e) => {
            warn!("Failed to parse organize plan: {}", e);
            BTreeMap::new()
        }
    }
}

/// Move files per plan. Creates destination folders, skips sources that
/// vanished and destinations that already exist, returns the move count.
pub fn apply_plan(root: &Path, plan: &BTreeMap<String, Vec<String>>) -> Result<usize> {
    let mut moved = 0;
    for (folder, names) in plan {
        let dest_dir = root.join(folder);
        std::fs::create_dir_all(&dest_dir)?;
        for name in names {
            let src = root.join(name);
            let dst = dest_dir.join(name);
            if src.exists() && !dst.exists() {
                match std::fs::rename(&src, &dst) {
                    Ok(()) => moved += 1,
                    Err(e) => warn!("Failed to move {}: {}", src.display(), e),
                }
            }
        }
    }
    Ok(moved)
}
