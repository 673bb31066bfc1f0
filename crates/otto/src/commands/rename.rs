//! `otto rename <paths...> [--confirm]`
//!
//! Asks the model for old-name -> new-name suggestions (vision-assisted
//! for images), previews them, and applies under `--confirm`, skipping
//! anything whose destination already exists.

use crate::agents::plan::ParsedReply;
use crate::agents::{agent_prompt, vision_images, AgentKind};
use anyhow::{bail, Result};
use otto_common::llm::{is_llm_error, strip_json_fences};
use otto_common::{LlmClient, OttoConfig};
use owo_colors::OwoColorize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::warn;

/// Most files sent to the model per request.
const RENAME_BATCH_CAP: usize = 30;

/// Most images attached as vision input.
const RENAME_VISION_CAP: usize = 5;

pub async fn run(paths: &[PathBuf], confirm: bool, config: &OttoConfig) -> Result<()> {
    let mut files: Vec<PathBuf> = paths.iter().filter(|p| p.is_file()).cloned().collect();
    if files.is_empty() {
        bail!("No valid files.");
    }
    files.truncate(RENAME_BATCH_CAP);

    let filenames: Vec<String> = files
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    let images = vision_images(&files, RENAME_VISION_CAP);

    if images.is_empty() {
        eprintln!("{} {} file(s)...", "Analyzing".blue().bold(), files.len());
    } else {
        eprintln!(
            "{} {} image(s) with vision...",
            "Analyzing".blue().bold(),
            images.len()
        );
    }

    let prompt = format!(
        "{}\n\nCurrent filenames: {:?}",
        agent_prompt(AgentKind::Rename),
        filenames
    );
    let client = LlmClient::new(config);
    let reply = client.complete_with_images(&prompt, &images).await;
    if is_llm_error(&reply) {
        bail!("{}", reply);
    }

    let renames = match renames_from_reply(&reply) {
        Some(map) => map,
        None => {
            println!("{} Could not plan renames from the reply.", "Error:".red().bold());
            return Ok(());
        }
    };

    let plan: Vec<(PathBuf, PathBuf, String, String)> = files
        .iter()
        .filter_map(|path| {
            let old = path.file_name()?.to_string_lossy().into_owned();
            let new = renames.get(&old)?.clone();
            if new == old {
                return None;
            }
            let dest = path.parent().map(|d| d.join(&new))?;
            Some((path.clone(), dest, old, new))
        })
        .collect();

    if plan.is_empty() {
        println!("{}", "No renames needed.".green());
        return Ok(());
    }

    println!("\n{}", "Plan:".bold());
    for (_, _, old, new) in &plan {
        println!("  {} -> {}", old, new.green());
    }

    if !confirm {
        println!("\n{}", "Preview only. Use --confirm to execute.".yellow());
        return Ok(());
    }

    let mut count = 0;
    for (old_path, new_path, _, _) in &plan {
        if new_path.exists() {
            warn!("Destination exists, skipping: {}", new_path.display());
            continue;
        }
        match std::fs::rename(old_path, new_path) {
            Ok(()) => count += 1,
            Err(e) => warn!("Failed to rename {}: {}", old_path.display(), e),
        }
    }
    println!("\n{} Renamed {} files.", "Done.".green().bold(), count);
    Ok(())
}

/// Accept either the full rename plan object or a bare old->new map.
pub fn renames_from_reply(reply: &str) -> Option<BTreeMap<String, String>> {
    let value = match ParsedReply::from_reply(reply) {
        ParsedReply::Plan(v) => v.get("renames").cloned()?,
        ParsedReply::Fallback(text) => {
            serde_json::from_str::<Value>(&strip_json_fences(&text)).ok()?
        }
    };
    serde_json::from_value(value).ok()
}
