//! `otto convert <file> <format>`

use crate::convert::{adapters, plan_conversion, ConvertError};
use crate::util::human_size;
use anyhow::Result;
use otto_common::OttoConfig;
use owo_colors::OwoColorize;
use std::path::Path;

pub async fn run(input_file: &Path, target_format: &str, config: &OttoConfig) -> Result<()> {
    let plan = match plan_conversion(input_file, target_format, config) {
        Ok(plan) => plan,
        Err(ConvertError::ToolUnavailable {
            install_hint: Some(hint),
            src,
            target,
        }) => {
            // Machine-readable marker first so a wrapping UI can offer the
            // install flow; the human-readable hint goes to stderr.
            println!("[NEED_INSTALL] {}", hint);
            eprintln!(
                "{} Missing tool: {}. Install it with `otto install {}`.",
                "Note:".yellow().bold(),
                hint,
                hint
            );
            anyhow::bail!("No available tool for {} -> .{}", src, target);
        }
        Err(e) => return Err(e.into()),
    };

    let name = plan
        .source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| plan.source.display().to_string());
    eprintln!(
        "{} {} -> .{} (using {})",
        "Converting:".blue().bold(),
        name,
        plan.target,
        plan.tool
    );

    adapters::run_conversion(&plan, config).await?;

    if adapters::verify_output(&plan)? {
        let size = plan.output.metadata().map(|m| m.len()).unwrap_or(0);
        println!(
            "{} {} ({})",
            "Output:".green().bold(),
            plan.output.display(),
            human_size(size)
        );
    } else {
        println!("{} Output file is empty.", "Warning:".yellow().bold());
    }
    Ok(())
}
