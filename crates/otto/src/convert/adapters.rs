//! Per-tool conversion adapters.
//!
//! Each adapter turns a resolved plan into either an external command line
//! (run through the safety-gated executor) or a call into the in-process
//! data converter. Tool-specific quirks live here, before invocation: sips
//! and afconvert want their own format names, afconvert's aac/m4a output
//! needs the m4af container, icon output needs an explicit 256x256 resize.

use super::data;
use super::resolve::is_available;
use super::{ConversionPlan, ConvertError, ToolId};
use otto_common::exec::{run_shell, ExecStatus};
use otto_common::OttoConfig;
use tracing::warn;

/// sips spells some formats differently than the extension.
fn sips_format(target: &str) -> Option<&'static str> {
    match target {
        "jpg" | "jpeg" => Some("jpeg"),
        "png" => Some("png"),
        "tiff" => Some("tiff"),
        _ => None,
    }
}

/// afconvert file-type identifiers.
fn afconvert_format(target: &str) -> Option<&'static str> {
    match target {
        "aac" => Some("aac "),
        "m4a" => Some("m4af"),
        "wav" => Some("WAVE"),
        "aiff" => Some("AIFF"),
        _ => None,
    }
}

/// Execute a resolved conversion plan. On success the output file is
/// verified to exist; a zero-length output is reported as a warning by the
/// caller, not a failure here.
pub async fn run_conversion(plan: &ConversionPlan, config: &OttoConfig) -> Result<(), ConvertError> {
    let input = plan.source.display();
    let output = plan.output.display();

    let command = match plan.tool {
        ToolId::Data => {
            return data::convert_data(&plan.source, &plan.source_ext, &plan.target, &plan.output)
                .map_err(|e| ConvertError::ConversionFailed(e.to_string()));
        }
        ToolId::Sips => {
            let fmt = sips_format(&plan.target).ok_or_else(|| {
                ConvertError::ConversionFailed(format!(
                    "sips output .{} not supported",
                    plan.target
                ))
            })?;
            format!("sips -s format {} \"{}\" --out \"{}\"", fmt, input, output)
        }
        ToolId::Afconvert => {
            let fmt = afconvert_format(&plan.target).ok_or_else(|| {
                ConvertError::ConversionFailed(format!(
                    "afconvert output .{} not supported",
                    plan.target
                ))
            })?;
            if matches!(plan.target.as_str(), "aac" | "m4a") {
                // aac payloads need the m4af container or afconvert refuses.
                format!("afconvert -f m4af -d aac \"{}\" \"{}\"", input, output)
            } else {
                format!(
                    "afconvert -f {} -d {} \"{}\" \"{}\"",
                    fmt,
                    fmt.trim(),
                    input,
                    output
                )
            }
        }
        ToolId::Textutil => format!(
            "textutil -convert {} -output \"{}\" \"{}\"",
            plan.target, output, input
        ),
        ToolId::Ffmpeg => format!("ffmpeg -y -i \"{}\" \"{}\"", input, output),
        ToolId::Pandoc => format!("pandoc \"{}\" -o \"{}\"", input, output),
        ToolId::Magick => {
            let binary = if is_available("magick", config) {
                "magick"
            } else {
                "convert"
            };
            if plan.target == "ico" {
                // Icon files cap out at 256x256; without the resize the
                // write fails or silently truncates.
                format!("{} \"{}\" -resize 256x256 \"{}\"", binary, input, output)
            } else {
                format!("{} \"{}\" \"{}\"", binary, input, output)
            }
        }
    };

    let result = run_shell(&command, config).await;
    match result.status {
        ExecStatus::Succeeded => Ok(()),
        ExecStatus::Blocked => Err(ConvertError::Blocked),
        ExecStatus::TimedOut => Err(ConvertError::Timeout),
        ExecStatus::Failed => Err(ConvertError::ConversionFailed(
            result.stderr.trim().to_string(),
        )),
    }
}

/// Post-conversion check: the output must exist; empty output is suspicious
/// but not fatal. Returns whether the output is non-empty.
pub fn verify_output(plan: &ConversionPlan) -> Result<bool, ConvertError> {
    let meta = plan
        .output
        .metadata()
        .map_err(|_| ConvertError::ConversionFailed("No output file was produced".to_string()))?;
    if meta.len() == 0 {
        warn!("Output file is empty: {}", plan.output.display());
        return Ok(false);
    }
    Ok(true)
}
