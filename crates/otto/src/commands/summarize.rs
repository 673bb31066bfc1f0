//! `otto summarize <paths...>`

use crate::agents::plan::SummaryStyle;
use anyhow::{bail, Result};
use otto_common::llm::is_llm_error;
use otto_common::{LlmClient, OttoConfig};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Bytes read from each file before truncating.
const PER_FILE_BYTE_CAP: usize = 4000;

pub async fn run(paths: &[PathBuf], config: &OttoConfig) -> Result<()> {
    let reply = summarize_files(paths, SummaryStyle::Brief, config).await?;
    println!("\n{}", reply);
    Ok(())
}

/// Read the given files (capped per file, unreadable ones skipped with a
/// warning) and ask for a style-specific summary. Errors only when nothing
/// at all was readable or the LLM call failed.
pub async fn summarize_files(
    paths: &[PathBuf],
    style: SummaryStyle,
    config: &OttoConfig,
) -> Result<String> {
    let mut contents = Vec::new();
    for path in paths {
        if !path.is_file() {
            warn!("Not a readable file, skipping: {}", path.display());
            continue;
        }
        match read_capped(path) {
            Ok(text) => contents.push(format!("FILE: {}\n{}", file_name(path), text)),
            Err(e) => warn!("Failed to read {}: {}", path.display(), e),
        }
    }
    if contents.is_empty() {
        bail!("No readable files.");
    }

    eprintln!(
        "{} {} file(s)...",
        "Summarizing".blue().bold(),
        contents.len()
    );

    let prompt = format!("{}\n\n{}", style.instruction(), contents.join("\n\n"));
    let client = LlmClient::new(config);
    let reply = client.complete(&prompt).await;
    if is_llm_error(&reply) {
        bail!("{}", reply);
    }
    Ok(reply)
}

fn read_capped(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    let slice = &bytes[..bytes.len().min(PER_FILE_BYTE_CAP)];
    Ok(String::from_utf8_lossy(slice).into_owned())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_capped_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("big.txt");
        std::fs::write(&p, "a".repeat(10_000)).unwrap();

        let text = read_capped(&p).unwrap();
        assert_eq!(text.len(), PER_FILE_BYTE_CAP);
    }

    #[test]
    fn test_read_capped_small_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("small.txt");
        std::fs::write(&p, "hello").unwrap();

        assert_eq!(read_capped(&p).unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_no_readable_files_is_an_error() {
        let err = summarize_files(
            &[PathBuf::from("/no/such/file.txt")],
            SummaryStyle::Brief,
            &OttoConfig::default(),
        )
        .await;
        assert!(err.is_err());
    }

    #[test]
    fn test_style_instructions_differ() {
        let styles = [
            SummaryStyle::Brief,
            SummaryStyle::Detailed,
            SummaryStyle::Comparison,
            SummaryStyle::Explain,
        ];
        for (i, a) in styles.iter().enumerate() {
            for b in &styles[i + 1..] {
                assert_ne!(a.instruction(), b.instruction());
            }
        }
    }
}
