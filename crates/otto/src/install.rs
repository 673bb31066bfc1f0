//! Tool installation into the managed local bin directory.
//!
//! Downloads a known tool's archive, pulls the binary out of the zip, and
//! drops it into `local_bin_dir` with the execute bit set. Installed tools
//! are found ahead of system ones because the executor and the prober both
//! consult the managed directory first.

use crate::convert::ToolId;
use anyhow::{bail, Context, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use otto_common::OttoConfig;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Download sources for tools otto can install itself.
const TOOL_DOWNLOADS: [(ToolId, &str); 2] = [
    (ToolId::Ffmpeg, "https://evermeet.cx/ffmpeg/ffmpeg-7.1.zip"),
    (
        ToolId::Pandoc,
        "https://github.com/jgm/pandoc/releases/download/3.6.3/pandoc-3.6.3-x86_64-macOS.zip",
    ),
];

pub fn is_installable(tool: ToolId) -> bool {
    TOOL_DOWNLOADS.iter().any(|(t, _)| *t == tool)
}

pub fn download_url(tool: ToolId) -> Option<&'static str> {
    TOOL_DOWNLOADS
        .iter()
        .find(|(t, _)| *t == tool)
        .map(|(_, url)| *url)
}

pub fn installable_names() -> Vec<&'static str> {
    TOOL_DOWNLOADS.iter().map(|(t, _)| t.name()).collect()
}

/// Download and install a tool by name.
pub async fn install_tool(name: &str, config: &OttoConfig) -> Result<()> {
    let entry = ToolId::from_name(name)
        .and_then(|t| download_url(t).map(|url| (t, url)));
    let Some((tool, url)) = entry else {
        bail!(
            "Unknown tool '{}'. Available: {}",
            name,
            installable_names().join(", ")
        );
    };

    let zip_path = std::env::temp_dir().join(format!("{}.zip", tool.name()));
    download_archive(url, &zip_path, tool.name()).await?;

    let result = extract_tool_binary(&zip_path, tool.name(), &config.local_bin_dir());
    let _ = std::fs::remove_file(&zip_path);
    let installed = result?;

    info!("Installed {} to {}", tool.name(), installed.display());
    Ok(())
}

async fn download_archive(url: &str, dest: &Path, label: &str) -> Result<()> {
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to download {}", url))?
        .error_for_status()
        .context("Download request failed")?;

    let total = response.content_length().unwrap_or(0);
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner} Fetching {msg} [{bar:30}] {bytes}/{total_bytes} ({bytes_per_sec})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message(label.to_string());

    let mut file = File::create(dest)
        .with_context(|| format!("Failed to create {}", dest.display()))?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("Download stream interrupted")?;
        file.write_all(&chunk)?;
        bar.inc(chunk.len() as u64);
    }
    bar.finish_and_clear();
    Ok(())
}

/// Find the tool's binary inside the archive and write it into `dest_dir`.
/// Accepts an entry named exactly like the tool (possibly nested), falling
/// back to any `bin/<tool>` entry.
pub fn extract_tool_binary(zip_path: &Path, tool_name: &str, dest_dir: &Path) -> Result<PathBuf> {
    let file = File::open(zip_path)
        .with_context(|| format!("Failed to open archive {}", zip_path.display()))?;
    let mut archive = zip::ZipArchive::new(file).context("Not a valid zip archive")?;

    let names: Vec<String> = archive.file_names().map(String::from).collect();
    let nested = format!("/{}", tool_name);
    let bin_nested = format!("bin/{}", tool_name);
    let entry_name = names
        .iter()
        .find(|n| *n == tool_name || n.ends_with(&nested))
        .or_else(|| names.iter().find(|n| n.contains(&bin_nested)))
        .cloned();

    let Some(entry_name) = entry_name else {
        bail!("Could not find '{}' binary in the archive", tool_name);
    };

    std::fs::create_dir_all(dest_dir)?;
    let target = dest_dir.join(tool_name);
    let mut entry = archive.by_name(&entry_name)?;
    let mut out = File::create(&target)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    std::io::copy(&mut entry, &mut out)?;
    drop(out);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o755))?;
    }

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn make_zip(dir: &Path, entries: &[(&str, &[u8])]) -> PathBuf {
        let path = dir.join("archive.zip");
        let file = File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    #[test]
    fn test_installable_tools() {
        assert!(is_installable(ToolId::Ffmpeg));
        assert!(is_installable(ToolId::Pandoc));
        assert!(!is_installable(ToolId::Sips));
        assert!(!is_installable(ToolId::Data));
    }

    #[test]
    fn test_installable_names() {
        let names = installable_names();
        assert!(names.contains(&"ffmpeg"));
        assert!(names.contains(&"pandoc"));
    }

    #[test]
    fn test_extract_top_level_entry() {
        let dir = tempfile::tempdir().unwrap();
        let zip = make_zip(dir.path(), &[("ffmpeg", b"binary-bytes")]);
        let dest = dir.path().join("bin");

        let installed = extract_tool_binary(&zip, "ffmpeg", &dest).unwrap();
        assert_eq!(installed, dest.join("ffmpeg"));
        assert_eq!(std::fs::read(&installed).unwrap(), b"binary-bytes");
    }

    #[test]
    fn test_extract_nested_entry() {
        let dir = tempfile::tempdir().unwrap();
        let zip = make_zip(dir.path(), &[("release-1.0/ffmpeg", b"nested")]);
        let dest = dir.path().join("bin");

        let installed = extract_tool_binary(&zip, "ffmpeg", &dest).unwrap();
        assert_eq!(std::fs::read(&installed).unwrap(), b"nested");
    }

    #[test]
    fn test_extract_falls_back_to_bin_entry() {
        // No entry is named exactly "pandoc"; the bin/ fallback fires.
        let dir = tempfile::tempdir().unwrap();
        let zip = make_zip(dir.path(), &[("tools/bin/pandoc-3.6.3", b"from-bin")]);
        let dest = dir.path().join("bin");

        let installed = extract_tool_binary(&zip, "pandoc", &dest).unwrap();
        assert_eq!(std::fs::read(&installed).unwrap(), b"from-bin");
    }

    #[test]
    fn test_extract_missing_binary_fails() {
        let dir = tempfile::tempdir().unwrap();
        let zip = make_zip(dir.path(), &[("README.txt", b"docs only")]);
        let dest = dir.path().join("bin");

        assert!(extract_tool_binary(&zip, "ffmpeg", &dest).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_extracted_binary_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let zip = make_zip(dir.path(), &[("ffmpeg", b"bin")]);
        let dest = dir.path().join("bin");

        let installed = extract_tool_binary(&zip, "ffmpeg", &dest).unwrap();
        let mode = installed.metadata().unwrap().permissions().mode();
        assert_ne!(mode & 0o111, 0);
    }
}
