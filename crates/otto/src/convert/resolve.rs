//! Tool availability probing and candidate resolution.
//!
//! Availability is re-checked on every call — an install can happen between
//! two conversions in the same session, so nothing is cached.

use super::ToolId;
use otto_common::OttoConfig;
use std::path::Path;

/// Whether a command is usable: an executable in the managed local tool
/// directory wins, otherwise the regular search path decides.
pub fn is_available(cmd: &str, config: &OttoConfig) -> bool {
    let local = config.local_bin_dir().join(cmd);
    if is_executable(&local) {
        return true;
    }
    which::which(cmd).is_ok()
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Pick the first usable candidate, preserving the caller's priority order.
/// The in-process data tool and the OS-bundled converters resolve
/// immediately; external binaries go through the availability probe.
/// `None` is not an error — just a signal that nothing resolved.
pub fn resolve(candidates: &[ToolId], config: &OttoConfig) -> Option<ToolId> {
    resolve_with(candidates, |cmd| is_available(cmd, config))
}

pub fn resolve_with(candidates: &[ToolId], probe: impl Fn(&str) -> bool) -> Option<ToolId> {
    for tool in candidates {
        match tool {
            ToolId::Data | ToolId::Sips | ToolId::Afconvert | ToolId::Textutil => {
                return Some(*tool);
            }
            ToolId::Ffmpeg if probe("ffmpeg") => return Some(*tool),
            ToolId::Magick if probe("magick") || probe("convert") => return Some(*tool),
            ToolId::Pandoc if probe("pandoc") => return Some(*tool),
            _ => continue,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_resolves_to_none() {
        assert_eq!(resolve_with(&[], |_| true), None);
    }

    #[test]
    fn test_data_always_resolves() {
        assert_eq!(resolve_with(&[ToolId::Data], |_| false), Some(ToolId::Data));
    }

    #[test]
    fn test_os_bundled_tools_resolve_without_probe() {
        assert_eq!(resolve_with(&[ToolId::Sips], |_| false), Some(ToolId::Sips));
        assert_eq!(
            resolve_with(&[ToolId::Afconvert], |_| false),
            Some(ToolId::Afconvert)
        );
        assert_eq!(
            resolve_with(&[ToolId::Textutil], |_| false),
            Some(ToolId::Textutil)
        );
    }

    #[test]
    fn test_external_tool_resolves_only_when_probed() {
        assert_eq!(
            resolve_with(&[ToolId::Ffmpeg], |_| true),
            Some(ToolId::Ffmpeg)
        );
        assert_eq!(resolve_with(&[ToolId::Ffmpeg], |_| false), None);
    }

    #[test]
    fn test_first_available_wins() {
        let probe = |cmd: &str| cmd == "sips" || cmd == "ffmpeg";
        assert_eq!(
            resolve_with(&[ToolId::Sips, ToolId::Ffmpeg], probe),
            Some(ToolId::Sips)
        );
    }

    #[test]
    fn test_falls_back_to_second_candidate() {
        // magick missing, sips resolves as an OS-bundled tool
        let probe = |cmd: &str| !matches!(cmd, "magick" | "convert");
        assert_eq!(
            resolve_with(&[ToolId::Magick, ToolId::Sips], probe),
            Some(ToolId::Sips)
        );
    }

    #[test]
    fn test_magick_accepts_legacy_convert_binary() {
        let probe = |cmd: &str| cmd == "convert";
        assert_eq!(
            resolve_with(&[ToolId::Magick], probe),
            Some(ToolId::Magick)
        );
    }

    #[test]
    fn test_all_unavailable_is_none() {
        assert_eq!(
            resolve_with(&[ToolId::Ffmpeg, ToolId::Pandoc, ToolId::Magick], |_| false),
            None
        );
    }

    #[test]
    fn test_resolve_against_real_config_for_builtins() {
        // Built-in tools never touch the filesystem probe, so this holds on
        // any host.
        let config = OttoConfig::default();
        assert_eq!(resolve(&[ToolId::Data], &config), Some(ToolId::Data));
        assert_eq!(resolve(&[], &config), None);
    }

    #[test]
    fn test_is_available_finds_local_bin_first() {
        let dir = tempfile::tempdir().unwrap();
        let config = OttoConfig {
            data_dir: dir.path().to_path_buf(),
            ..OttoConfig::default()
        };
        let bin = config.local_bin_dir();
        std::fs::create_dir_all(&bin).unwrap();

        let tool = bin.join("some-made-up-tool");
        std::fs::write(&tool, "#!/bin/sh\necho fake\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        assert!(is_available("some-made-up-tool", &config));
        assert!(!is_available("another-made-up-tool", &config));
    }

    #[cfg(unix)]
    #[test]
    fn test_local_bin_entry_without_exec_bit_does_not_count() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let config = OttoConfig {
            data_dir: dir.path().to_path_buf(),
            ..OttoConfig::default()
        };
        let bin = config.local_bin_dir();
        std::fs::create_dir_all(&bin).unwrap();

        let tool = bin.join("not-executable-tool");
        std::fs::write(&tool, "data").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o644)).unwrap();

        assert!(!is_available("not-executable-tool", &config));
    }
}
