//! Saved defaults for the `graph` command.
//!
//! Defaults live in rc files holding CLI-style tokens (`--rankdir LR`,
//! `--format json5`, `--perf`). A global file is merged with a local
//! `.pipevizrc`, and flags given on the command line win over both.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::graph::RankDir;
use crate::pipeline::InputFormat;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub rankdir: Option<RankDir>,
    pub format: Option<InputFormat>,
    pub perf: bool,
}

impl ConfigFlags {
    /// Merge two flag sets, `other` taking precedence.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            rankdir: other.rankdir.or(self.rankdir),
            format: other.format.or(self.format),
            perf: self.perf || other.perf,
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("pipeviz").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("pipeviz")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("pipeviz").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("pipeviz").join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".pipevizrc")
}

/// Read flags from an rc file. A missing file yields no flags.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write `flags` to an rc file, creating its directory.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# pipeviz defaults (saved with --save)".to_string()];
    if let Some(rankdir) = flags.rankdir {
        lines.push(format!("--rankdir {rankdir}"));
    }
    if let Some(format) = flags.format {
        lines.push(format!("--format {}", format.as_str()));
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Delete an rc file if present.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the known flags out of a token list; anything else is skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        if token == "--perf" {
            flags.perf = true;
        } else if token == "--rankdir" || token == "-r" {
            if let Some(next) = tokens.get(i + 1) {
                flags.rankdir = RankDir::parse(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--rankdir=") {
            flags.rankdir = RankDir::parse(value);
        } else if token == "--format" {
            if let Some(next) = tokens.get(i + 1) {
                flags.format = parse_format(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--format=") {
            flags.format = parse_format(value);
        }
        i += 1;
    }
    flags
}

fn parse_format(s: &str) -> Option<InputFormat> {
    match s {
        "json" => Some(InputFormat::Json),
        "json5" => Some(InputFormat::Json5),
        _ => None,
    }
}
