//! Reading whole inputs from a file or standard input.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};

/// Path that selects standard input.
pub const STDIN: &str = "-";

pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == STDIN
}

/// Read the entire input named by `path`, or stdin for `-`.
///
/// # Errors
///
/// Returns an error if the file or stdin cannot be read as UTF-8.
pub fn read_input(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read standard input")?;
        Ok(text)
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}
