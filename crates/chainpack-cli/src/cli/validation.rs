use std::path::PathBuf;

/// Parse a `NAME=PATH` entry point.
///
/// # Errors
///
/// Returns an error message when the separator is missing or either side is
/// empty.
pub fn parse_entry(s: &str) -> Result<(String, PathBuf), String> {
    let (name, path) = s
        .split_once('=')
        .ok_or_else(|| format!("Entry must be NAME=PATH: '{}'", s))?;

    let name = name.trim();
    let path = path.trim();
    if name.is_empty() {
        return Err(format!("Entry name cannot be empty: '{}'", s));
    }
    if path.is_empty() {
        return Err(format!("Entry '{}' has no source path", name));
    }

    Ok((name.to_string(), PathBuf::from(path)))
}
