use std::fs;
use std::path::Path;
use anyhow::{Context, Result, bail};

// --- Helper: Load Announcements, One Per Line ---
pub fn load_announcements(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read slides file {}", path.display()))?;

    let announcements = parse_announcements(&text);
    if announcements.is_empty() {
        bail!("No announcements found in {}", path.display());
    }
    Ok(announcements)
}

// Blank lines and `#` comments are skipped
pub fn parse_announcements(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
