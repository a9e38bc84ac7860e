use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::{info, warn};
use crate::constants::*;
use crate::slide_loader::load_announcements;

#[derive(Parser, Debug)]
#[command(version, about = "Announcement bar that slides between messages")]
pub struct Args {
    /// Autoplay interval in whole seconds; absent or non-numeric disables autoplay
    #[arg(long)]
    pub autoplay: Option<String>,

    /// TOML file with `autoplay` and `slides`
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Plain text file, one announcement per line
    #[arg(long)]
    pub slides: Option<PathBuf>,

    #[arg(long, default_value_t = BAR_WIDTH)]
    pub width: i32,

    #[arg(long, default_value_t = BAR_HEIGHT)]
    pub height: i32,

    /// Announcements given directly on the command line
    pub announcements: Vec<String>,
}

// `autoplay = 5` and `autoplay = "5"` both read like the markup attribute
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum AttributeValue {
    Integer(i64),
    Text(String),
}

impl AttributeValue {
    pub fn into_attribute(self) -> String {
        match self {
            AttributeValue::Integer(value) => value.to_string(),
            AttributeValue::Text(text) => text,
        }
    }
}

#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub autoplay: Option<AttributeValue>,
    pub slides: Vec<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[derive(Debug)]
pub struct BarConfig {
    pub autoplay: Option<Duration>,
    pub slides: Vec<String>,
    pub width: i32,
    pub height: i32,
}

impl BarConfig {
    /// Command-line values win over the config file.
    pub fn resolve(args: Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let attribute = args
            .autoplay
            .or_else(|| file.autoplay.map(AttributeValue::into_attribute));

        let mut slides = if !args.announcements.is_empty() {
            args.announcements
        } else if let Some(path) = &args.slides {
            load_announcements(path)?
        } else {
            file.slides
        };
        if slides.is_empty() {
            info!("No announcements configured, showing the default one");
            slides.push(DEFAULT_ANNOUNCEMENT.to_string());
        }

        Ok(Self {
            autoplay: parse_autoplay(attribute.as_deref()),
            slides,
            width: args.width,
            height: args.height,
        })
    }
}

/// Reads the autoplay attribute the way an integer-prefix parser would:
/// leading whitespace and a sign are allowed, parsing stops at the first
/// non-digit. Anything that does not yield a positive number of seconds
/// disables autoplay.
pub fn parse_autoplay(attribute: Option<&str>) -> Option<Duration> {
    let attribute = attribute?;
    let trimmed = attribute.trim_start();

    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        warn!(attribute, "autoplay attribute is not a number, autoplay disabled");
        return None;
    }

    let seconds: u64 = match rest[..digits].parse() {
        Ok(seconds) => seconds,
        Err(_) => {
            warn!(attribute, "autoplay attribute out of range, autoplay disabled");
            return None;
        }
    };

    if negative || seconds == 0 {
        return None;
    }
    Some(Duration::from_secs(seconds))
}
