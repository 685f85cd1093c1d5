//! Tag set definitions.
//!
//! A tag set is the ordered list of chips shown on a canvas. It is either the
//! built-in [`default_tag_specs`] or a JSON file holding an array of
//! [`TagSpec`] objects:
//!
//! ```json
//! [
//!   { "label": "Rust", "color": "#DEA584", "glyph": "🦀" },
//!   { "label": "Docs", "color": "#3B82F6", "image": "assets/docs.png" }
//! ]
//! ```

use std::path::{Path, PathBuf};

use raylib::prelude::Color;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::tag::{Tag, TagIcon};

#[derive(Debug, Error)]
pub enum TagSetError {
    #[error("failed to read tag file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tag file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid color {0:?} (expected #RRGGBB or #RRGGBBAA)")]
    InvalidColor(String),
    #[error("duplicate tag label {0:?}")]
    DuplicateLabel(String),
    #[error("tag labels must not be empty")]
    EmptyLabel,
}

/// One entry of a tag set as written in a tag file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSpec {
    pub label: String,
    /// `#RRGGBB` or `#RRGGBBAA`.
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyph: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
}

impl TagSpec {
    pub fn new(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
            glyph: None,
            image: None,
        }
    }

    pub fn with_glyph(mut self, glyph: impl Into<String>) -> Self {
        self.glyph = Some(glyph.into());
        self
    }

    pub fn with_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.image = Some(path.into());
        self
    }

    pub fn icon(&self) -> TagIcon {
        match (&self.image, &self.glyph) {
            (Some(path), fallback) => TagIcon::Image {
                path: path.clone(),
                fallback: fallback.clone(),
            },
            (None, Some(glyph)) => TagIcon::Glyph(glyph.clone()),
            (None, None) => TagIcon::None,
        }
    }

    /// Build the `index`-th [`Tag`] of a set.
    pub fn to_tag(&self, index: usize) -> Result<Tag, TagSetError> {
        let color = parse_hex_color(&self.color)?;
        Ok(Tag::new(index, self.label.clone(), color, self.icon()))
    }
}

/// Parse `#RRGGBB` / `#RRGGBBAA` (the leading `#` is optional).
pub fn parse_hex_color(input: &str) -> Result<Color, TagSetError> {
    let invalid = || TagSetError::InvalidColor(input.to_string());
    let hex = input.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    let alpha = if hex.len() == 8 { channel(6)? } else { 0xFF };
    Ok(Color::new(channel(0)?, channel(2)?, channel(4)?, alpha))
}

/// Labels must be non-empty and unique; colours must parse.
pub fn validate_tag_specs(specs: &[TagSpec]) -> Result<(), TagSetError> {
    let mut seen = FxHashSet::default();
    for spec in specs {
        if spec.label.trim().is_empty() {
            return Err(TagSetError::EmptyLabel);
        }
        if !seen.insert(spec.label.as_str()) {
            return Err(TagSetError::DuplicateLabel(spec.label.clone()));
        }
        parse_hex_color(&spec.color)?;
    }
    Ok(())
}

pub fn parse_tag_specs(json: &str) -> Result<Vec<TagSpec>, TagSetError> {
    let specs: Vec<TagSpec> = serde_json::from_str(json)?;
    validate_tag_specs(&specs)?;
    Ok(specs)
}

/// Read and validate a JSON tag file. Relative image paths are resolved
/// against the file's directory.
pub fn load_tag_specs(path: &Path) -> Result<Vec<TagSpec>, TagSetError> {
    let json = std::fs::read_to_string(path).map_err(|source| TagSetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut specs = parse_tag_specs(&json)?;
    if let Some(dir) = path.parent() {
        for spec in specs.iter_mut() {
            if let Some(image) = spec.image.as_mut().filter(|p| p.is_relative()) {
                *image = dir.join(&*image);
            }
        }
    }
    Ok(specs)
}

/// The portfolio's ten skill chips.
pub fn default_tag_specs() -> Vec<TagSpec> {
    [
        ("SaaS Webs", "#F59E0B", "🌐"),
        ("Web Design", "#C084FC", "🎨"),
        ("Angular", "#DD0031", "🅰️"),
        ("Tailwind", "#06B6D4", "🌊"),
        ("Database", "#22C55E", "🗄️"),
        ("Github", "#171515", "🐙"),
        ("TypeScript", "#3178C6", "📘"),
        ("JavaScript", "#F7DF1E", "📜"),
        ("UI/UX", "#3B82F6", "✨"),
        ("E-commerce", "#10B981", "🛒"),
    ]
    .into_iter()
    .map(|(label, color, glyph)| TagSpec::new(label, color).with_glyph(glyph))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#DD0031").unwrap(),
            Color::new(0xDD, 0x00, 0x31, 0xFF)
        );
        assert_eq!(
            parse_hex_color("10B98180").unwrap(),
            Color::new(0x10, 0xB9, 0x81, 0x80)
        );
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#GG0000").is_err());
        assert!(parse_hex_color("#ééé").is_err());
        assert!(parse_hex_color("#+1+2+3").is_err());
        assert!(parse_hex_color("+1+2+3+4").is_err());
    }

    #[test]
    fn test_default_tags_are_valid() {
        let specs = default_tag_specs();
        assert_eq!(specs.len(), 10);
        validate_tag_specs(&specs).unwrap();
        assert!(specs.iter().all(|s| s.glyph.is_some() && s.image.is_none()));
        assert_eq!(specs[0].glyph.as_deref(), Some("\u{1F310}"));
    }

    #[test]
    fn test_parse_rejects_duplicate_labels() {
        let json = r##"[{"label":"Rust","color":"#000000"},{"label":"Rust","color":"#FFFFFF"}]"##;
        assert!(matches!(
            parse_tag_specs(json),
            Err(TagSetError::DuplicateLabel(label)) if label == "Rust"
        ));
    }

    #[test]
    fn test_parse_rejects_empty_label_and_bad_color() {
        assert!(matches!(
            parse_tag_specs(r##"[{"label":" ","color":"#000000"}]"##),
            Err(TagSetError::EmptyLabel)
        ));
        assert!(matches!(
            parse_tag_specs(r#"[{"label":"Rust","color":"red"}]"#),
            Err(TagSetError::InvalidColor(_))
        ));
        assert!(matches!(parse_tag_specs("{"), Err(TagSetError::Parse(_))));
    }

    #[test]
    fn test_icon_selection() {
        assert_eq!(TagSpec::new("a", "#000000").icon(), TagIcon::None);
        assert_eq!(
            TagSpec::new("a", "#000000").with_glyph("x").icon(),
            TagIcon::Glyph("x".into())
        );
        let both = TagSpec::new("a", "#000000")
            .with_glyph("x")
            .with_image("a.png")
            .icon();
        assert_eq!(both.glyph(), Some("x"));
        assert_eq!(both.image_path(), Some(&PathBuf::from("a.png")));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_tag_specs(Path::new("/nonexistent/tags.json")),
            Err(TagSetError::Io { .. })
        ));
    }
}
