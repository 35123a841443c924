// src/config.rs

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Which drawing of a part the pipeline extracts pins from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Breadboard,
    Schematic,
    Pcb,
}

impl View {
    /// Lowercase view name, as reported in `Extraction::view_type`.
    pub fn name(self) -> &'static str {
        match self {
            View::Breadboard => "breadboard",
            View::Schematic => "schematic",
            View::Pcb => "pcb",
        }
    }

    /// Descriptor element holding this view's `<p svgId=".."/>` references.
    pub fn descriptor_tag(self) -> &'static str {
        match self {
            View::Breadboard => "breadboardView",
            View::Schematic => "schematicView",
            View::Pcb => "pcbView",
        }
    }
}

/// Entry naming rules for a part archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveLayout {
    pub descriptor_suffix: String,
    /// Case-insensitive substring a drawing entry name must contain.
    /// `None` falls back to the selected view's name.
    pub drawing_marker: Option<String>,
    pub drawing_suffix: String,
}

impl Default for ArchiveLayout {
    fn default() -> Self {
        ArchiveLayout {
            descriptor_suffix: ".fzp".to_string(),
            drawing_marker: None,
            drawing_suffix: ".svg".to_string(),
        }
    }
}

impl ArchiveLayout {
    pub fn is_descriptor(&self, entry_name: &str) -> bool {
        ends_with_ignore_case(entry_name, &self.descriptor_suffix)
    }

    pub fn is_drawing(&self, entry_name: &str, view: View) -> bool {
        let marker = self
            .drawing_marker
            .as_deref()
            .unwrap_or(view.name())
            .to_ascii_lowercase();
        entry_name.to_ascii_lowercase().contains(&marker)
            && ends_with_ignore_case(entry_name, &self.drawing_suffix)
    }
}

fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    name.to_ascii_lowercase()
        .ends_with(&suffix.to_ascii_lowercase())
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub view: View,
    pub layout: ArchiveLayout,
}

impl ExtractConfig {
    pub fn for_view(view: View) -> Self {
        ExtractConfig {
            view,
            ..Default::default()
        }
    }

    /// Loads a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_fritzing_names() {
        let layout = ArchiveLayout::default();
        assert!(layout.is_descriptor("part.Adafruit_Feather.fzp"));
        assert!(!layout.is_descriptor("part.Adafruit_Feather.fzp.bak"));
        assert!(layout.is_drawing(
            "svg.breadboard.Adafruit_Feather_Breadboard.svg",
            View::Breadboard
        ));
        assert!(layout.is_drawing("SVG.BREADBOARD.FOO.SVG", View::Breadboard));
        assert!(!layout.is_drawing("svg.schematic.foo.svg", View::Breadboard));
        assert!(layout.is_drawing("svg.schematic.foo.svg", View::Schematic));
    }

    #[test]
    fn partial_json_config_keeps_defaults() {
        let config =
            ExtractConfig::from_json_str(r#"{ "layout": { "drawing_marker": "bb" } }"#).unwrap();
        assert_eq!(config.view, View::Breadboard);
        assert_eq!(config.layout.descriptor_suffix, ".fzp");
        assert!(config.layout.is_drawing("part_bb.svg", config.view));
    }
}
