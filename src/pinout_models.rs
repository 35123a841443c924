// src/pinout_models.rs

use crate::fritzing_models::{BoardMetadata, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Functional group of a pin, used for color coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinGroup {
    Power,
    Communication,
    Digital,
    Analog,
    #[serde(rename = "PWM")]
    Pwm,
    Special,
    Other,
}

impl PinGroup {
    pub const ALL: [PinGroup; 7] = [
        PinGroup::Digital,
        PinGroup::Power,
        PinGroup::Communication,
        PinGroup::Analog,
        PinGroup::Pwm,
        PinGroup::Special,
        PinGroup::Other,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PinGroup::Power => "Power",
            PinGroup::Communication => "Communication",
            PinGroup::Digital => "Digital",
            PinGroup::Analog => "Analog",
            PinGroup::Pwm => "PWM",
            PinGroup::Special => "Special",
            PinGroup::Other => "Other",
        }
    }

    /// Hex stroke color.
    pub fn color(self) -> &'static str {
        match self {
            PinGroup::Power => "#ff6b6b",
            PinGroup::Communication => "#96ceb4",
            PinGroup::Digital => "#4ecdc4",
            PinGroup::Analog => "#45b7d1",
            PinGroup::Pwm => "#f7b731",
            PinGroup::Special => "#a55eea",
            PinGroup::Other => "#64748b",
        }
    }

    /// CSS class carried by annotated pin shapes, e.g. `group-pwm`.
    pub fn css_class(self) -> String {
        format!("group-{}", self.name().to_lowercase())
    }
}

impl fmt::Display for PinGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A connector joined with its resolved position and classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    /// 1-based, in descriptor order.
    pub number: usize,
    pub name: String,
    pub position: Position,
    #[serde(rename = "groupName")]
    pub group: PinGroup,
    pub group_color: String,
    pub drawing_shape_id: String,
    /// False when the shape was missing from the drawing or had no usable geometry.
    /// `position` is then the origin and carries no meaning.
    pub position_resolved: bool,
}

/// Soft, per-pin problems. These never fail an extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PinWarning {
    /// The drawing has no element with the connector's shape-id.
    #[serde(rename_all = "camelCase")]
    ShapeNotFound { pin: usize, drawing_shape_id: String },
    /// The element exists but no position could be read from it.
    #[serde(rename_all = "camelCase")]
    PositionUnresolved { pin: usize, drawing_shape_id: String },
}

impl fmt::Display for PinWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinWarning::ShapeNotFound {
                pin,
                drawing_shape_id,
            } => write!(f, "pin {pin}: shape '{drawing_shape_id}' not found in drawing"),
            PinWarning::PositionUnresolved {
                pin,
                drawing_shape_id,
            } => write!(f, "pin {pin}: no position could be read from shape '{drawing_shape_id}'"),
        }
    }
}

/// Everything extracted from one part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    pub pins: Vec<Pin>,
    pub total_pins: usize,
    #[serde(rename = "annotatedSVG")]
    pub annotated_svg: String,
    pub view_type: String,
    pub metadata: BoardMetadata,
    pub warnings: Vec<PinWarning>,
}

impl Extraction {
    pub fn unresolved_pins(&self) -> impl Iterator<Item = &Pin> {
        self.pins.iter().filter(|p| !p.position_resolved)
    }
}
