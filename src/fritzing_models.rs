// Models for what is read out of a Fritzing part: the descriptor's connectors
// and metadata, and the positions resolved from its drawing.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// A point in drawing-local SVG user units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

impl From<DVec2> for Position {
    fn from(v: DVec2) -> Self {
        Position { x: v.x, y: v.y }
    }
}

/// A logical pin declared in the part descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Connector {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Join key into the drawing: the `id` of the shape drawn for this connector.
    pub drawing_shape_id: String,
}

/// Connectors in descriptor order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectorTable {
    pub connectors: Vec<Connector>,
}

impl ConnectorTable {
    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    pub fn shape_ids(&self) -> Vec<&str> {
        self.connectors
            .iter()
            .map(|c| c.drawing_shape_id.as_str())
            .collect()
    }

    /// One connector per shape-id, in order of first appearance.
    ///
    /// A later connector sharing a shape-id replaces the earlier one's data but
    /// keeps its slot.
    pub fn keyed(&self) -> Vec<&Connector> {
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut keyed: Vec<&Connector> = Vec::with_capacity(self.connectors.len());
        for connector in &self.connectors {
            match slots.entry(connector.drawing_shape_id.as_str()) {
                Entry::Occupied(slot) => keyed[*slot.get()] = connector,
                Entry::Vacant(slot) => {
                    slot.insert(keyed.len());
                    keyed.push(connector);
                }
            }
        }
        keyed
    }
}

/// Best-effort board description. Absent fields are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardMetadata {
    pub title: String,
    pub description: String,
    pub author: String,
    pub date: String,
    pub manufacturer: String,
    pub package_type: String,
    pub voltage_range: String,
    pub clock_speed: String,
    pub flash_memory: String,
    pub ram: String,
}

/// The descriptor parser's output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartDescriptor {
    pub connectors: ConnectorTable,
    pub metadata: BoardMetadata,
}

/// Which shape grammar produced a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolvedBy {
    /// `cx`/`cy`
    Center,
    /// `x`/`y`, the top-left corner
    Corner,
    /// `transform="translate(a, b)"`
    Translate,
    /// path `d` data
    Path,
    /// Shape exists but none of the grammars applied; position is the origin.
    Unresolved,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeResolution {
    pub position: Position,
    pub method: ResolvedBy,
}

impl ShapeResolution {
    pub fn unresolved() -> Self {
        ShapeResolution {
            position: Position::ORIGIN,
            method: ResolvedBy::Unresolved,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.method != ResolvedBy::Unresolved
    }
}
