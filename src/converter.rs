// src/converter.rs

use crate::classifier::classify;
use crate::fritzing_models::*;
use crate::pinout_models::{Pin, PinWarning};
use std::collections::HashMap;

/// Joins connectors with their resolved shapes and classifies them.
///
/// Each distinct shape-id becomes one pin, numbered from 1 in order of first
/// appearance and carrying the last connector declared for it. Connectors
/// whose shape is missing or has no readable position keep the origin as their
/// position, are marked unresolved, and are reported as warnings.
pub fn convert_pins(
    table: &ConnectorTable,
    resolved: &HashMap<String, ShapeResolution>,
) -> (Vec<Pin>, Vec<PinWarning>) {
    let keyed = table.keyed();
    if keyed.len() < table.len() {
        log::debug!(
            "{} connectors share a shape-id with a later connector",
            table.len() - keyed.len()
        );
    }
    let mut pins = Vec::with_capacity(keyed.len());
    let mut warnings = Vec::new();

    for (index, connector) in keyed.into_iter().enumerate() {
        let number = index + 1;
        let shape_id = &connector.drawing_shape_id;

        let resolution = match resolved.get(shape_id) {
            None => {
                log::warn!(
                    "pin {number} '{}': shape '{shape_id}' not found in drawing",
                    connector.name
                );
                warnings.push(PinWarning::ShapeNotFound {
                    pin: number,
                    drawing_shape_id: shape_id.clone(),
                });
                ShapeResolution::unresolved()
            }
            Some(r) if !r.is_resolved() => {
                log::warn!(
                    "pin {number} '{}': no position readable from shape '{shape_id}'",
                    connector.name
                );
                warnings.push(PinWarning::PositionUnresolved {
                    pin: number,
                    drawing_shape_id: shape_id.clone(),
                });
                *r
            }
            Some(r) => *r,
        };

        let group = classify(&connector.name);
        pins.push(Pin {
            number,
            name: connector.name.clone(),
            position: resolution.position,
            group,
            group_color: group.color().to_string(),
            drawing_shape_id: shape_id.clone(),
            position_resolved: resolution.is_resolved(),
        });
    }

    (pins, warnings)
}
