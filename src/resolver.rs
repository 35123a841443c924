// src/resolver.rs

use crate::error::{Error, Result};
use crate::fritzing_models::{Position, ResolvedBy, ShapeResolution};
use crate::importer::parse_options;
use glam::DVec2;
use regex::Regex;
use roxmltree::{Document, Node};
use std::collections::HashMap;
use std::sync::LazyLock;

const NUM: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";
const UNSIGNED: &str = r"(?:\d+\.?\d*|\.\d+)";

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^\s*({NUM})")).unwrap());
static TRANSLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"translate\(\s*({NUM})(?:\s*,\s*|\s+)?({NUM})?\s*\)")).unwrap()
});
static PATH_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"[MLCSQTA]\s*({NUM})\s*,?\s*({NUM})")).unwrap());
static LEADING_MOVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^\s*M\s*({NUM})\s*,?\s*({NUM})")).unwrap());
// Relative cubic run `c-a,b-c,d-e,f`, which Fritzing emits for circular pin holes.
static ARC_RUN: LazyLock<Regex> = LazyLock::new(|| {
    let pair = format!(r"-{UNSIGNED}[,\s]\s*-?{UNSIGNED}");
    Regex::new(&format!(r"c\s*{pair}\s*{pair}\s*{pair}")).unwrap()
});

/// Finds a representative center for path data.
pub trait PathCenter {
    fn center(&self, d: &str) -> Option<Position>;
}

/// Default path heuristic.
///
/// A path drawn as a circle from a relative cubic run is centered on its leading
/// absolute `M`. Anything else is approximated by the midpoint of the bounding box of
/// the first coordinate pair after each absolute command letter. Relative commands
/// carry offsets, not points, and are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcOrBoundingBox;

impl PathCenter for ArcOrBoundingBox {
    fn center(&self, d: &str) -> Option<Position> {
        if ARC_RUN.is_match(d)
            && let Some(start) = LEADING_MOVE.captures(d)
            && let (Some(x), Some(y)) = (parse_f64(&start[1]), parse_f64(&start[2]))
        {
            return Some(Position::new(x, y));
        }

        let mut points = PATH_PAIR
            .captures_iter(d)
            .filter_map(|c| Some(DVec2::new(parse_f64(&c[1])?, parse_f64(&c[2])?)));
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(((min + max) * 0.5).into())
    }
}

/// Resolves each shape-id to a position using the default path heuristic.
///
/// Ids with no element in the drawing are left out of the map.
pub fn resolve_shapes(svg: &str, shape_ids: &[&str]) -> Result<HashMap<String, ShapeResolution>> {
    resolve_with(svg, shape_ids, &ArcOrBoundingBox)
}

pub fn resolve_with(
    svg: &str,
    shape_ids: &[&str],
    path_center: &dyn PathCenter,
) -> Result<HashMap<String, ShapeResolution>> {
    let doc = parse_drawing(svg)?;

    let mut by_id: HashMap<&str, Node> = HashMap::new();
    for node in doc.descendants().filter(|n| n.is_element()) {
        if let Some(id) = node.attribute("id") {
            by_id.entry(id).or_insert(node);
        }
    }

    let mut resolved = HashMap::new();
    for &shape_id in shape_ids {
        if let Some(node) = by_id.get(shape_id) {
            resolved.insert(shape_id.to_string(), resolve_element(node, path_center));
        }
    }
    log::debug!(
        "resolved {} of {} shape ids in drawing",
        resolved.len(),
        shape_ids.len()
    );
    Ok(resolved)
}

pub(crate) fn parse_drawing(svg: &str) -> Result<Document<'_>> {
    let doc = Document::parse_with_options(svg, parse_options())
        .map_err(|e| Error::DrawingParse(e.to_string()))?;
    let root = doc.root_element().tag_name().name();
    if root != "svg" {
        return Err(Error::DrawingParse(format!(
            "expected <svg> root element, found <{root}>"
        )));
    }
    Ok(doc)
}

/// Reads a position from a single drawing element, trying each shape grammar in turn.
pub fn resolve_element(node: &Node, path_center: &dyn PathCenter) -> ShapeResolution {
    let number = |name: &str| node.attribute(name).and_then(leading_number);

    let found = if let (Some(cx), Some(cy)) = (number("cx"), number("cy")) {
        Some((Position::new(cx, cy), ResolvedBy::Center))
    } else if let (Some(x), Some(y)) = (number("x"), number("y")) {
        Some((Position::new(x, y), ResolvedBy::Corner))
    } else if let Some(t) = node.attribute("transform").and_then(parse_translate) {
        Some((t, ResolvedBy::Translate))
    } else {
        node.attribute("d")
            .and_then(|d| path_center.center(d))
            .map(|p| (p, ResolvedBy::Path))
    };

    match found {
        Some((position, method)) => ShapeResolution { position, method },
        None => ShapeResolution::unresolved(),
    }
}

/// `translate(a, b)` anywhere in a transform list. A missing `b` is 0.
pub fn parse_translate(transform: &str) -> Option<Position> {
    let caps = TRANSLATE.captures(transform)?;
    let x = parse_f64(&caps[1])?;
    let y = match caps.get(2) {
        Some(m) => parse_f64(m.as_str())?,
        None => 0.0,
    };
    Some(Position::new(x, y))
}

/// Numeric prefix of an attribute value, so `"10.5px"` reads as 10.5.
pub fn leading_number(value: &str) -> Option<f64> {
    LEADING_NUMBER
        .captures(value)
        .and_then(|c| parse_f64(&c[1]))
}

fn parse_f64(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_number_accepts_units() {
        assert_eq!(leading_number("10.5px"), Some(10.5));
        assert_eq!(leading_number(" -.5"), Some(-0.5));
        assert_eq!(leading_number("1e2"), Some(100.0));
        assert_eq!(leading_number("auto"), None);
        assert_eq!(leading_number(""), None);
    }

    #[test]
    fn translate_forms() {
        assert_eq!(parse_translate("translate(50,60)"), Some(Position::new(50.0, 60.0)));
        assert_eq!(parse_translate("translate( 1.5 -2 )"), Some(Position::new(1.5, -2.0)));
        assert_eq!(
            parse_translate("rotate(90) translate(3, 4)"),
            Some(Position::new(3.0, 4.0))
        );
        assert_eq!(parse_translate("translate(7)"), Some(Position::new(7.0, 0.0)));
        assert_eq!(parse_translate("scale(2)"), None);
    }

    #[test]
    fn arc_path_centers_on_move() {
        let d = "M12.5,30c-2.761,0-5,2.239-5,5c0,2.761,2.239,5,5,5";
        assert_eq!(ArcOrBoundingBox.center(d), Some(Position::new(12.5, 30.0)));
    }

    #[test]
    fn plain_path_uses_bounding_box_midpoint() {
        let d = "M0,0 L10,0 L10,20 L0,20 Z";
        assert_eq!(ArcOrBoundingBox.center(d), Some(Position::new(5.0, 10.0)));
    }

    #[test]
    fn relative_segments_are_skipped() {
        let d = "M100,100 l5,0 l0,5 l-5,0 z";
        assert_eq!(ArcOrBoundingBox.center(d), Some(Position::new(100.0, 100.0)));
        assert_eq!(ArcOrBoundingBox.center("m1,2 l3,4"), None);
    }

    #[test]
    fn path_without_coordinates_has_no_center() {
        assert_eq!(ArcOrBoundingBox.center("Z"), None);
    }
}
