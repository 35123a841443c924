// src/annotator.rs

use crate::error::{Error, Result};
use crate::pinout_models::{Pin, PinGroup};
use quick_xml::{
    Reader, Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Write as _};

/// Translucent fill given to every pin shape.
pub const PIN_FILL: &str = "rgba(255, 0, 0, 0.3)";

/// Stylesheet inserted as the first child of the drawing's root.
pub fn pin_stylesheet() -> String {
    let mut css = String::new();
    css.push_str(
        ".pin-hole { cursor: pointer; stroke-width: 1px; fill: rgba(255, 0, 0, 0.3); \
         transition: all 0.2s ease; pointer-events: all !important; z-index: 1000 !important; }\n",
    );
    css.push_str(".pin-hole:hover { fill: rgba(255, 0, 0, 0.6); stroke-width: 2px; }\n");
    css.push_str(".pin-hole.selected { fill: rgba(255, 0, 0, 0.8); stroke-width: 2px; }\n");
    css.push_str(".pin-hole.hidden { opacity: 0; pointer-events: none !important; }\n");
    for group in PinGroup::ALL {
        let _ = writeln!(css, ".{} {{ stroke: {}; }}", group.css_class(), group.color());
    }
    css
}

/// Rewrites a drawing so each pin's shape is styled, labelled and drawn on top.
///
/// Pin shapes get a group class, `data-*` attributes, fill/stroke overrides and a
/// `<title>` tooltip, and are moved to the end of the root element in pin order.
/// Every other element is written back unchanged. Pins whose shape is not in the
/// drawing are ignored.
pub fn annotate_drawing(svg: &str, pins: &[Pin]) -> Result<String> {
    let mut ordered: Vec<&Pin> = pins.iter().collect();
    ordered.sort_by_key(|p| p.number);

    // A shape shared by several pins belongs to the last of them.
    let owners: HashMap<&str, &Pin> = ordered
        .iter()
        .map(|p| (p.drawing_shape_id.as_str(), *p))
        .collect();

    let mut rewriter = Rewriter {
        writer: Writer::new(Vec::new()),
        owners,
        seen: HashSet::new(),
        captures: Vec::new(),
        lifted: HashMap::new(),
    };
    let mut reader = Reader::from_str(svg);
    let mut depth = 0usize;
    let mut root_seen = false;

    loop {
        match reader.read_event().map_err(drawing_err)? {
            Event::Eof => break,
            Event::Start(e) => {
                if !root_seen {
                    root_seen = true;
                    rewriter.write(Event::Start(root_start(&e)?))?;
                    rewriter.write_stylesheet()?;
                } else if let Some(pin) = rewriter.target(&e)? {
                    let events = annotated_open(&e, pin)?;
                    rewriter.captures.push(Capture {
                        depth,
                        shape_id: pin.drawing_shape_id.clone(),
                        events,
                    });
                } else {
                    rewriter.emit(Event::Start(e.into_owned()))?;
                }
                depth += 1;
            }
            Event::Empty(e) => {
                if !root_seen {
                    root_seen = true;
                    let start = root_start(&e)?;
                    let end = start.to_end().into_owned();
                    rewriter.write(Event::Start(start))?;
                    rewriter.write_stylesheet()?;
                    rewriter.write(Event::End(end))?;
                } else if let Some(pin) = rewriter.target(&e)? {
                    let mut events = annotated_open(&e, pin)?;
                    events.push(Event::End(e.to_end().into_owned()));
                    rewriter.lift(pin.drawing_shape_id.clone(), events);
                } else {
                    rewriter.emit(Event::Empty(e.into_owned()))?;
                }
            }
            Event::End(e) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| drawing_err("unbalanced closing tag"))?;
                if rewriter.captures.last().is_some_and(|c| c.depth == depth) {
                    if let Some(mut capture) = rewriter.captures.pop() {
                        capture.events.push(Event::End(e.into_owned()));
                        rewriter.lift(capture.shape_id, capture.events);
                    }
                } else if depth == 0 {
                    rewriter.write_lifted(&ordered)?;
                    rewriter.write(Event::End(e.into_owned()))?;
                } else {
                    rewriter.emit(Event::End(e.into_owned()))?;
                }
            }
            other => rewriter.emit(other.into_owned())?,
        }
    }

    if !root_seen {
        return Err(drawing_err("drawing has no root element"));
    }
    if depth != 0 {
        return Err(drawing_err("drawing ended with unclosed elements"));
    }

    String::from_utf8(rewriter.writer.into_inner()).map_err(drawing_err)
}

/// A pin element whose events are held back until the root closes.
struct Capture {
    depth: usize,
    shape_id: String,
    events: Vec<Event<'static>>,
}

struct Rewriter<'p> {
    writer: Writer<Vec<u8>>,
    owners: HashMap<&'p str, &'p Pin>,
    seen: HashSet<String>,
    captures: Vec<Capture>,
    lifted: HashMap<String, Vec<Event<'static>>>,
}

impl<'p> Rewriter<'p> {
    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer.write_event(event).map_err(drawing_err)
    }

    /// Routes an event into the innermost open pin capture, or straight to the output.
    fn emit(&mut self, event: Event<'static>) -> Result<()> {
        match self.captures.last_mut() {
            Some(capture) => {
                capture.events.push(event);
                Ok(())
            }
            None => self.write(event),
        }
    }

    fn write_stylesheet(&mut self) -> Result<()> {
        let mut style = BytesStart::new("style");
        style.push_attribute(("type", "text/css"));
        let css = pin_stylesheet();
        self.write(Event::Start(style))?;
        self.write(Event::Text(BytesText::new(&css)))?;
        self.write(Event::End(BytesEnd::new("style")))
    }

    /// The pin owning this element, the first time its id is seen.
    fn target(&mut self, e: &BytesStart) -> Result<Option<&'p Pin>> {
        let Some(id) = attribute_value(e, b"id")? else {
            return Ok(None);
        };
        let Some(pin) = self.owners.get(id.as_str()).copied() else {
            return Ok(None);
        };
        Ok(self.seen.insert(id).then_some(pin))
    }

    fn lift(&mut self, shape_id: String, events: Vec<Event<'static>>) {
        self.lifted.insert(shape_id, events);
    }

    fn write_lifted(&mut self, ordered: &[&Pin]) -> Result<()> {
        for pin in ordered {
            let shape_id = pin.drawing_shape_id.as_str();
            let owned = self
                .owners
                .get(shape_id)
                .is_some_and(|owner| owner.number == pin.number);
            if !owned {
                continue;
            }
            if let Some(events) = self.lifted.remove(shape_id) {
                for event in events {
                    self.write(event)?;
                }
            }
        }
        Ok(())
    }
}

fn root_start(e: &BytesStart) -> Result<BytesStart<'static>> {
    if e.local_name().as_ref() != b"svg" {
        return Err(drawing_err(format!(
            "expected <svg> root element, found <{}>",
            String::from_utf8_lossy(e.name().as_ref())
        )));
    }

    let mut root = BytesStart::new(element_name(e)?);
    let mut styled = false;
    for attr in e.attributes() {
        let attr = attr.map_err(drawing_err)?;
        if attr.key.as_ref() == b"style" {
            let existing = attr.unescape_value().map_err(drawing_err)?;
            root.push_attribute(("style", full_size_style(&existing).as_str()));
            styled = true;
        } else {
            root.push_attribute(attr);
        }
    }
    if !styled {
        root.push_attribute(("style", full_size_style("").as_str()));
    }
    Ok(root)
}

/// Keeps existing declarations except width/height, then stretches to the container.
fn full_size_style(existing: &str) -> String {
    let mut declarations: Vec<&str> = existing
        .split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .filter(|d| {
            let property = d.split(':').next().unwrap_or_default().trim();
            !property.eq_ignore_ascii_case("width") && !property.eq_ignore_ascii_case("height")
        })
        .collect();
    declarations.push("width: 100%");
    declarations.push("height: 100%");
    declarations.join("; ")
}

/// Opening tag and tooltip for a pin element.
fn annotated_open(e: &BytesStart, pin: &Pin) -> Result<Vec<Event<'static>>> {
    let color = pin.group.color();
    let overrides: [(&str, String); 7] = [
        ("class", format!("pin-hole {}", pin.group.css_class())),
        ("data-pin", pin.name.clone()),
        ("data-group", pin.group.name().to_string()),
        ("data-group-color", color.to_string()),
        ("fill", PIN_FILL.to_string()),
        ("stroke", color.to_string()),
        ("stroke-width", "1".to_string()),
    ];
    let mut applied = [false; 7];

    let mut start = BytesStart::new(element_name(e)?);
    for attr in e.attributes() {
        let attr = attr.map_err(drawing_err)?;
        match overrides
            .iter()
            .position(|(key, _)| key.as_bytes() == attr.key.as_ref())
        {
            Some(i) => {
                start.push_attribute((overrides[i].0, overrides[i].1.as_str()));
                applied[i] = true;
            }
            None => start.push_attribute(attr),
        }
    }
    for ((key, value), done) in overrides.iter().zip(applied) {
        if !done {
            start.push_attribute((*key, value.as_str()));
        }
    }

    let tooltip = format!("{} ({})", pin.name, pin.group.name());
    Ok(vec![
        Event::Start(start),
        Event::Start(BytesStart::new("title")),
        Event::Text(BytesText::new(&tooltip).into_owned()),
        Event::End(BytesEnd::new("title")),
    ])
}

fn element_name(e: &BytesStart) -> Result<String> {
    std::str::from_utf8(e.name().as_ref())
        .map(str::to_string)
        .map_err(drawing_err)
}

fn attribute_value(e: &BytesStart, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(drawing_err)?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value().map_err(drawing_err)?.into_owned()));
        }
    }
    Ok(None)
}

fn drawing_err(e: impl Display) -> Error {
    Error::DrawingParse(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_size_style_replaces_dimensions() {
        assert_eq!(full_size_style(""), "width: 100%; height: 100%");
        assert_eq!(
            full_size_style("background:#fff; width: 3in;HEIGHT:2in;"),
            "background:#fff; width: 100%; height: 100%"
        );
    }

    #[test]
    fn stylesheet_has_a_rule_per_group() {
        let css = pin_stylesheet();
        for group in PinGroup::ALL {
            assert!(css.contains(&format!(".{} {{ stroke: {}; }}", group.css_class(), group.color())));
        }
        assert!(css.contains(".pin-hole:hover"));
        assert!(css.contains(".pin-hole.selected"));
        assert!(css.contains(".pin-hole.hidden"));
    }
}
