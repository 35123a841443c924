// src/importer.rs

use crate::config::View;
use crate::error::{Error, Result};
use crate::fritzing_models::*;
use regex::Regex;
use roxmltree::{Document, Node, ParsingOptions};
use std::sync::LazyLock;

/// Qt rich-text exports leave this stylesheet behind in part descriptions.
const QT_CSS_ARTIFACT: &str = "p, li { white-space: pre-wrap; }";

static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style\s*>").unwrap());
static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(?:p|br|div|li|ul|ol|h[1-6]|tr|td|table|html|head|body)\b[^>]*>").unwrap()
});
// Only tag-shaped brackets, so comparisons such as "x < 3 and y > 2" survive.
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z!?][^<>]*>").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static LEADING_DEBRIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[^\p{L}\p{N}"'(\[]+"#).unwrap());

/// Manufacturers recognized in part titles, checked in order.
const TITLE_MANUFACTURERS: [(&str, &str); 4] = [
    ("adafruit", "Adafruit"),
    ("espressif", "Espressif"),
    ("arduino", "Arduino"),
    ("raspberry", "Raspberry Pi"),
];

pub(crate) fn parse_options<'a>() -> ParsingOptions<'a> {
    ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    }
}

/// Parses a Fritzing part descriptor (`.fzp`) into its connector table and metadata.
///
/// Connectors without a shape reference for `view` are skipped.
pub fn import_descriptor(xml: &str, view: View) -> Result<PartDescriptor> {
    let doc = Document::parse_with_options(xml, parse_options())
        .map_err(|e| Error::DescriptorParse(e.to_string()))?;

    let mut connectors = Vec::new();
    for node in doc.descendants().filter(|n| is_tag(n, "connector")) {
        match import_connector(&node, view) {
            Some(connector) => connectors.push(connector),
            None => log::debug!(
                "connector '{}' has no {} shape reference, skipping",
                node.attribute("name").unwrap_or_default(),
                view.descriptor_tag()
            ),
        }
    }
    log::debug!("descriptor declares {} connectors", connectors.len());

    Ok(PartDescriptor {
        connectors: ConnectorTable { connectors },
        metadata: import_metadata(&doc),
    })
}

fn import_connector(node: &Node, view: View) -> Option<Connector> {
    let shape_id = node
        .descendants()
        .find(|n| is_tag(n, view.descriptor_tag()))?
        .descendants()
        .filter(|n| is_tag(n, "p"))
        .filter_map(|p| p.attribute("svgId"))
        .map(str::trim)
        .find(|id| !id.is_empty())?;

    let description = node
        .children()
        .find(|n| is_tag(n, "description"))
        .map(|n| text_of(&n))
        .unwrap_or_default();

    Some(Connector {
        id: node.attribute("id").unwrap_or_default().to_string(),
        name: node.attribute("name").unwrap_or_default().to_string(),
        description,
        drawing_shape_id: shape_id.to_string(),
    })
}

fn import_metadata(doc: &Document) -> BoardMetadata {
    let mut metadata = BoardMetadata {
        title: part_level_text(doc, "title"),
        description: sanitize_description(&part_level_text(doc, "description")),
        author: part_level_text(doc, "author"),
        date: part_level_text(doc, "date"),
        ..Default::default()
    };

    let properties = doc
        .descendants()
        .filter(|n| is_tag(n, "property") && !inside_connector(n))
        .filter(|n| n.parent().is_some_and(|p| is_tag(&p, "properties")));
    for property in properties {
        let Some(name) = property.attribute("name") else {
            continue;
        };
        let mut value = text_of(&property);
        if value.is_empty() {
            value = property.attribute("value").unwrap_or_default().trim().to_string();
        }
        let field = match name.trim().to_lowercase().as_str() {
            "manufacturer" => &mut metadata.manufacturer,
            "package" => &mut metadata.package_type,
            "voltage" => &mut metadata.voltage_range,
            "clock" => &mut metadata.clock_speed,
            "flash" => &mut metadata.flash_memory,
            "ram" => &mut metadata.ram,
            _ => continue,
        };
        *field = value;
    }

    if metadata.manufacturer.is_empty() {
        metadata.manufacturer = manufacturer_from_title(&metadata.title)
            .unwrap_or_default()
            .to_string();
    }
    metadata
}

/// Canonical manufacturer for the first known vendor named in `title`.
pub fn manufacturer_from_title(title: &str) -> Option<&'static str> {
    let title = title.to_lowercase();
    TITLE_MANUFACTURERS
        .iter()
        .find(|(needle, _)| title.contains(needle))
        .map(|(_, canonical)| *canonical)
}

/// Turns a descriptor's rich-text description into plain text.
///
/// Entities are decoded, markup and the Qt stylesheet artifact are removed,
/// whitespace is collapsed and debris before the first word is dropped. A `<`
/// only opens a tag when a name, `/`, `!` or `?` follows it.
pub fn sanitize_description(raw: &str) -> String {
    let decoded = decode_entities(raw);
    let text = STYLE_BLOCK.replace_all(&decoded, " ");
    let text = BLOCK_TAG.replace_all(&text, " ");
    let text = ANY_TAG.replace_all(&text, "");
    let text = text.replace(QT_CSS_ARTIFACT, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = LEADING_DEBRIS.replace(text.trim(), "");
    text.trim().to_string()
}

fn decode_entities(raw: &str) -> String {
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn is_tag(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn inside_connector(node: &Node) -> bool {
    node.ancestors().skip(1).any(|a| is_tag(&a, "connector"))
}

/// Text of the first `name` element that does not belong to a connector.
fn part_level_text(doc: &Document, name: &str) -> String {
    doc.descendants()
        .find(|n| is_tag(n, name) && !inside_connector(n))
        .map(|n| text_of(&n))
        .unwrap_or_default()
}

fn text_of(node: &Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_ampersand_last() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn strips_qt_rich_text_wrapper() {
        let raw = "&lt;!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.0//EN\"&gt;&lt;html&gt;&lt;head&gt;\
            &lt;style type=\"text/css\"&gt;p, li { white-space: pre-wrap; }&lt;/style&gt;&lt;/head&gt;\
            &lt;body&gt;&lt;p&gt;A small board.&lt;/p&gt;&lt;p&gt;Has Wi-Fi.&lt;/p&gt;&lt;/body&gt;&lt;/html&gt;";
        assert_eq!(sanitize_description(raw), "A small board. Has Wi-Fi.");
    }

    #[test]
    fn removes_bare_css_artifact_and_debris() {
        let raw = "p, li { white-space: pre-wrap; }\n  -- : Feather board";
        assert_eq!(sanitize_description(raw), "Feather board");
    }

    #[test]
    fn keeps_escaped_comparisons() {
        assert_eq!(sanitize_description("x &lt; 3 and y &gt; 2"), "x < 3 and y > 2");
        assert_eq!(sanitize_description("3.3V &lt;= VIN &lt; 6V"), "3.3V <= VIN < 6V");
        assert_eq!(
            sanitize_description("&lt;b&gt;Hello&lt;/b&gt; &amp; welcome"),
            "Hello & welcome"
        );
    }

    #[test]
    fn keeps_leading_quote() {
        assert_eq!(sanitize_description("  \"Quoted\" part"), "\"Quoted\" part");
    }
}
