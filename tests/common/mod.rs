#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

pub const FEATHER_FZP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<module moduleId="TestFeatherModuleID" fritzingVersion="0.9.3b">
  <version>4</version>
  <title>Adafruit Test Feather</title>
  <author>Jane Maker</author>
  <date>2021-04-01</date>
  <description>&lt;p&gt;A &lt;b&gt;tiny&lt;/b&gt; board.&lt;/p&gt;</description>
  <properties>
    <property name="family">microcontroller board</property>
    <property name="Package">THT</property>
    <property name="voltage">3.3V</property>
    <property name="clock" value="80MHz"/>
  </properties>
  <views>
    <breadboardView>
      <layers image="breadboard/test_feather_breadboard.svg"><layer layerId="breadboard"/></layers>
    </breadboardView>
  </views>
  <connectors>
    <connector id="connector0" name="VCC" type="male">
      <description>Power in</description>
      <views>
        <breadboardView><p layer="breadboard" svgId="connector0pin"/></breadboardView>
        <schematicView><p layer="schematic" svgId="connector0schem"/></schematicView>
      </views>
    </connector>
    <connector id="connector1" name="GND" type="male">
      <description>Ground</description>
      <views>
        <breadboardView><p layer="breadboard" svgId="connector1pin"/></breadboardView>
        <schematicView><p layer="schematic" svgId="connector1schem"/></schematicView>
      </views>
    </connector>
    <connector id="connector2" name="D2" type="male">
      <views>
        <breadboardView><p layer="breadboard" svgId="connector2pin"/></breadboardView>
      </views>
    </connector>
    <connector id="connector9" name="NC" type="male">
      <views>
        <breadboardView><p layer="breadboard" svgId="connector9pin"/></breadboardView>
      </views>
    </connector>
    <connector id="connector10" name="RST" type="male">
      <views>
        <schematicView><p layer="schematic" svgId="connector10schem"/></schematicView>
      </views>
    </connector>
    <connector id="connector3" name="SDA" type="male">
      <views>
        <breadboardView><p layer="breadboard" svgId="connector3pin"/></breadboardView>
      </views>
    </connector>
    <connector id="connector4" name="A0" type="male">
      <views>
        <breadboardView><p layer="breadboard" svgId="connector4pin"/></breadboardView>
      </views>
    </connector>
    <connector id="connector5" name="CS" type="male">
      <views>
        <breadboardView><p layer="breadboard" svgId="connector5pin"/></breadboardView>
      </views>
    </connector>
  </connectors>
</module>
"#;

pub const FEATHER_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="1in" height="2in" viewBox="0 0 100 200">
  <g id="breadboard">
    <rect id="pcb" x="0" y="0" width="100" height="200" fill="#1a1a1a"/>
    <circle id="connector0pin" cx="10" cy="20" r="3" fill="#cccccc"/>
    <circle id="connector1pin" cx="10" cy="40" r="3"/>
    <rect id="connector2pin" transform="translate(50,60)" width="4" height="4"/>
    <path id="connector3pin" d="M30,80c-2,0-4,2-4,4c0,2,2,4,4,4"/>
    <rect id="connector4pin" x="70" y="90" width="5" height="5"/>
    <g id="connector5pin"><text font-size="3">CS</text></g>
    <text id="label" x="5" y="5" fill="white">Feather &amp; Co</text>
  </g>
</svg>
"##;

pub const FEATHER_SCHEMATIC_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <line id="connector0schem" x="1" y="2"/>
  <line id="connector1schem" x="3" y="4"/>
  <line id="connector10schem" x="5" y="6"/>
</svg>
"#;

/// Builds a zip archive in memory.
pub fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A Fritzing-style archive with breadboard, schematic and icon drawings.
pub fn feather_archive() -> Vec<u8> {
    zip_archive(&[
        ("svg.icon.test_feather_icon.svg", "<svg xmlns=\"http://www.w3.org/2000/svg\"/>"),
        ("part.test_feather.fzp", FEATHER_FZP),
        ("svg.schematic.test_feather_schematic.svg", FEATHER_SCHEMATIC_SVG),
        ("svg.breadboard.test_feather_breadboard.svg", FEATHER_SVG),
    ])
}

/// Minimal descriptor from `(name, breadboard shape-id)` pairs.
pub fn descriptor_with(connectors: &[(&str, &str)]) -> String {
    let mut xml = String::from("<module><title>Test</title><connectors>");
    for (i, (name, shape_id)) in connectors.iter().enumerate() {
        xml.push_str(&format!(
            "<connector id=\"connector{i}\" name=\"{name}\"><views><breadboardView>\
             <p layer=\"breadboard\" svgId=\"{shape_id}\"/></breadboardView></views></connector>"
        ));
    }
    xml.push_str("</connectors></module>");
    xml
}
