// src/archive.rs

use crate::config::{ArchiveLayout, View};
use crate::error::{EntryKind, Error, Result};
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Largest descriptor or drawing entry the pipeline will inflate.
pub const MAX_ENTRY_BYTES: u64 = 64 * 1024 * 1024;

/// A text entry read out of a part archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub kind: EntryKind,
    pub text: String,
}

/// The entries of a part archive the pipeline cares about, in archive order.
///
/// Holding a `PartArchive` guarantees at least one descriptor and one drawing entry.
#[derive(Debug, Clone)]
pub struct PartArchive {
    entries: Vec<ArchiveEntry>,
    descriptor: usize,
    drawing: usize,
}

impl PartArchive {
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// First descriptor entry in archive order.
    pub fn descriptor(&self) -> &ArchiveEntry {
        &self.entries[self.descriptor]
    }

    /// First matching drawing entry in archive order.
    pub fn drawing(&self) -> &ArchiveEntry {
        &self.entries[self.drawing]
    }
}

/// Counts matching entries as they are listed and as their content is fully read.
/// Results are only handed out once the listing is closed and both counts agree.
#[derive(Debug, Default)]
struct EntryTally {
    discovered: usize,
    read: usize,
    listing_closed: bool,
}

impl EntryTally {
    fn is_settled(&self) -> bool {
        self.listing_closed && self.discovered == self.read
    }
}

/// Opens a part archive from disk.
pub fn open_archive(path: &Path, layout: &ArchiveLayout, view: View) -> Result<PartArchive> {
    let file = File::open(path)
        .map_err(|e| Error::Archive(format!("cannot open {}: {e}", path.display())))?;
    read_archive(file, layout, view)
}

/// Reads a part archive held in memory.
pub fn read_archive_bytes(bytes: &[u8], layout: &ArchiveLayout, view: View) -> Result<PartArchive> {
    read_archive(Cursor::new(bytes), layout, view)
}

/// Lists every entry of the archive and reads the descriptor and drawing entries
/// matched by `layout`.
pub fn read_archive<R: Read + Seek>(
    reader: R,
    layout: &ArchiveLayout,
    view: View,
) -> Result<PartArchive> {
    let mut zip = ZipArchive::new(reader)?;
    let mut tally = EntryTally::default();
    let mut entries = Vec::new();

    for index in 0..zip.len() {
        let mut file = zip.by_index(index)?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().to_string();
        let kind = if layout.is_descriptor(&name) {
            EntryKind::Descriptor
        } else if layout.is_drawing(&name, view) {
            EntryKind::Drawing
        } else {
            continue;
        };
        tally.discovered += 1;

        // Sizes come from the archive's own headers.
        let declared = file.size();
        if declared > MAX_ENTRY_BYTES {
            return Err(Error::Archive(format!(
                "entry '{name}' declares {declared} bytes, more than the {MAX_ENTRY_BYTES} byte limit"
            )));
        }
        let mut raw = Vec::with_capacity(declared as usize);
        (&mut file).take(MAX_ENTRY_BYTES + 1).read_to_end(&mut raw)?;
        if raw.len() as u64 > MAX_ENTRY_BYTES {
            return Err(Error::Archive(format!(
                "entry '{name}' inflates past the {MAX_ENTRY_BYTES} byte limit"
            )));
        }
        let text = String::from_utf8(raw)
            .map_err(|_| Error::Archive(format!("entry '{name}' is not valid UTF-8")))?;
        tally.read += 1;

        log::debug!("read {kind} entry '{name}' ({} bytes)", text.len());
        entries.push(ArchiveEntry {
            name,
            kind,
            text: strip_bom(text),
        });
    }
    tally.listing_closed = true;

    if !tally.is_settled() {
        return Err(Error::Archive(format!(
            "archive listing closed with {} of {} matching entries read",
            tally.read, tally.discovered
        )));
    }

    let first_of = |kind: EntryKind| entries.iter().position(|e| e.kind == kind);
    match (first_of(EntryKind::Descriptor), first_of(EntryKind::Drawing)) {
        (Some(descriptor), Some(drawing)) => Ok(PartArchive {
            entries,
            descriptor,
            drawing,
        }),
        (descriptor, drawing) => {
            let mut missing = Vec::new();
            if descriptor.is_none() {
                missing.push(EntryKind::Descriptor);
            }
            if drawing.is_none() {
                missing.push(EntryKind::Drawing);
            }
            Err(Error::MissingRequiredEntry { missing })
        }
    }
}

pub(crate) fn strip_bom(text: String) -> String {
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}
