// src/lib.rs

pub mod annotator;
pub mod api;
pub mod archive;
pub mod classifier;
pub mod config;
pub mod converter;
pub mod error;
pub mod fritzing_models;
pub mod importer;
pub mod pinout_models;
pub mod resolver;

pub use crate::config::{ArchiveLayout, ExtractConfig, View};
pub use crate::error::{EntryKind, Error, Result};
pub use crate::fritzing_models::{BoardMetadata, Position};
pub use crate::pinout_models::{Extraction, Pin, PinGroup, PinWarning};

use std::path::{Path, PathBuf};

/// Extracts pins from a zipped part archive held in memory.
pub fn extract(archive_bytes: &[u8], config: &ExtractConfig) -> Result<Extraction> {
    let archive = archive::read_archive_bytes(archive_bytes, &config.layout, config.view)?;
    log::debug!(
        "using descriptor '{}' and drawing '{}'",
        archive.descriptor().name,
        archive.drawing().name
    );
    extract_parts(&archive.descriptor().text, &archive.drawing().text, config)
}

/// Extracts pins from a part archive on disk.
pub fn extract_path(path: &Path, config: &ExtractConfig) -> Result<Extraction> {
    let archive = archive::open_archive(path, &config.layout, config.view)?;
    extract_parts(&archive.descriptor().text, &archive.drawing().text, config)
}

/// Extracts pins from a descriptor and its drawing given as text.
pub fn extract_parts(descriptor: &str, drawing: &str, config: &ExtractConfig) -> Result<Extraction> {
    let descriptor = importer::import_descriptor(descriptor, config.view)?;

    // --- POSITIONS ---
    let resolved = resolver::resolve_shapes(drawing, &descriptor.connectors.shape_ids())?;

    // --- PINS ---
    let (pins, warnings) = converter::convert_pins(&descriptor.connectors, &resolved);

    // --- DRAWING ---
    let annotated_svg = annotator::annotate_drawing(drawing, &pins)?;

    log::debug!(
        "extracted {} pins ({} with warnings) from '{}'",
        pins.len(),
        warnings.len(),
        descriptor.metadata.title
    );
    Ok(Extraction {
        total_pins: pins.len(),
        pins,
        annotated_svg,
        view_type: config.view.name().to_string(),
        metadata: descriptor.metadata,
        warnings,
    })
}

/// Reads a part archive without blocking the runtime and extracts it on a blocking thread.
pub async fn extract_file(path: impl Into<PathBuf>, config: ExtractConfig) -> Result<Extraction> {
    let path = path.into();
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| Error::Archive(format!("cannot open {}: {e}", path.display())))?;
    run_blocking(move || extract(&bytes, &config)).await
}

/// Downloads a part archive and extracts it.
pub async fn fetch_and_extract(url: &str, config: ExtractConfig) -> Result<Extraction> {
    let api = api::FritzingApi::new()?;
    let bytes = api.get_part_archive(url).await?;
    run_blocking(move || extract(&bytes, &config)).await
}

async fn run_blocking<F>(job: F) -> Result<Extraction>
where
    F: FnOnce() -> Result<Extraction> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| Error::Task(e.to_string()))?
}
