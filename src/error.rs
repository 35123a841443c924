use std::fmt;
use thiserror::Error;

/// The class of archive entry the pipeline requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Descriptor,
    Drawing,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Descriptor => f.write_str("descriptor"),
            EntryKind::Drawing => f.write_str("drawing"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Archive is missing required entries: {}", join_kinds(.missing))]
    MissingRequiredEntry { missing: Vec<EntryKind> },

    #[error("Descriptor parse error: {0}")]
    DescriptorParse(String),

    #[error("Drawing parse error: {0}")]
    DrawingParse(String),

    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Archive(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Archive(err.to_string())
    }
}

fn join_kinds(kinds: &[EntryKind]) -> String {
    kinds
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
