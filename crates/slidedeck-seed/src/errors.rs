use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use slidedeck_store::{PayloadError, SlideId, StoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Could not reach the document store: {0}")]
    Connection(#[source] StoreError),
    #[error("Could not read the slides directory `{path}`: {source}")]
    Directory { path: Utf8PathBuf, source: io::Error },
    #[error("Could not read `{path}`: {source}")]
    Read { path: Utf8PathBuf, source: io::Error },
    #[error("`{path}` is not valid JSON: {source}")]
    Parse {
        path: Utf8PathBuf,
        source: serde_json::Error,
    },
    #[error("`{path}` does not hold a slide: {source}")]
    Payload {
        path: Utf8PathBuf,
        source: PayloadError,
    },
    #[error("Could not insert `{path}`: {source}")]
    Insert {
        path: Utf8PathBuf,
        source: StoreError,
        /// Slides persisted by the run before it stopped, in file order.
        inserted: Vec<(Utf8PathBuf, SlideId)>,
    },
    #[error("`{}` ends in `.json` but its name is not valid UTF-8", .path.display())]
    FileName { path: std::path::PathBuf },
}

impl SeedError {
    /// File or directory the failure is about, if any.
    pub fn path(&self) -> Option<&Utf8Path> {
        match self {
            SeedError::Connection(_) | SeedError::FileName { .. } => None,
            SeedError::Directory { path, .. }
            | SeedError::Read { path, .. }
            | SeedError::Parse { path, .. }
            | SeedError::Payload { path, .. }
            | SeedError::Insert { path, .. } => Some(path),
        }
    }

    /// Slides the run had persisted when an insert failed, in file order.
    pub fn inserted(&self) -> &[(Utf8PathBuf, SlideId)] {
        match self {
            SeedError::Insert { inserted, .. } => inserted,
            _ => &[],
        }
    }

    pub(crate) fn with_inserted(self, kept: Vec<(Utf8PathBuf, SlideId)>) -> Self {
        match self {
            SeedError::Insert { path, source, .. } => SeedError::Insert {
                path,
                source,
                inserted: kept,
            },
            other => other,
        }
    }
}
