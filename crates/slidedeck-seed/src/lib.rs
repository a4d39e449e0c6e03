mod errors;
mod sources;

pub use errors::*;
pub use sources::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use camino::{Utf8Path, Utf8PathBuf};
use futures::StreamExt;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use slidedeck_store::{SlideId, SlidePayload, SlideStore};
use tracing::{error, info, warn};

pub const DEFAULT_SLIDES_DIR: &str = "slides";

#[derive(Deserialize, Debug, Clone)]
pub struct SeedOptions {
    pub directory: Utf8PathBuf,
    pub order: SeedOrder,
    /// Maximum number of files loaded and inserted at the same time. `1` inserts one file
    /// after the other.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub concurrency: usize,
}

impl SeedOptions {
    #[must_use]
    pub fn new(directory: Utf8PathBuf, order: SeedOrder, concurrency: usize) -> Self {
        Self {
            directory,
            order,
            concurrency,
        }
    }
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self::new(Utf8PathBuf::from(DEFAULT_SLIDES_DIR), SeedOrder::Listing, 1)
    }
}

#[derive(Debug)]
pub enum SeedOutcome {
    /// The directory held no slide files. Nothing was written.
    Empty,
    Completed(SeedReport),
}

#[derive(Debug)]
pub struct SeedReport {
    /// Every inserted file with the identity it received, in file order.
    pub inserted: Vec<(Utf8PathBuf, SlideId)>,
    pub elapsed: Duration,
}

impl SeedReport {
    #[must_use]
    pub fn count(&self) -> usize {
        self.inserted.len()
    }
}

/// Inserts every slide file of `options.directory` into `store`.
///
/// The run stops at the first failure. Slides inserted before it stay in the store, there
/// is no rollback. With `concurrency > 1` every file is parsed before anything is written,
/// and an insertion failure lists in [`SeedError::inserted`] every slide that was kept,
/// including ones that were already in flight. The store is closed once the run is over, except when the directory had
/// no slide files: in that case the connection is left for the caller to drop.
///
/// # Errors
/// Returns the first connection, filesystem, parsing or insertion error.
pub async fn run(store: &dyn SlideStore, options: &SeedOptions) -> Result<SeedOutcome, SeedError> {
    let result = seed(store, options).await;

    if let Ok(SeedOutcome::Empty) = result {
        warn!(
            "No slide files found in `{}`, nothing to insert.",
            options.directory
        );
        return result;
    }

    match &result {
        Ok(SeedOutcome::Completed(report)) => info!(
            "All {} slides were inserted in {} ms.",
            report.count(),
            report.elapsed.as_millis()
        ),
        Err(err) => error!("Seeding aborted: {err}"),
        Ok(SeedOutcome::Empty) => {}
    }

    store.close().await;
    result
}

async fn seed(store: &dyn SlideStore, options: &SeedOptions) -> Result<SeedOutcome, SeedError> {
    let start = Instant::now();

    store.ping().await.map_err(SeedError::Connection)?;
    info!(database = store.database_name(), "Connected to the document store");

    let files = find_slide_files(&options.directory, options.order)?;
    info!("Found {} slide files in `{}`", files.len(), options.directory);

    if files.is_empty() {
        return Ok(SeedOutcome::Empty);
    }

    let inserted = if options.concurrency <= 1 {
        insert_in_sequence(store, files).await?
    } else {
        insert_concurrently(store, files, options.concurrency).await?
    };

    Ok(SeedOutcome::Completed(SeedReport {
        inserted,
        elapsed: start.elapsed(),
    }))
}

async fn insert_in_sequence(
    store: &dyn SlideStore,
    files: Vec<Utf8PathBuf>,
) -> Result<Vec<(Utf8PathBuf, SlideId)>, SeedError> {
    let mut inserted = Vec::with_capacity(files.len());
    for path in files {
        let payload = load_payload(&path)?;
        match insert_payload(store, &path, payload).await {
            Ok(id) => inserted.push((path, id)),
            Err(err) => return Err(err.with_inserted(inserted)),
        }
    }
    Ok(inserted)
}

/// Every file is loaded before the first insert, so a malformed file writes nothing. Once
/// an insert fails no new one is started. Inserts already in flight are awaited and kept
/// in the report.
async fn insert_concurrently(
    store: &dyn SlideStore,
    files: Vec<Utf8PathBuf>,
    limit: usize,
) -> Result<Vec<(Utf8PathBuf, SlideId)>, SeedError> {
    let payloads = files
        .into_iter()
        .map(|path| load_payload(&path).map(|payload| (path, payload)))
        .collect::<Result<Vec<_>, _>>()?;

    let failed = AtomicBool::new(false);
    let failed = &failed;

    let results: Vec<_> = futures::stream::iter(payloads)
        .map(|(path, payload)| async move {
            if failed.load(Ordering::Acquire) {
                return None;
            }
            let result = insert_payload(store, &path, payload).await;
            if result.is_err() {
                failed.store(true, Ordering::Release);
            }
            Some(result.map(|id| (path, id)))
        })
        .buffered(limit)
        .collect()
        .await;

    let mut inserted = Vec::with_capacity(results.len());
    let mut first_error = None;
    for result in results.into_iter().flatten() {
        match result {
            Ok(done) => inserted.push(done),
            Err(err) if first_error.is_none() => first_error = Some(err),
            Err(err) => warn!("{err}"),
        }
    }

    match first_error {
        Some(err) => Err(err.with_inserted(inserted)),
        None => Ok(inserted),
    }
}

async fn insert_payload(
    store: &dyn SlideStore,
    path: &Utf8Path,
    payload: SlidePayload,
) -> Result<SlideId, SeedError> {
    let id = store
        .insert(payload)
        .await
        .map_err(|source| SeedError::Insert {
            path: path.to_owned(),
            source,
            inserted: Vec::new(),
        })?;

    info!(%id, "Inserted `{}`", path.file_name().unwrap_or(path.as_str()));
    Ok(id)
}
