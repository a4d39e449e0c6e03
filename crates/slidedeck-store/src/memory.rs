use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{DEFAULT_COLLECTION, Slide, SlideId, SlidePayload, SlideStore, StoreError};

const MEMORY_DATABASE: &str = "memory";

/// Process-local store backed by a vector.
///
/// Keeps insertion order as its natural order. An `unavailable` store fails every call the
/// way an unreachable server would.
#[derive(Debug)]
pub struct MemoryStore {
    slides: RwLock<Vec<Slide>>,
    available: bool,
    closed: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_slides(Vec::new())
    }

    #[must_use]
    pub fn with_slides(slides: Vec<Slide>) -> Self {
        Self {
            slides: RwLock::new(slides),
            available: true,
            closed: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub async fn len(&self) -> usize {
        self.slides.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slides.read().await.is_empty()
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SlideStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Slide>, StoreError> {
        self.ensure_available()?;
        Ok(self.slides.read().await.clone())
    }

    async fn get(&self, id: &SlideId) -> Result<Option<Slide>, StoreError> {
        self.ensure_available()?;
        let slides = self.slides.read().await;
        Ok(slides.iter().find(|slide| slide.id == *id).cloned())
    }

    async fn insert(&self, payload: SlidePayload) -> Result<SlideId, StoreError> {
        self.ensure_available()?;
        let id = SlideId::generate();
        self.slides.write().await.push(Slide::new(id, payload));
        debug!(%id, "slide stored in memory");
        Ok(id)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.ensure_available()
    }

    async fn collections(&self) -> Result<Vec<String>, StoreError> {
        self.ensure_available()?;
        if self.slides.read().await.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(vec![DEFAULT_COLLECTION.to_owned()])
        }
    }

    fn database_name(&self) -> &str {
        MEMORY_DATABASE
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}
