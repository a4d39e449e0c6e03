use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::{self, Bson, Document, doc},
    options::ClientOptions,
};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, info};

use crate::{ID_KEY, Slide, SlideId, SlidePayload, SlideStore, StoreError, StoreSettings};

const APP_NAME: &str = "slidedeck";

#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
    collection: Collection<Document>,
}

impl MongoStore {
    /// Builds a client for the configured deployment.
    ///
    /// The driver connects lazily, so an unreachable server only shows up on the first
    /// operation. Call [`SlideStore::ping`] to find out early.
    ///
    /// # Errors
    /// Fails when no connection string is configured, when it cannot be parsed, or when
    /// no database name can be determined.
    pub async fn connect(settings: &StoreSettings) -> Result<Self, StoreError> {
        let uri = settings.uri.as_ref().ok_or(StoreError::MissingUri)?;

        let mut options = ClientOptions::parse(uri.expose_secret()).await?;
        options.server_selection_timeout =
            Some(Duration::from_millis(settings.server_selection_timeout_ms));
        options.app_name.get_or_insert_with(|| APP_NAME.to_owned());

        let client = Client::with_options(options)?;

        let database = match &settings.name {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .ok_or(StoreError::MissingDatabase)?,
        };

        let collection = database.collection::<Document>(&settings.collection);

        info!(
            database = database.name(),
            collection = %settings.collection,
            "document store client ready"
        );

        Ok(Self {
            client,
            database,
            collection,
        })
    }
}

#[async_trait]
impl SlideStore for MongoStore {
    async fn list(&self) -> Result<Vec<Slide>, StoreError> {
        let documents: Vec<Document> = self.collection.find(doc! {}).await?.try_collect().await?;
        debug!(count = documents.len(), "fetched slides");

        documents.into_iter().map(slide_from_document).collect()
    }

    async fn get(&self, id: &SlideId) -> Result<Option<Slide>, StoreError> {
        self.collection
            .find_one(doc! { "_id": id.object_id() })
            .await?
            .map(slide_from_document)
            .transpose()
    }

    async fn insert(&self, payload: SlidePayload) -> Result<SlideId, StoreError> {
        let document = document_from_payload(&payload)?;
        let result = self.collection.insert_one(document).await?;

        match result.inserted_id {
            Bson::ObjectId(oid) => Ok(SlideId::from(oid)),
            other => Err(StoreError::MalformedDocument(format!(
                "store assigned a non ObjectId identity: {other}"
            ))),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    async fn collections(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.database.list_collection_names().await?)
    }

    fn database_name(&self) -> &str {
        self.database.name()
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        info!("document store connection closed");
    }
}

pub(crate) fn document_from_payload(payload: &SlidePayload) -> Result<Document, StoreError> {
    Ok(bson::to_document(payload.as_map())?)
}

pub(crate) fn slide_from_document(mut document: Document) -> Result<Slide, StoreError> {
    let id = match document.remove(ID_KEY) {
        Some(Bson::ObjectId(oid)) => SlideId::from(oid),
        Some(other) => {
            return Err(StoreError::MalformedDocument(format!(
                "`{ID_KEY}` is not an ObjectId: {other}"
            )));
        }
        None => {
            return Err(StoreError::MalformedDocument(format!(
                "document has no `{ID_KEY}`"
            )));
        }
    };

    let content = match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => SlidePayload::try_from(map)
            .map_err(|err| StoreError::MalformedDocument(err.to_string()))?,
        other => {
            return Err(StoreError::MalformedDocument(format!(
                "expected a document body, found {other}"
            )));
        }
    };

    Ok(Slide::new(id, content))
}
