use mongodb::bson;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No connection string configured, set `MONGO_URI`")]
    MissingUri,
    #[error(
        "No database selected, set `MONGO_DB_NAME` or include a database in the connection string"
    )]
    MissingDatabase,
    #[error("MongoDB error: {0}")]
    Driver(#[from] mongodb::error::Error),
    #[error("Could not encode slide as BSON: {0}")]
    Encode(#[from] bson::ser::Error),
    #[error("Stored document is malformed: {0}")]
    MalformedDocument(String),
    #[error("Document store is unavailable")]
    Unavailable,
}
