use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

pub const DEFAULT_COLLECTION: &str = "slides";
pub const DEFAULT_SERVER_SELECTION_TIMEOUT_MS: u64 = 5000;

#[derive(Deserialize, Debug, Clone)]
pub struct StoreSettings {
    /// Connection string, usually taken from `MONGO_URI`.
    pub uri: Option<SecretString>,
    /// Database name. Falls back to the default database named in the connection string.
    pub name: Option<String>,
    pub collection: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub server_selection_timeout_ms: u64,
}

impl StoreSettings {
    #[must_use]
    pub fn new(uri: Option<SecretString>, name: Option<String>, collection: String) -> Self {
        Self {
            uri,
            name,
            collection,
            server_selection_timeout_ms: DEFAULT_SERVER_SELECTION_TIMEOUT_MS,
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self::new(None, None, DEFAULT_COLLECTION.to_owned())
    }
}
