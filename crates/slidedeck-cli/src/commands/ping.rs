use std::io::Write;

use slidedeck_store::{MongoStore, SlideStore, StoreSettings};

use crate::CliError;

const RULE_WIDTH: usize = 60;

pub fn handle(database: &StoreSettings) -> Result<(), CliError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let store = MongoStore::connect(database).await?;
        let result = describe(&store, &mut std::io::stdout()).await;
        store.close().await;
        result
    })
}

/// Pings the store and writes a summary of its database.
pub async fn describe<W: Write>(store: &dyn SlideStore, out: &mut W) -> Result<(), CliError> {
    store.ping().await?;
    let collections = store.collections().await?;

    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "{rule}")?;
    writeln!(out, " MongoDB Connection Successful")?;
    writeln!(out, "{rule}")?;
    writeln!(out, " Database     : {}", store.database_name())?;
    writeln!(out, " Collections  :")?;
    if collections.is_empty() {
        writeln!(out, "   (No collections found)")?;
    } else {
        for name in &collections {
            writeln!(out, "   - {name}")?;
        }
    }
    writeln!(out, "{rule}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidedeck_store::{MemoryStore, SlidePayload, StoreError};

    async fn describe_to_string(store: &MemoryStore) -> Result<String, CliError> {
        let mut out = Vec::new();
        describe(store, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn reports_an_empty_database() {
        let output = describe_to_string(&MemoryStore::new()).await.unwrap();

        assert!(output.contains(" MongoDB Connection Successful"));
        assert!(output.contains(" Database     : memory"));
        assert!(output.contains("   (No collections found)"));
    }

    #[tokio::test]
    async fn lists_collections() {
        let store = MemoryStore::new();
        store.insert(SlidePayload::default()).await.unwrap();

        let output = describe_to_string(&store).await.unwrap();

        assert!(output.contains("   - slides"));
        assert!(!output.contains("(No collections found)"));
    }

    #[tokio::test]
    async fn unreachable_store_is_an_error() {
        let err = describe_to_string(&MemoryStore::unavailable())
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::StoreError(StoreError::Unavailable)));
    }
}
