use camino::Utf8PathBuf;
use color_eyre::owo_colors::OwoColorize;
use slidedeck_seed::{SeedOptions, SeedOrder, SeedOutcome};
use slidedeck_store::{MongoStore, StoreSettings};

use crate::CliError;

/// Applies the `seed` flags on top of the configured options.
pub fn merge_options(
    mut options: SeedOptions,
    dir: Option<Utf8PathBuf>,
    order: Option<SeedOrder>,
    concurrency: Option<usize>,
) -> SeedOptions {
    if let Some(dir) = dir {
        options.directory = dir;
    }
    if let Some(order) = order {
        options.order = order;
    }
    if let Some(concurrency) = concurrency {
        options.concurrency = concurrency;
    }
    options
}

pub fn handle(options: &SeedOptions, database: &StoreSettings) -> Result<(), CliError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let store = MongoStore::connect(database).await?;

        match slidedeck_seed::run(&store, options).await? {
            SeedOutcome::Empty => {
                eprintln!(
                    "\n⚠️  No slide files in {}, nothing was inserted.\n",
                    options.directory.as_str().yellow().bold()
                );
            }
            SeedOutcome::Completed(report) => {
                eprintln!(
                    "\n🎉 {} slides inserted into {}! took {} ms.\n",
                    report.count().bold().bright_green(),
                    database.collection.bright_cyan().bold(),
                    report.elapsed.as_millis()
                );
            }
        }

        Ok::<(), CliError>(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flags_replace_configured_values() {
        let options = merge_options(
            SeedOptions::default(),
            Some(Utf8PathBuf::from("decks/q3")),
            Some(SeedOrder::SlideNumber),
            Some(8),
        );

        assert_eq!(options.directory.as_str(), "decks/q3");
        assert_eq!(options.order, SeedOrder::SlideNumber);
        assert_eq!(options.concurrency, 8);
    }

    #[test]
    fn configured_values_survive_missing_flags() {
        let configured = SeedOptions::new(Utf8PathBuf::from("content"), SeedOrder::SlideNumber, 2);

        let options = merge_options(configured, None, None, None);

        assert_eq!(options.directory.as_str(), "content");
        assert_eq!(options.order, SeedOrder::SlideNumber);
        assert_eq!(options.concurrency, 2);
    }
}
