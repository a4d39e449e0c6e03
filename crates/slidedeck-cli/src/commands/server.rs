use clap::crate_version;
use slidedeck_server::{ServerSettings, startup::run_server};
use slidedeck_store::{MongoStore, StoreSettings};
use std::{net::IpAddr, sync::Arc, time::Instant};

use crate::{CliError, configuration::ApplicationSettings};

/// Command line values that take precedence over the configuration file.
#[derive(Debug, Default)]
pub struct ServerOverrides {
    pub interface: Option<IpAddr>,
    pub port: Option<u16>,
    pub mount_path: Option<String>,
}

impl ServerOverrides {
    #[must_use]
    pub fn new(interface: Option<IpAddr>, port: Option<u16>, mount_path: Option<String>) -> Self {
        Self {
            interface,
            port,
            mount_path,
        }
    }

    pub fn apply(self, app: &ApplicationSettings) -> ServerSettings {
        ServerSettings::new(
            app.name.clone(),
            crate_version!().to_owned(),
            self.port.unwrap_or(app.port),
            self.interface.unwrap_or(app.host),
            self.mount_path.unwrap_or_else(|| app.mount_path.clone()),
        )
    }
}

pub fn start_server(
    app: &ApplicationSettings,
    database: &StoreSettings,
    overrides: ServerOverrides,
) -> Result<(), CliError> {
    let start = Instant::now();
    let configuration = overrides.apply(app);

    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let store = MongoStore::connect(database).await?;
        run_server(configuration, start, Arc::new(store)).await?;
        Ok::<(), CliError>(())
    })
}
