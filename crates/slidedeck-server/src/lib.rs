pub mod into_http;
pub mod routes;
pub mod startup;
pub mod telemetry;

use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub name: String,
    pub version: String,
    pub port: u16,
    pub host: IpAddr,
    /// Path prefix the slide routes are served under, `/` for the root.
    pub mount_path: String,
}

impl ServerSettings {
    #[must_use]
    pub fn new(
        name: String,
        version: String,
        port: u16,
        host: IpAddr,
        mount_path: String,
    ) -> Self {
        Self {
            name,
            version,
            port,
            host,
            mount_path,
        }
    }
}
