use color_eyre::owo_colors::OwoColorize;
use eyre::Result;
use http::Method;
use slidedeck_store::SlideStore;
use std::io;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::Any;
use tower_http::{compression::CompressionLayer, cors::CorsLayer};

use axum::{Router, body::Body, http::Request, routing::get, serve::Serve};
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tower_request_id::{RequestId, RequestIdLayer};
use tracing::{Level, error, error_span, info, warn};

use crate::ServerSettings;
use crate::routes::{get_slide, list_slides};

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<dyn SlideStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn SlideStore>) -> Self {
        Self { store }
    }
}

pub struct Application {
    pub port: u16,
    pub host: IpAddr,
    pub server: Serve<Router, Router>,
}

impl Application {
    /// Binds the listener and wires the routes to `store`.
    ///
    /// When the configured port is taken, an ephemeral port on the same interface is used.
    ///
    /// # Errors
    /// Fails when no port can be bound on the interface.
    pub async fn build(configuration: &ServerSettings, store: Arc<dyn SlideStore>) -> Result<Self> {
        let address = format!("{}:{}", configuration.host, configuration.port);

        let listener = match TcpListener::bind(&address).await {
            Ok(listener) => listener,
            Err(err) => {
                error!("{err}. Trying another port...");
                match TcpListener::bind(format!("{}:0", configuration.host)).await {
                    Ok(listener) => listener,
                    Err(err) => {
                        error!("No ports available, shutting down...");
                        return Err(err.into());
                    }
                }
            }
        };

        let port = listener.local_addr()?.port();
        let host = configuration.host;

        let state = AppState::new(store);
        let server = build_server(listener, state, &configuration.mount_path);

        Ok(Self { port, host, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn host(&self) -> String {
        self.host.to_string()
    }

    /// # Errors
    ///
    /// Returns an error if the server fails while accepting connections.
    pub async fn run_until_stopped(self) -> io::Result<()> {
        self.server
            // https://github.com/tokio-rs/axum/blob/main/examples/graceful-shutdown/src/main.rs
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install the Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("Failed to install the SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("ctrl+c received.");
        },
        () = terminate => {
            info!("SIGTERM received.");
        },
    }
}

/// Slide routes, mounted under `mount_path`.
pub fn build_router(state: AppState, mount_path: &str) -> Router {
    let slides = Router::new()
        .route("/", get(list_slides))
        .route("/:id", get(get_slide))
        .with_state(state);

    match normalize_mount_path(mount_path) {
        Some(prefix) => Router::new().nest(&prefix, slides),
        None => slides,
    }
}

fn normalize_mount_path(mount_path: &str) -> Option<String> {
    let trimmed = mount_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{trimmed}"))
    }
}

pub fn build_server(listener: TcpListener, state: AppState, mount_path: &str) -> Serve<Router, Router> {
    let mut server = build_router(state, mount_path);

    if cfg!(debug_assertions) {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET])
            .allow_headers(Any);

        server = server.layer(cors);
    }

    let server = server
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|request: &Request<Body>| {
                            let request_id = request
                                .extensions()
                                .get::<RequestId>()
                                .map_or_else(|| "unknown".into(), ToString::to_string);

                            error_span!(
                                "request",
                                id = %request_id,
                                method = %request.method().blue().bold(),
                                uri = %request.uri()
                            )
                        })
                        .on_response(
                            DefaultOnResponse::new()
                                .include_headers(true)
                                .level(Level::INFO),
                        ),
                )
                .layer(RequestIdLayer),
        )
        .layer(CompressionLayer::new());

    axum::serve(listener, server)
}

/// Serves the slides API until a shutdown signal arrives, then closes the store.
///
/// # Errors
/// Fails when the server cannot be started or stops with an I/O error.
pub async fn run_server(
    configuration: ServerSettings,
    start: Instant,
    store: Arc<dyn SlideStore>,
) -> Result<()> {
    if let Err(err) = store.ping().await {
        warn!("The document store is not reachable yet, requests will fail until it is: {err}");
    }

    let result = serve(&configuration, start, store.clone()).await;
    store.close().await;
    result
}

async fn serve(
    configuration: &ServerSettings,
    start: Instant,
    store: Arc<dyn SlideStore>,
) -> Result<()> {
    let app = match Application::build(configuration, store).await {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to start the server: {:?}", e);
            return Err(e);
        }
    };

    let mount = normalize_mount_path(&configuration.mount_path).unwrap_or_default();
    let url = format!("http://{}:{}{mount}", app.host(), app.port());

    println!(
        "\n\n  {} {} ready in {} ms\n",
        configuration.name.to_uppercase().bold().bright_green(),
        format!("v{}", configuration.version).green(),
        start.elapsed().as_millis().bold().bright_white(),
    );

    println!(
        "  {}  {}:  {}\n\n",
        "➜".bold().bright_green(),
        "Local".bold().bright_white(),
        url.bright_cyan().underline()
    );

    if let Err(e) = app.run_until_stopped().await {
        error!("Error while running the HTTP server: {:?}", e);
        return Err(e.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_paths_are_normalized() {
        assert_eq!(normalize_mount_path("/"), None);
        assert_eq!(normalize_mount_path(""), None);
        assert_eq!(normalize_mount_path("api/slides"), Some("/api/slides".into()));
        assert_eq!(normalize_mount_path("/api/slides/"), Some("/api/slides".into()));
    }
}
