//! Application state, route table and server startup.

use crate::config::ServerConfig;
use crate::diagnostics::Diagnostics;
use crate::error::ApiError;
use crate::host::selection::NoSelection;
use crate::host::user::{SystemUsername, UsernameProvider};
use crate::host::{self, Host, HostBridge};
use crate::services;
use crate::storage::blob_store::BlobStore;
use crate::storage::sqlite::SqliteDocument;
use crate::storage::StorageResult;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::{info, warn};
use std::io;
use std::sync::Arc;

/// Shared state injected into every handler as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// The only way handlers reach the host document.
    pub bridge: HostBridge<Host>,
    pub users: Arc<dyn UsernameProvider>,
    pub diagnostics: Arc<Diagnostics>,
}

impl AppState {
    pub fn new(
        bridge: HostBridge<Host>,
        users: Arc<dyn UsernameProvider>,
        diagnostics: Arc<Diagnostics>,
    ) -> Self {
        Self {
            bridge,
            users,
            diagnostics,
        }
    }

    /// Operator name for audit fields. Asks the host through the bridge
    /// unless an override is configured.
    pub async fn username(&self) -> String {
        if let Some(name) = self.users.configured() {
            return name;
        }
        let reported = match self.bridge.invoke_async(Host::reported_username).await {
            Ok(name) => name,
            Err(e) => {
                warn!("Could not ask the host for the operator name: {}", e);
                None
            }
        };
        self.users.resolve(reported)
    }
}

/// JSON extractor settings: body size limit, and malformed bodies answered
/// with `400 {"error": ...}`.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}

/// Registers every API route. Collection scopes go first so that their
/// prefixes are not shadowed by the plain `/api/...` resources.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(services::templates::configure_routes())
        .service(services::checks::configure_routes())
        .configure(services::system::configure_routes);
}

/// Opens the host document on the host thread and attaches it to `bridge`.
pub fn start_host(
    bridge: &HostBridge<Host>,
    config: &ServerConfig,
    diagnostics: Arc<Diagnostics>,
) -> io::Result<host::HostThread> {
    let document_path = config.document.clone();
    host::spawn(bridge, config.queue_capacity, move || -> StorageResult<Host> {
        let document = SqliteDocument::open(&document_path)?;
        Ok(Host::new(
            BlobStore::new(Box::new(document), diagnostics),
            Box::new(NoSelection),
        ))
    })
    .map_err(io::Error::other)
}

async fn log_document_summary(bridge: &HostBridge<Host>) {
    let bridge = bridge.clone();
    match web::block(move || bridge.invoke(Host::summary)).await {
        Ok(Ok(Ok(summary))) => info!(
            "Host document holds {} templates and {} checks",
            summary.templates, summary.checks
        ),
        Ok(Ok(Err(e))) => warn!("Could not summarize host document: {}", e),
        Ok(Err(e)) => warn!("Could not summarize host document: {}", e),
        Err(e) => warn!("Could not summarize host document: {}", e),
    }
}

/// Runs the server until it is stopped, then drains the host queue.
pub async fn run(config: ServerConfig) -> io::Result<()> {
    serve(config, &HostBridge::new()).await
}

/// Like `run`, on a caller-supplied bridge. The bridge is shut down and the
/// host thread joined on every exit path, including a failed bind.
pub async fn serve(config: ServerConfig, bridge: &HostBridge<Host>) -> io::Result<()> {
    let diagnostics = Arc::new(Diagnostics::default());
    let host_thread = start_host(bridge, &config, Arc::clone(&diagnostics))?;

    let result = listen(&config, bridge, diagnostics).await;

    bridge.shutdown();
    if host_thread.join().is_err() {
        warn!("Host context thread panicked during shutdown");
    }
    info!("Server stopped");
    result
}

async fn listen(
    config: &ServerConfig,
    bridge: &HostBridge<Host>,
    diagnostics: Arc<Diagnostics>,
) -> io::Result<()> {
    log_document_summary(bridge).await;

    let state = AppState::new(
        bridge.clone(),
        Arc::new(SystemUsername::new(config.user.clone())),
        diagnostics,
    );
    let body_limit = config.body_limit;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(json_config(body_limit))
            .app_data(web::Data::new(state.clone()))
            .configure(configure)
            .default_service(web::route().to(services::not_found))
    })
    .bind((config.host.as_str(), config.port))?;

    info!("Server running at {}", config.url());
    server.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::BridgeError;
    use std::net::TcpListener;

    fn config_on(port: u16, dir: &tempfile::TempDir) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port,
            document: dir.path().join("checklist.sqlite"),
            user: Some("tester".to_string()),
            queue_capacity: 4,
            body_limit: 1024,
        }
    }

    #[actix_web::test]
    async fn failed_bind_still_stops_host() {
        let taken = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();
        let dir = tempfile::tempdir().unwrap();
        let bridge = HostBridge::new();

        let result = serve(config_on(port, &dir), &bridge).await;

        assert!(result.is_err());
        assert!(!bridge.is_ready());
        assert_eq!(
            bridge.invoke_async(|host| host.summary().is_ok()).await,
            Err(BridgeError::Closed)
        );
    }

    #[actix_web::test]
    async fn username_asks_host_without_override() {
        struct Reported;
        impl crate::host::user::HostUsername for Reported {
            fn host_username(&mut self) -> Option<String> {
                Some("host-operator".to_string())
            }
        }

        let bridge = HostBridge::new();
        let thread = host::spawn(&bridge, 4, || -> StorageResult<Host> {
            let blobs = BlobStore::new(
                Box::new(SqliteDocument::open_in_memory()?),
                Arc::new(Diagnostics::default()),
            );
            Ok(Host::new(blobs, Box::new(NoSelection)).with_username(Box::new(Reported)))
        })
        .unwrap();
        let diagnostics = Arc::new(Diagnostics::default());

        let hosted = AppState::new(
            bridge.clone(),
            Arc::new(SystemUsername::new(None)),
            Arc::clone(&diagnostics),
        );
        assert_eq!(hosted.username().await, "host-operator");

        let overridden = AppState::new(
            bridge.clone(),
            Arc::new(SystemUsername::new(Some("inspector".into()))),
            diagnostics,
        );
        assert_eq!(overridden.username().await, "inspector");

        bridge.shutdown();
        thread.join().unwrap();
    }

    #[actix_web::test]
    async fn username_falls_back_when_host_is_unavailable() {
        let users = Arc::new(SystemUsername::new(None));
        let state = AppState::new(
            HostBridge::new(),
            users.clone(),
            Arc::new(Diagnostics::default()),
        );
        assert_eq!(state.username().await, users.fallback());
    }
}
