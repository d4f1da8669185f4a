//! HTTP server for the retention admin API.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::ConfigError;
use crate::retention::{Clock, GcEngine, RetentionScheduler, StatusReporter, SystemClock};
use crate::router::{create_router, AppState};
use crate::storage::{MemoryRecordStore, RecordStore};

/// Retention admin server.
pub struct RetentionServer {
    config: Arc<Config>,
    store: Arc<dyn RecordStore>,
    scheduler: RetentionScheduler,
    reporter: StatusReporter,
}

impl RetentionServer {
    /// Creates a server with in-memory storage and the system clock.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Self::with_parts(
            config,
            Arc::new(MemoryRecordStore::new()),
            Arc::new(SystemClock),
        )
    }

    /// Creates a server with custom storage and clock.
    pub fn with_parts(
        config: Config,
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        let policy = config.policy()?;
        let engine = Arc::new(GcEngine::with_defaults(store.clone(), clock.clone()));
        let scheduler = RetentionScheduler::new(engine, clock, policy);
        let reporter = StatusReporter::new(scheduler.clone());
        Ok(Self {
            config: Arc::new(config),
            store,
            scheduler,
            reporter,
        })
    }

    /// Handle to the scheduler, for embedding and tests.
    pub fn scheduler(&self) -> RetentionScheduler {
        self.scheduler.clone()
    }

    /// Runs the server.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr: SocketAddr = self.config.bind_address().parse()?;

        if self.config.autostart {
            self.scheduler.start();
        }

        let state = AppState {
            scheduler: self.scheduler.clone(),
            reporter: self.reporter.clone(),
            store: self.store.clone(),
        };

        let app = create_router(state)
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(TraceLayer::new_for_http());

        info!("Custodian admin service is starting at http://{}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Returns the bind address.
    pub fn bind_address(&self) -> String {
        self.config.bind_address()
    }

    /// Returns the base URL for the admin service.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.bind_address())
    }
}

/// Builder for creating a retention server.
pub struct RetentionServerBuilder {
    config: Config,
    store: Option<Arc<dyn RecordStore>>,
    clock: Option<Arc<dyn Clock>>,
}

impl RetentionServerBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            store: None,
            clock: None,
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets the host address.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Sets the admin service port.
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets the record store.
    pub fn store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the server.
    pub fn build(self) -> Result<RetentionServer, ConfigError> {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryRecordStore::new()));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        RetentionServer::with_parts(self.config, store, clock)
    }
}

impl Default for RetentionServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
