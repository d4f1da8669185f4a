//! Common test utilities.

use custodian::{Config, RetentionServer};
use tokio::net::TcpListener;

/// Test server wrapper.
pub struct TestServer {
    pub base_url: String,
}

impl TestServer {
    /// Creates and starts a test server on a random port.
    pub async fn start() -> Self {
        // Find an available port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = Config {
            host: "127.0.0.1".to_string(),
            port,
            ..Config::default()
        };

        let base_url = format!("http://127.0.0.1:{}", port);
        let server = RetentionServer::new(config).unwrap();

        // Start server in background
        tokio::spawn(async move {
            server.run().await.unwrap();
        });

        // Wait for server to be ready
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self { base_url }
    }

    /// Returns the full URL for an admin path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
