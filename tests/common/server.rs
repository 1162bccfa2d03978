//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own SQLite notices database.

use admin_notices_server::notices::{NoticeStore, SqliteNoticeStore};
use admin_notices_server::server::{serve_on, RequestsLoggingLevel, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated database
///
/// When dropped, the server task is aborted and temp resources are cleaned
/// up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Notice store for direct seeding and assertions in tests
    pub notice_store: Arc<dyn NoticeStore>,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    server_task: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Spawns a new test server on a random port.
    ///
    /// # Panics
    ///
    /// Panics if database creation or port binding fails, or if the server
    /// doesn't become ready within the timeout.
    pub async fn spawn() -> Self {
        let temp_db_dir = TempDir::new().expect("Failed to create temp db dir");
        let db_path = temp_db_dir.path().join("notices.db");

        let notice_store: Arc<dyn NoticeStore> =
            Arc::new(SqliteNoticeStore::new(&db_path).expect("Failed to open notice store"));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            port,
            ..Default::default()
        };

        let store_for_server = notice_store.clone();
        let server_task = tokio::spawn(async move {
            serve_on(listener, config, store_for_server)
                .await
                .expect("Test server exited with an error");
        });

        let base_url = format!("http://127.0.0.1:{}", port);
        wait_until_ready(&base_url).await;

        Self {
            base_url,
            port,
            notice_store,
            _temp_db_dir: temp_db_dir,
            server_task,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server_task.abort();
    }
}

async fn wait_until_ready(base_url: &str) {
    let client = reqwest::Client::new();
    for _ in 0..50 {
        if let Ok(response) = client.get(base_url).send().await {
            if response.status().is_success() {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("Test server at {} did not become ready", base_url);
}
