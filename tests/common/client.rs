//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with methods for the admin notices endpoints. When routes
//! or request formats change, update only this file.

use reqwest::Response;
use serde_json::json;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// HTTP test client
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// Fetch notices for the global screen (no object context).
    pub async fn get_notices(&self) -> Response {
        self.client
            .get(format!("{}/admin/notices", self.base_url))
            .send()
            .await
            .expect("get_notices request failed")
    }

    /// Fetch notices for a single-object screen, e.g. ("post", "post", 5).
    pub async fn get_notices_for_screen(&self, screen: &str, id_param: &str, id: i64) -> Response {
        self.client
            .get(format!(
                "{}/admin/notices?screen={}&{}={}",
                self.base_url, screen, id_param, id
            ))
            .send()
            .await
            .expect("get_notices_for_screen request failed")
    }

    /// Convenience: fetch notices and return the embedded nonce.
    pub async fn get_nonce(&self) -> String {
        let response = self.get_notices().await;
        assert!(response.status().is_success());
        let body: serde_json::Value = response.json().await.expect("Invalid notices response");
        body["nonce"]
            .as_str()
            .expect("Missing nonce in notices response")
            .to_string()
    }

    /// Post a dismissal with the full field set.
    pub async fn dismiss(
        &self,
        nonce: &str,
        object_type: &str,
        object_id: i64,
        key: &str,
    ) -> Response {
        self.dismiss_raw(json!({
            "nonce": nonce,
            "object_type": object_type,
            "object_id": object_id,
            "key": key,
        }))
        .await
    }

    /// Post an arbitrary dismissal body, for field-validation tests.
    pub async fn dismiss_raw(&self, body: serde_json::Value) -> Response {
        self.client
            .post(format!("{}/admin/notices/dismiss", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("dismiss request failed")
    }

    pub async fn get_dismiss_script(&self) -> Response {
        self.client
            .get(format!("{}/admin/notices/dismiss.js", self.base_url))
            .send()
            .await
            .expect("dismiss script request failed")
    }
}
