//! Shared helpers for integration tests.

use campmate::api::HttpCampusApi;
use campmate::config::ApiConfig;
use serde_json::{json, Value};
use wiremock::MockServer;

/// Build a client pointed at the mock backend.
pub fn api_for(server: &MockServer) -> HttpCampusApi {
    let config = ApiConfig {
        base_url: server.uri(),
        ..ApiConfig::default()
    };
    HttpCampusApi::new(&config, "test-token".to_string()).unwrap()
}

/// Session payload the way the backend emits it: integer id, naive
/// timestamps.
pub fn session_json(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "is_pinned": false,
        "created_at": "2026-08-28T09:00:00",
        "updated_at": "2026-08-28T10:30:00",
        "message_count": 2,
        "last_message": "see you there"
    })
}
