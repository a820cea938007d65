//! Negotiate endpoint

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use tracing::debug;

use crate::api::http::HUB_PATH;
use crate::api::state::AppState;
use crate::config::ServerConfig;
use crate::types::ConnectionInfo;

/// GET|POST /api/negotiate - Connection info for opening a hub session
pub async fn negotiate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<ConnectionInfo> {
    let info = ConnectionInfo::new(hub_url(&state.config, &headers));
    debug!(url = %info.url, connection_id = %info.connection_id, "negotiated hub session");
    Json(info)
}

/// The configured public hub URL, else one built from the request `Host`
fn hub_url(config: &ServerConfig, headers: &HeaderMap) -> String {
    if let Some(url) = &config.public_hub_url {
        return url.clone();
    }

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| config.bind_addr.to_string());

    format!("ws://{}{}", host, HUB_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_hub_url_prefers_config() {
        let config = ServerConfig::default().with_public_hub_url("wss://board.example/api/hub");
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:9000"));

        assert_eq!(hub_url(&config, &headers), "wss://board.example/api/hub");
    }

    #[test]
    fn test_hub_url_from_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:9000"));

        assert_eq!(
            hub_url(&ServerConfig::default(), &headers),
            "ws://localhost:9000/api/hub"
        );
    }

    #[test]
    fn test_hub_url_falls_back_to_bind_addr() {
        assert_eq!(
            hub_url(&ServerConfig::default(), &HeaderMap::new()),
            "ws://127.0.0.1:7071/api/hub"
        );
    }
}
