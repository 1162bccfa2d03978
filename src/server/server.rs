use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tower_http::services::ServeDir;
use tracing::{error, warn};

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::nonce::{NonceProvider, DISMISS_ACTION};
use super::screen::ScreenQuery;
use super::session::ClientIdentity;
use super::{log_requests, state::*, ServerConfig};
use crate::notices::{
    collect_active, NoticeRegistry, ObjectType, RenderedNotice, Scope,
};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// Envelope matching the host framework's JSON responses:
/// `{"success": bool, "data": ...}`.
fn json_success(data: serde_json::Value) -> Response {
    Json(serde_json::json!({ "success": true, "data": data })).into_response()
}

fn json_error(status: StatusCode) -> Response {
    (
        status,
        Json(serde_json::json!({ "success": false, "data": null })),
    )
        .into_response()
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: env!("GIT_HASH").to_string(),
    };
    Json(stats)
}

#[derive(Serialize)]
struct NoticesResponse {
    nonce: String,
    notices: Vec<RenderedNotice>,
}

/// Notices for the current admin screen: the global bucket merged with the
/// screen's object bucket, expired entries evicted on the way. The display
/// path is best-effort; a storage failure degrades to an empty list.
async fn get_admin_notices(
    identity: ClientIdentity,
    Query(query): Query<ScreenQuery>,
    State(state): State<ServerState>,
) -> Response {
    let now = Utc::now().timestamp();
    let notices = match collect_active(&state.notice_store, query.resolve_scope(), now) {
        Ok(posted) => posted.iter().map(RenderedNotice::from).collect(),
        Err(err) => {
            error!("Failed to collect notices for display: {}", err);
            Vec::new()
        }
    };

    let nonce = state.nonce_provider.create(DISMISS_ACTION, &identity.0);
    Json(NoticesResponse { nonce, notices }).into_response()
}

#[derive(Deserialize, Debug)]
struct DismissBody {
    pub object_type: Option<String>,
    pub object_id: Option<i64>,
    pub key: Option<String>,
    pub nonce: Option<String>,
}

/// Dismissal endpoint. Ordering matters: the nonce is checked before any
/// field validation, and an invalid nonce terminates the request without
/// further processing.
async fn dismiss_notice(
    identity: ClientIdentity,
    State(state): State<ServerState>,
    Json(body): Json<DismissBody>,
) -> Response {
    let nonce_ok = body
        .nonce
        .as_deref()
        .map(|nonce| state.nonce_provider.verify(nonce, DISMISS_ACTION, &identity.0))
        .unwrap_or(false);
    if !nonce_ok {
        return StatusCode::FORBIDDEN.into_response();
    }

    let (Some(object_type), Some(object_id), Some(key)) =
        (body.object_type, body.object_id, body.key)
    else {
        return json_error(StatusCode::NOT_FOUND);
    };

    let scope = if object_type == "option" {
        Scope::Global
    } else {
        match ObjectType::parse(&object_type) {
            Some(object_type) => Scope::for_object(object_type, object_id),
            None => return json_error(StatusCode::INTERNAL_SERVER_ERROR),
        }
    };

    let registry = NoticeRegistry::new(state.notice_store.clone(), scope);
    let deleted = match registry.delete(&key) {
        Ok(()) => true,
        Err(err) => {
            warn!("Failed to dismiss notice {} in {:?}: {}", key, scope, err);
            false
        }
    };

    json_success(serde_json::json!(deleted))
}

/// Client-side dismissal script with a fresh nonce embedded, the analog of
/// the original's admin footer script.
async fn dismiss_script(
    identity: ClientIdentity,
    State(state): State<ServerState>,
) -> impl IntoResponse {
    let nonce = state.nonce_provider.create(DISMISS_ACTION, &identity.0);
    let script = format!(
        r#"(function () {{
    document.addEventListener('click', function (event) {{
        var dismiss = event.target.closest('.admin-notice .notice-dismiss');
        if (!dismiss) return;
        var el = dismiss.closest('.admin-notice');
        fetch('/admin/notices/dismiss', {{
            method: 'POST',
            headers: {{ 'Content-Type': 'application/json' }},
            body: JSON.stringify({{
                nonce: '{}',
                object_id: Number(el.dataset.noticeObjectId),
                object_type: el.dataset.noticeObjectType,
                key: el.dataset.noticeKey
            }})
        }}).then(function () {{ el.remove(); }});
    }});
}})();
"#,
        nonce
    );

    ([(header::CONTENT_TYPE, "text/javascript")], script)
}

fn make_app(
    config: ServerConfig,
    notice_store: Arc<dyn crate::notices::NoticeStore>,
) -> Result<Router> {
    let secret = config
        .nonce_secret
        .clone()
        .unwrap_or_else(NonceProvider::generate_secret);
    let nonce_provider = Arc::new(NonceProvider::new(&secret, config.nonce_lifetime_secs));

    let state = ServerState {
        config: config.clone(),
        start_time: Instant::now(),
        notice_store,
        nonce_provider,
    };

    let notice_routes: Router = Router::new()
        .route("/notices", get(get_admin_notices))
        .route("/notices/dismiss", post(dismiss_notice))
        .route("/notices/dismiss.js", get(dismiss_script))
        .with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    let app: Router = home_router
        .nest("/admin", notice_routes)
        .layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

pub async fn run_server(
    notice_store: Arc<dyn crate::notices::NoticeStore>,
    config: ServerConfig,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, notice_store)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}

/// Serve an already-built app on an existing listener. Used by the e2e
/// harness to bind on a random port.
pub async fn serve_on(
    listener: tokio::net::TcpListener,
    config: ServerConfig,
    notice_store: Arc<dyn crate::notices::NoticeStore>,
) -> Result<()> {
    let app = make_app(config, notice_store)?;
    Ok(axum::serve(listener, app).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::RequestsLoggingLevel;
    use crate::notices::{InMemoryNoticeStore, NoticeOptions, NoticeStore};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt; // for `oneshot`

    fn test_app() -> (Router, Arc<dyn NoticeStore>) {
        let store: Arc<dyn NoticeStore> = Arc::new(InMemoryNoticeStore::new());
        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            nonce_secret: Some("test-secret".to_string()),
            ..Default::default()
        };
        let app = make_app(config, store.clone()).unwrap();
        (app, store)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_dismiss_without_nonce_is_forbidden() {
        let (app, store) = test_app();

        let registry = NoticeRegistry::new(store.clone(), Scope::Global);
        registry.add("k", "m", NoticeOptions::default()).unwrap();

        let request = Request::builder()
            .method("POST")
            .uri("/admin/notices/dismiss")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"object_type": "option", "object_id": -1, "key": "k"}"#,
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // The bucket is untouched.
        assert!(registry.get_all().unwrap().contains_key("k"));
    }

    #[tokio::test]
    async fn test_display_returns_nonce_and_empty_list() {
        let (app, _store) = test_app();

        let request = Request::builder()
            .uri("/admin/notices")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body["nonce"].as_str().is_some_and(|s| !s.is_empty()));
        assert!(body["notices"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dismiss_script_embeds_nonce() {
        let (app, _store) = test_app();

        let request = Request::builder()
            .uri("/admin/notices/dismiss.js")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/javascript"
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let script = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(script.contains("nonce: '"));
        assert!(script.contains("/admin/notices/dismiss"));
    }

    #[tokio::test]
    async fn test_home_reports_uptime() {
        let (app, _store) = test_app();

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body["uptime"].as_str().is_some());
    }
}
