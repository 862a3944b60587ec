//! HTTP route handlers.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod status;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_STATUS;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Path of the dependency status endpoint
pub const STATUS_PATH: &str = "/api/status";

/// Creates the Axum router with all routes and cache headers.
pub fn create_router(state: AppState) -> Router {
    // Status - never cached, every probe must hit the dependencies
    let status_routes = Router::new()
        .route(STATUS_PATH, get(status::status))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_STATUS),
        ));

    Router::new()
        .merge(status_routes)
        .with_state(state)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{AppConfig, DatabaseConfig, StorageConfig};
    use crate::error::CheckError;
    use crate::middleware::X_REQUEST_ID;
    use crate::status::fakes::{FakeDatabase, FakeStorage};

    fn app(database: FakeDatabase, storage: FakeStorage, bucket: Option<&str>) -> Router {
        let config = AppConfig {
            database: DatabaseConfig {
                host: Some("db.internal".to_string()),
                ..Default::default()
            },
            storage: StorageConfig {
                bucket: bucket.map(str::to_string),
            },
            ..Default::default()
        };
        create_router(AppState::new(config, database, storage))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, http::HeaderMap, serde_json::Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, headers, json)
    }

    #[tokio::test]
    async fn test_status_ok_with_all_fields() {
        let (status, headers, json) =
            get_json(app(FakeDatabase::up(), FakeStorage::up(), Some("assets")), STATUS_PATH).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[CACHE_CONTROL], "no-store");
        assert!(headers.contains_key(&X_REQUEST_ID));
        assert_eq!(json["status"], "Backend is running!");
        assert_eq!(json["database_status"], "Connected");
        assert_eq!(json["s3_bucket_status"], "Accessible");
        assert_eq!(json["database_ip"], "db.internal");
        assert_eq!(json["s3_bucket"], "assets");
    }

    #[tokio::test]
    async fn test_status_ok_when_everything_fails() {
        let database = FakeDatabase::down(CheckError::Unreachable(
            "error communicating with database: Connection refused".to_string(),
        ));
        let storage = FakeStorage::down(CheckError::Rejected("access to bucket denied".to_string()));

        let (status, _, json) = get_json(app(database, storage, Some("assets")), STATUS_PATH).await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["database_status"]
            .as_str()
            .unwrap()
            .starts_with("Failed: "));
        assert!(json["s3_bucket_status"]
            .as_str()
            .unwrap()
            .starts_with("Failed: "));
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let (status, _, _) =
            get_json(app(FakeDatabase::up(), FakeStorage::up(), None), "/api/other").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
