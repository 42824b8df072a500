use crate::{GIT_COMMIT_HASH, store::SharedStore};
use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, error, info_span};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    database: String,
}

#[utoipa::path(
    get,
    path= "/health",
    responses (
        (status = 200, description = "Database is healthy", body = [Health]),
        (status = 503, description = "Database is unhealthy", body = [Health])
    ),
    tag= "health"
)]
// axum handler for health
pub async fn health(method: Method, store: Extension<SharedStore>) -> impl IntoResponse {
    let ping_span = info_span!("db.ping", db.operation = "PING");
    let result = store.ping().instrument(ping_span).await.map_err(|error| {
        error!("Failed to ping database: {error:#}");

        StatusCode::SERVICE_UNAVAILABLE
    });

    // Create a health struct
    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if result.is_ok() {
            "ok".to_string()
        } else {
            "error".to_string()
        },
    };

    let body = if method == Method::GET {
        Json(&health).into_response()
    } else {
        Body::empty().into_response()
    };

    let short_hash = if health.commit.len() > 7 {
        &health.commit[0..7]
    } else {
        ""
    };

    let headers = format!("{}:{}:{}", health.name, health.version, short_hash)
        .parse::<HeaderValue>()
        .map(|x_app_header_value| {
            debug!("X-App header: {:?}", x_app_header_value);

            let mut headers = HeaderMap::new();

            headers.insert("X-App", x_app_header_value);

            headers
        })
        .map_err(|err| {
            error!("Failed to parse X-App header: {}", err);
        });

    // Unwrap the headers or provide a default value (empty headers) in case of an error
    let headers = headers.unwrap_or_else(|()| HeaderMap::new());

    match result {
        Ok(()) => {
            debug!("Database connection is healthy");
            (StatusCode::OK, headers, body)
        }
        Err(status) => {
            debug!("Database connection is unhealthy");
            (status, headers, body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Reservation, Store, UserRecord};
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Unreachable;

    #[async_trait]
    impl Store for Unreachable {
        async fn insert_user(&self, _user: UserRecord) -> Result<()> {
            Err(anyhow!("unreachable"))
        }

        async fn find_user_by_username(&self, _username: &str) -> Result<Option<UserRecord>> {
            Err(anyhow!("unreachable"))
        }

        async fn insert_reservation(&self, _reservation: Reservation) -> Result<String> {
            Err(anyhow!("unreachable"))
        }

        async fn list_reservations(&self) -> Result<Vec<Reservation>> {
            Err(anyhow!("unreachable"))
        }

        async fn ping(&self) -> Result<()> {
            Err(anyhow!("unreachable"))
        }
    }

    #[tokio::test]
    async fn healthy_store_reports_ok() -> Result<()> {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let response = health(Method::GET, Extension(store)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .get("X-App")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.starts_with(env!("CARGO_PKG_NAME")))
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body: Health = serde_json::from_slice(&bytes)?;
        assert_eq!(body.database, "ok");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_store_is_service_unavailable() {
        let store: SharedStore = Arc::new(Unreachable);
        let response = health(Method::GET, Extension(store)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn options_has_empty_body() -> Result<()> {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let response = health(Method::OPTIONS, Extension(store)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        assert!(bytes.is_empty());
        Ok(())
    }
}
