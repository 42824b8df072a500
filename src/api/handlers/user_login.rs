use crate::{
    api::handlers::{ApiError, Envelope},
    password,
    store::SharedStore,
};
use anyhow::anyhow;
use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

const LOGIN_ERROR: &str = "Error occurred during login";
pub const LOGIN_SUCCESSFUL: &str = "Login successful!";

#[derive(ToSchema, Deserialize)]
pub struct UserLogin {
    username: Option<String>,
    #[schema(format = Password)]
    password: Option<String>,
}

impl fmt::Debug for UserLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserLogin")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[utoipa::path(
    post,
    path= "/login-form",
    request_body = UserLogin,
    responses (
        (status = 200, description = "Login successful", body = Envelope, content_type = "application/json"),
        (status = 400, description = "Invalid credentials, unknown user and wrong password look the same", body = Envelope),
        (status = 500, description = "Unexpected error, unreadable body or missing field, message carries the error text", body = Envelope),
    ),
    tag= "accounts"
)]
// axum handler for login
#[instrument(skip_all)]
pub async fn login(
    store: Extension<SharedStore>,
    payload: Result<Json<UserLogin>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let Json(credentials) = payload.map_err(|e| ApiError::internal(LOGIN_ERROR, e))?;

    debug!("login: {:?}", credentials);

    let username = credentials
        .username
        .ok_or_else(|| ApiError::internal(LOGIN_ERROR, anyhow!("missing field `username`")))?;
    let plaintext = credentials
        .password
        .ok_or_else(|| ApiError::internal(LOGIN_ERROR, anyhow!("missing field `password`")))?;

    let Some(user) = store
        .find_user_by_username(&username)
        .await
        .map_err(|e| ApiError::internal(LOGIN_ERROR, e))?
    else {
        debug!(%username, "Unknown user");
        return Err(ApiError::InvalidCredentials);
    };

    let matches = tokio::task::spawn_blocking(move || password::verify(&user.password, &plaintext))
        .await
        .map_err(|e| ApiError::internal(LOGIN_ERROR, e))?
        .map_err(|e| ApiError::internal(LOGIN_ERROR, e))?;

    if !matches {
        debug!(%username, "Password mismatch");
        return Err(ApiError::InvalidCredentials);
    }

    info!(%username, "Login successful");

    Ok(Json(Envelope::ok(LOGIN_SUCCESSFUL)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::INVALID_CREDENTIALS;
    use crate::store::{MemoryStore, Store, UserRecord};
    use anyhow::Result;
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn payload(value: Value) -> Result<Result<Json<UserLogin>, JsonRejection>> {
        Ok(Ok(Json(serde_json::from_value(value)?)))
    }

    async fn store_with_alice() -> Result<SharedStore> {
        let store: SharedStore = Arc::new(MemoryStore::new());
        store
            .insert_user(UserRecord {
                fullname: "Alice Doe".to_string(),
                username: "alice".to_string(),
                email: None,
                password: password::hash("hunter2")?,
                gender: None,
            })
            .await?;
        Ok(store)
    }

    async fn failure_message(store: SharedStore, body: Value) -> Result<(StatusCode, Value)> {
        let response = login(Extension(store), payload(body)?).await.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, serde_json::from_slice(&bytes)?))
    }

    #[tokio::test]
    async fn login_with_correct_password() -> Result<()> {
        let response = login(
            Extension(store_with_alice().await?),
            payload(json!({"username": "alice", "password": "hunter2"}))?,
        )
        .await;

        let Ok(Json(body)) = response else {
            panic!("login failed: {response:?}");
        };
        assert_eq!(body, Envelope::ok(LOGIN_SUCCESSFUL));
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() -> Result<()> {
        let store = store_with_alice().await?;

        let wrong_password = failure_message(
            store.clone(),
            json!({"username": "alice", "password": "hunter3"}),
        )
        .await?;
        let unknown_user =
            failure_message(store, json!({"username": "bob", "password": "hunter2"})).await?;

        assert_eq!(wrong_password, unknown_user);
        assert_eq!(wrong_password.0, StatusCode::BAD_REQUEST);
        assert_eq!(
            wrong_password.1,
            json!({"success": false, "message": INVALID_CREDENTIALS})
        );
        Ok(())
    }

    #[tokio::test]
    async fn login_without_a_field_is_internal_error() -> Result<()> {
        let store = store_with_alice().await?;

        let (status, body) = failure_message(store.clone(), json!({"username": "alice"})).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"success": false, "message": "Error occurred during login: missing field `password`"})
        );

        let (status, body) = failure_message(store, json!({"password": "x"})).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"success": false, "message": "Error occurred during login: missing field `username`"})
        );
        Ok(())
    }

    #[tokio::test]
    async fn empty_username_is_invalid_credentials() -> Result<()> {
        let response = login(
            Extension(store_with_alice().await?),
            payload(json!({"username": "", "password": "hunter2"}))?,
        )
        .await;
        assert!(matches!(response, Err(ApiError::InvalidCredentials)));
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_stored_hash_is_internal_error() -> Result<()> {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_user(UserRecord {
                fullname: "Eve".to_string(),
                username: "eve".to_string(),
                email: None,
                password: "plaintext-by-mistake".to_string(),
                gender: None,
            })
            .await?;

        let response = login(
            Extension(store as SharedStore),
            payload(json!({"username": "eve", "password": "x"}))?,
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        Ok(())
    }
}
