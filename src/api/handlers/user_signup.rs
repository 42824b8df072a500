use crate::{
    api::handlers::{ApiError, Envelope},
    password,
    store::{SharedStore, UserRecord},
};
use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

const SIGNUP_ERROR: &str = "Error occurred during signup";
pub const FIELDS_REQUIRED: &str = "Please provide all required fields";
pub const USERNAME_TAKEN: &str = "Username already exists!";
pub const USER_CREATED: &str = "User created successfully!";

#[derive(ToSchema, Deserialize)]
pub struct UserSignup {
    username: Option<String>,
    #[schema(format = Password)]
    password: Option<String>,
    fullname: Option<String>,
    email: Option<String>,
    gender: Option<String>,
}

impl fmt::Debug for UserSignup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserSignup")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("fullname", &self.fullname)
            .field("email", &self.email)
            .field("gender", &self.gender)
            .finish()
    }
}

#[utoipa::path(
    post,
    path= "/signup-form",
    request_body = UserSignup,
    responses (
        (status = 200, description = "User created", body = Envelope, content_type = "application/json"),
        (status = 400, description = "Missing required fields or username already exists", body = Envelope),
        (status = 500, description = "Unexpected error or unreadable body, message carries the error text", body = Envelope),
    ),
    tag= "accounts"
)]
// axum handler for signup
#[instrument(skip_all)]
pub async fn signup(
    store: Extension<SharedStore>,
    payload: Result<Json<UserSignup>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let Json(user) = payload.map_err(|e| ApiError::internal(SIGNUP_ERROR, e))?;

    debug!("signup: {:?}", user);

    let (Some(username), Some(plaintext), Some(fullname)) = (
        required(user.username),
        required(user.password),
        required(user.fullname),
    ) else {
        return Err(ApiError::Validation(FIELDS_REQUIRED.to_string()));
    };

    // check-then-insert, two concurrent signups may both pass
    let existing = store
        .find_user_by_username(&username)
        .await
        .map_err(|e| ApiError::internal(SIGNUP_ERROR, e))?;

    if existing.is_some() {
        return Err(ApiError::Conflict(USERNAME_TAKEN.to_string()));
    }

    let hashed = tokio::task::spawn_blocking(move || password::hash(&plaintext))
        .await
        .map_err(|e| ApiError::internal(SIGNUP_ERROR, e))?
        .map_err(|e| ApiError::internal(SIGNUP_ERROR, e))?;

    let record = UserRecord {
        fullname,
        username,
        email: user.email,
        password: hashed,
        gender: user.gender,
    };
    let username = record.username.clone();

    store
        .insert_user(record)
        .await
        .map_err(|e| ApiError::internal(SIGNUP_ERROR, e))?;

    info!(%username, "User created");

    Ok(Json(Envelope::ok(USER_CREATED)))
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
