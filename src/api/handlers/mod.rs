pub mod health;
pub use self::health::health;

pub mod pages;

pub mod user_signup;
pub use self::user_signup::signup;

pub mod user_login;
pub use self::user_login::login;

pub mod reservations;
pub use self::reservations::{get_reservations, submit_reservation};

// common types for the handlers
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};
use utoipa::ToSchema;

/// Response body shared by every JSON endpoint.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub reservations: Option<Vec<Value>>,
}

impl Envelope {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            reservations: None,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            reservations: None,
        }
    }

    #[must_use]
    pub fn with_reservations(reservations: Vec<Value>) -> Self {
        Self {
            success: true,
            message: None,
            reservations: Some(reservations),
        }
    }
}

/// Everything a handler can fail with. Status codes are decided here and
/// nowhere else.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or empty input.
    Validation(String),
    /// The resource already exists.
    Conflict(String),
    /// Bad username/password pair. Deliberately carries no detail.
    InvalidCredentials,
    /// Store, hasher or runtime failure, or a body that cannot be read.
    /// `context` prefixes the error text.
    Internal {
        context: &'static str,
        source: anyhow::Error,
    },
}

pub const INVALID_CREDENTIALS: &str = "Invalid credentials!";

impl ApiError {
    pub fn internal(context: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            context,
            source: source.into(),
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) | Self::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Validation(message) | Self::Conflict(message) => message.clone(),
            Self::InvalidCredentials => INVALID_CREDENTIALS.to_string(),
            Self::Internal { context, source } => format!("{context}: {source:#}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        match &self {
            Self::Internal { source, .. } => error!("{message}\n{source:?}"),
            _ => debug!("{message}"),
        }

        (status, Json(Envelope::failure(message))).into_response()
    }
}

/// Presence check: absent, `null`, `false`, `0`, `""`, `[]` and `{}` all count
/// as not provided.
#[must_use]
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
    }
}
