//! The three static HTML pages.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::path::{Path, PathBuf};
use tracing::error;

/// Directory the pages are read from on every request.
#[derive(Clone, Debug)]
pub struct Pages {
    dir: PathBuf,
}

impl Pages {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn render(&self, name: &str) -> Response {
        let path = self.dir.join(name);

        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Html(body).into_response(),
            Err(e) => {
                error!("Failed to read {}: {e}", path.display());

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to read {name}"),
                )
                    .into_response()
            }
        }
    }
}

pub async fn index(pages: Extension<Pages>) -> Response {
    pages.render("index.html").await
}

pub async fn login_form(pages: Extension<Pages>) -> Response {
    pages.render("loginform.html").await
}

pub async fn reservations(pages: Extension<Pages>) -> Response {
    pages.render("reservations.html").await
}
