use crate::{
    api::{self, handlers::pages::Pages},
    store::MongoStore,
};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Pages are looked up relative to the working directory.
pub const PAGES_DIR: &str = "static";

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: SecretString,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the connection string is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    info!("Database: {}", redact_dsn(args.dsn.expose_secret()));

    let store = MongoStore::connect(args.dsn.expose_secret()).await?;

    // Report only, an unreachable server is not fatal
    store.check().await;

    api::new(args.port, Arc::new(store), Pages::new(PAGES_DIR)).await
}

/// Mask credentials in a connection string before it is logged.
fn redact_dsn(dsn: &str) -> String {
    if let Ok(mut url) = Url::parse(dsn) {
        if url.password().is_some() {
            let _ = url.set_password(Some("****"));
        }
        return url.to_string();
    }

    // Seed lists (`host1:27017,host2:27017`) are not valid URLs
    match (dsn.find("://"), dsn.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}****{}", &dsn[..scheme_end + 3], &dsn[at..])
        }
        _ => dsn.to_string(),
    }
}
