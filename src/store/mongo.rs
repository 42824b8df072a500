//! MongoDB backend.

use super::{ID_FIELD, RESERVATIONS, Reservation, Store, USERS, UserRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::{self, Bson, Document, doc},
};
use serde_json::Value;
use tracing::{Instrument, error, info, info_span, instrument};

/// Used when the connection string does not name a database.
pub const DEFAULT_DATABASE: &str = "espresso";

#[derive(Clone, Debug)]
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Build a client for `dsn`. No round trip happens here; the driver
    /// connects lazily on the first operation.
    ///
    /// # Errors
    /// Returns an error if the connection string cannot be parsed or resolved.
    pub async fn connect(dsn: &str) -> Result<Self> {
        let client = Client::with_uri_str(dsn)
            .await
            .context("Invalid MongoDB connection string")?;

        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));

        Ok(Self { client, database })
    }

    #[must_use]
    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    /// Report whether the server answers and the database already exists.
    /// Never fails: an unreachable server is logged and requests will surface
    /// the error later.
    pub async fn check(&self) {
        let name = self.database_name();

        match self.database_exists().await {
            Ok(true) => info!("Connected to MongoDB. Using database: '{name}'"),
            Ok(false) => info!(
                "Database '{name}' does not exist. It will be created upon the first insert operation."
            ),
            Err(e) => error!("Failed to connect to MongoDB: {e:#}"),
        }
    }

    async fn database_exists(&self) -> Result<bool> {
        self.ping().await?;

        let names = self
            .client
            .list_database_names()
            .await
            .context("Failed to list databases")?;

        Ok(names.iter().any(|name| name == self.database_name()))
    }

    fn users(&self) -> Collection<UserRecord> {
        self.database.collection(USERS)
    }

    fn reservations(&self) -> Collection<Document> {
        self.database.collection(RESERVATIONS)
    }
}

#[async_trait]
impl Store for MongoStore {
    #[instrument(skip_all, fields(username = %user.username))]
    async fn insert_user(&self, user: UserRecord) -> Result<()> {
        self.users()
            .insert_one(user)
            .into_future()
            .instrument(info_span!("db.insert", db.system = "mongodb", db.collection = USERS))
            .await
            .context("Failed to insert user")?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        self.users()
            .find_one(doc! { "username": username })
            .into_future()
            .instrument(info_span!("db.find", db.system = "mongodb", db.collection = USERS))
            .await
            .context("Failed to look up user")
    }

    #[instrument(skip_all)]
    async fn insert_reservation(&self, reservation: Reservation) -> Result<String> {
        let document = reservation_to_document(&reservation)?;

        let result = self
            .reservations()
            .insert_one(document)
            .into_future()
            .instrument(info_span!(
                "db.insert",
                db.system = "mongodb",
                db.collection = RESERVATIONS
            ))
            .await
            .context("Failed to insert reservation")?;

        Ok(id_to_string(&result.inserted_id))
    }

    #[instrument(skip_all)]
    async fn list_reservations(&self) -> Result<Vec<Reservation>> {
        let documents = self
            .reservations()
            .find(doc! {})
            .await
            .context("Failed to query reservations")?
            .try_collect::<Vec<Document>>()
            .instrument(info_span!(
                "db.find",
                db.system = "mongodb",
                db.collection = RESERVATIONS
            ))
            .await
            .context("Failed to read reservations")?;

        Ok(documents.into_iter().map(document_to_reservation).collect())
    }

    async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB did not answer ping")?;

        Ok(())
    }
}

fn reservation_to_document(reservation: &Reservation) -> Result<Document> {
    bson::to_document(reservation).context("Reservation cannot be stored as a document")
}

/// Render a stored reservation as JSON with its `_id` as a plain string.
fn document_to_reservation(mut document: Document) -> Reservation {
    if let Some(id) = document.get_mut(ID_FIELD) {
        let rendered = id_to_string(id);
        *id = Bson::String(rendered);
    }

    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Reservation::new(),
    }
}

fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}
