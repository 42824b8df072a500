//! Persistence for users and reservations.

pub mod memory;
pub mod mongo;

pub use self::memory::MemoryStore;
pub use self::mongo::MongoStore;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

pub const USERS: &str = "users";
pub const RESERVATIONS: &str = "reservations";

/// Field holding the store identifier of a document.
pub const ID_FIELD: &str = "_id";

/// A registered account. `password` is a PHC hash, never the plaintext.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub fullname: String,
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    pub gender: Option<String>,
}

/// A reservation exactly as submitted. Extra fields pass through untouched.
pub type Reservation = Map<String, Value>;

#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(&self, user: UserRecord) -> Result<()>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>>;

    /// Insert a reservation and return its identifier as a string.
    async fn insert_reservation(&self, reservation: Reservation) -> Result<String>;

    /// All reservations in insertion order, each with a string `_id`.
    async fn list_reservations(&self) -> Result<Vec<Reservation>>;

    async fn ping(&self) -> Result<()>;
}

pub type SharedStore = Arc<dyn Store>;
