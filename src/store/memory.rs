use super::{ID_FIELD, Reservation, Store, UserRecord};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use ulid::Ulid;

/// In-process store. Data lives as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<UserRecord>>,
    reservations: RwLock<Vec<Reservation>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn reservation_count(&self) -> usize {
        self.reservations.read().await.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: UserRecord) -> Result<()> {
        self.users.write().await.push(user);
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn insert_reservation(&self, mut reservation: Reservation) -> Result<String> {
        // Keep a caller-supplied id, like a document store would.
        let id = match reservation.get(ID_FIELD) {
            Some(Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
            None => Ulid::new().to_string(),
        };
        reservation.insert(ID_FIELD.to_string(), Value::String(id.clone()));

        self.reservations.write().await.push(reservation);

        Ok(id)
    }

    async fn list_reservations(&self) -> Result<Vec<Reservation>> {
        Ok(self.reservations.read().await.clone())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
