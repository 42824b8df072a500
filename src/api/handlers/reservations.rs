use crate::{
    api::handlers::{ApiError, Envelope, is_blank},
    store::{Reservation, SharedStore},
};
use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
};
use serde_json::Value;
use tracing::{debug, info, instrument};

const RESERVATION_ERROR: &str = "Error occurred during reservation";
const FETCH_ERROR: &str = "Error occurred while fetching reservations";
pub const RESERVATION_CREATED: &str = "Reservation created successfully!";

/// Fields every reservation must carry, in the order they are reported.
pub const REQUIRED_FIELDS: [&str; 6] = ["name", "email", "date", "time", "guests", "occasion"];

/// Required fields that are absent or empty.
#[must_use]
pub fn missing_fields(reservation: &Reservation) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .into_iter()
        .filter(|field| is_blank(reservation.get(*field)))
        .collect()
}

#[utoipa::path(
    post,
    path= "/submit_reservation",
    description = "Store a reservation. `name`, `email`, `date`, `time`, `guests` and `occasion` are required; any other field is stored as sent.",
    responses (
        (status = 200, description = "Reservation stored", body = Envelope, content_type = "application/json"),
        (status = 400, description = "Missing required fields, listed in the message", body = Envelope),
        (status = 500, description = "Unexpected error or body that is not a JSON object, message carries the error text", body = Envelope),
    ),
    tag= "reservations"
)]
// axum handler for submit_reservation
#[instrument(skip_all)]
pub async fn submit_reservation(
    store: Extension<SharedStore>,
    payload: Result<Json<Reservation>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let Json(reservation) = payload.map_err(|e| ApiError::internal(RESERVATION_ERROR, e))?;

    debug!(?reservation, "Reservation received");

    let missing = missing_fields(&reservation);
    if !missing.is_empty() {
        return Err(ApiError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let id = store
        .insert_reservation(reservation)
        .await
        .map_err(|e| ApiError::internal(RESERVATION_ERROR, e))?;

    info!(%id, "Reservation saved");

    Ok(Json(Envelope::ok(RESERVATION_CREATED)))
}

#[utoipa::path(
    get,
    path= "/get_reservations",
    responses (
        (status = 200, description = "Every reservation in insertion order, `_id` as a string", body = Envelope, content_type = "application/json"),
        (status = 500, description = "Unexpected error, message carries the error text", body = Envelope),
    ),
    tag= "reservations"
)]
// axum handler for get_reservations
#[instrument(skip_all)]
pub async fn get_reservations(store: Extension<SharedStore>) -> Result<Json<Envelope>, ApiError> {
    let reservations = store
        .list_reservations()
        .await
        .map_err(|e| ApiError::internal(FETCH_ERROR, e))?;

    debug!(count = reservations.len(), "Reservations fetched");

    Ok(Json(Envelope::with_reservations(
        reservations.into_iter().map(Value::Object).collect(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use anyhow::Result;
    use serde_json::json;
    use std::sync::Arc;

    fn reservation(value: Value) -> Reservation {
        match value {
            Value::Object(map) => map,
            _ => Reservation::new(),
        }
    }

    fn complete() -> Reservation {
        reservation(json!({
            "name": "Alice",
            "email": "a@x.com",
            "date": "2024-01-01",
            "time": "19:00",
            "guests": 2,
            "occasion": "birthday",
        }))
    }

    #[test]
    fn complete_reservation_has_no_missing_fields() {
        assert!(missing_fields(&complete()).is_empty());
    }

    #[test]
    fn missing_fields_keep_declaration_order() {
        let mut input = complete();
        input.remove("occasion");
        input.insert("guests".to_string(), json!(""));
        assert_eq!(missing_fields(&input), vec!["guests", "occasion"]);

        assert_eq!(missing_fields(&Reservation::new()), REQUIRED_FIELDS.to_vec());
    }

    #[test]
    fn zero_guests_counts_as_missing() {
        let mut input = complete();
        input.insert("guests".to_string(), json!(0));
        assert_eq!(missing_fields(&input), vec!["guests"]);
    }

    #[tokio::test]
    async fn submit_then_list() -> Result<()> {
        let memory = Arc::new(MemoryStore::new());
        let store = memory.clone() as SharedStore;

        let mut input = complete();
        input.insert("notes".to_string(), json!("window seat"));

        let response = submit_reservation(Extension(store.clone()), Ok(Json(input))).await;
        let Ok(Json(body)) = response else {
            panic!("submit failed: {response:?}");
        };
        assert_eq!(body, Envelope::ok(RESERVATION_CREATED));
        assert_eq!(memory.reservation_count().await, 1);

        let response = get_reservations(Extension(store)).await;
        let Ok(Json(body)) = response else {
            panic!("list failed: {response:?}");
        };
        let listed = body.reservations.unwrap_or_default();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["name"], "Alice");
        assert_eq!(listed[0]["notes"], "window seat");
        assert!(listed[0]["_id"].is_string());
        Ok(())
    }

    #[tokio::test]
    async fn incomplete_reservation_is_not_stored() -> Result<()> {
        let memory = Arc::new(MemoryStore::new());
        let mut input = complete();
        input.remove("guests");
        input.remove("occasion");

        let response = submit_reservation(Extension(memory.clone() as SharedStore), Ok(Json(input))).await;

        assert!(matches!(
            response,
            Err(ApiError::Validation(ref m)) if m == "Missing required fields: guests, occasion"
        ));
        assert_eq!(memory.reservation_count().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn empty_store_lists_empty_array() -> Result<()> {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let response = get_reservations(Extension(store)).await;
        let Ok(Json(body)) = response else {
            panic!("list failed: {response:?}");
        };
        assert_eq!(serde_json::to_value(body)?, json!({"success": true, "reservations": []}));
        Ok(())
    }
}
