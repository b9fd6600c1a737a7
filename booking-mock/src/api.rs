use crate::error::MockError;
use crate::state::MockState;
use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use shared::{GuestCount, ReservationCreated, ReservationRequest, TimeSlot};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Debug, Deserialize)]
pub struct TimeSlotQuery {
    guests: Option<u32>,
}

async fn time_slots(
    State(state): State<Arc<MockState>>,
    query: Result<Query<TimeSlotQuery>, QueryRejection>,
) -> Result<Json<Vec<TimeSlot>>, MockError> {
    let Query(query) = query?;
    let guests = query
        .guests
        .ok_or_else(|| MockError::InvalidRequest("missing guests".into()))
        .and_then(|n| GuestCount::new(n).map_err(|e| MockError::InvalidRequest(e.to_string())))?;

    let slots = state.time_slots(guests).await?;
    tracing::debug!(guests = guests.get(), count = slots.len(), "Time slots served");
    Ok(Json(slots))
}

async fn create_reservation(
    State(state): State<Arc<MockState>>,
    body: Result<Json<ReservationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ReservationCreated>), MockError> {
    let Json(req) = body?;
    let created = state.reserve(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_reservations(State(state): State<Arc<MockState>>) -> Json<Vec<ReservationCreated>> {
    Json(state.reservations().await)
}

/// Mock reservation API mounted under `/api`
pub fn router(state: Arc<MockState>) -> Router {
    let api = Router::new()
        .route("/timeslots", get(time_slots))
        .route(
            "/reservations",
            get(list_reservations).post(create_reservation),
        )
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
