use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};
use facility_service::{
    DeletedFacility, FacilityPatch, FacilityWithSupplier, Mutation as MutationCore, NewFacility,
    Query as QueryCore,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{ApiError, Deleted, Envelope, StatusPolicy};

#[derive(Clone)]
pub struct AppState {
    pub conn: Arc<DatabaseConnection>,
    pub status: StatusPolicy,
}

#[derive(Debug, Serialize)]
pub struct Facilities {
    pub facilities: Vec<FacilityWithSupplier>,
}

#[derive(Debug, Serialize)]
pub struct One<T> {
    pub facility: T,
}

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

/// The facility resource, nested under `mount` (empty for the root).
pub fn router(state: AppState, mount: &str) -> Router {
    let facilities = Router::new()
        .route("/", get(list_facilities).post(create_facility))
        .route(
            "/{id}",
            get(get_facility)
                .put(update_facility)
                .delete(delete_facility),
        );

    let app = if mount.is_empty() {
        facilities
    } else {
        Router::new().nest(mount, facilities)
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn list_facilities(state: State<AppState>) -> ApiResult<Facilities> {
    let facilities = QueryCore::list_facilities(&state.conn)
        .await
        .map_err(|err| ApiError::from_facility("get", state.status, err))?;

    Ok(Json(Envelope::ok(Some("get"), Facilities { facilities })))
}

async fn get_facility(
    state: State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<One<FacilityWithSupplier>> {
    let facility = QueryCore::find_facility_by_id(&state.conn, &id)
        .await
        .map_err(|err| ApiError::from_facility("get", state.status, err))?;

    Ok(Json(Envelope::ok(Some("get"), One { facility })))
}

async fn create_facility(
    state: State<AppState>,
    payload: Result<Json<NewFacility>, JsonRejection>,
) -> ApiResult<One<entity::facility::Model>> {
    let Json(form) = payload.map_err(|rejection| ApiError::from_rejection("post", rejection))?;

    let facility = MutationCore::create_facility(&state.conn, form)
        .await
        .map_err(|err| ApiError::from_facility("post", state.status, err))?;

    info!(id = %facility.id, "facility created");
    Ok(Json(Envelope::ok(None, One { facility })))
}

async fn update_facility(
    state: State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<FacilityPatch>, JsonRejection>,
) -> ApiResult<One<entity::facility::Model>> {
    let Json(patch) = payload.map_err(|rejection| ApiError::from_rejection("put", rejection))?;

    let facility = MutationCore::update_facility(&state.conn, &id, patch)
        .await
        .map_err(|err| ApiError::from_facility("put", state.status, err))?;

    Ok(Json(Envelope::ok(Some("put"), One { facility })))
}

async fn delete_facility(state: State<AppState>, Path(id): Path<String>) -> ApiResult<Deleted> {
    let DeletedFacility {
        id,
        food_facilities,
    } = MutationCore::delete_facility(&state.conn, &id)
        .await
        .map_err(|err| ApiError::from_facility("delete", state.status, err))?;

    info!(%id, food_facilities, "facility deleted");
    Ok(Json(Envelope::ok(Some("delete"), Deleted {})))
}
