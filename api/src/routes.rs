use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use roster_core::filter::PlayerFilter;
use roster_core::types::{CreatePlayerRequest, PlayerResponse, UpdatePlayerRequest};

use crate::error::ApiError;
use crate::service::PlayerService;

pub type AppState = Arc<PlayerService>;

/// Builds the player routes, served at `/players` and mirrored under `/rest/players`.
pub fn router(service: AppState) -> Router {
    let players = Router::new()
        .route("/players", get(list_players).post(create_player))
        .route("/players/count", get(count_players))
        .route(
            "/players/{id}",
            get(get_player).post(update_player).delete(delete_player),
        );

    Router::new()
        .merge(players.clone())
        .nest("/rest", players)
        .with_state(service)
}

fn body_or_bad_request<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Counts players matching the query-string filters. Pagination parameters are ignored.
pub(crate) async fn count_players(
    State(service): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<usize>, ApiError> {
    let filter = PlayerFilter::from_query_pairs(params);
    service.count(&filter).await.map(Json)
}

/// Lists one page of players matching the query-string filters.
pub(crate) async fn list_players(
    State(service): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<PlayerResponse>>, ApiError> {
    let filter = PlayerFilter::from_query_pairs(params);
    service.list(&filter).await.map(Json)
}

pub(crate) async fn get_player(
    State(service): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PlayerResponse>, ApiError> {
    service.get_by_id(id).await.map(Json)
}

/// Creates a player from a full payload.
///
/// # Returns
/// * `(200, PlayerResponse)` with the assigned id and derived level fields.
/// * `400` when the body is malformed or a field is missing or out of range.
/// * `500` on store failures.
pub(crate) async fn create_player(
    State(service): State<AppState>,
    payload: Result<Json<CreatePlayerRequest>, JsonRejection>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let request = body_or_bad_request(payload)?;
    service.create(&request).await.map(Json)
}

/// Updates the supplied fields of player `id`.
///
/// # Returns
/// * `(200, PlayerResponse)` with the updated record.
/// * `400` for a non-positive id, a malformed body or an invalid field.
/// * `404` when the player does not exist.
/// * `500` on store failures.
pub(crate) async fn update_player(
    State(service): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdatePlayerRequest>, JsonRejection>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let request = body_or_bad_request(payload)?;
    service.update(id, &request).await.map(Json)
}

pub(crate) async fn delete_player(
    State(service): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    service.delete_by_id(id).await?;
    Ok(StatusCode::OK)
}
