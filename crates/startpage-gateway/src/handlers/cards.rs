use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use startpage_core::{Card, CardId, CardInput};
use tracing::info;

use crate::error::Result;
use crate::model::{CardListResponse, DeleteCardResponse, ReorderCardsRequest, ReorderCardsResponse};
use crate::state::AppState;

pub async fn list_cards_handler(State(state): State<AppState>) -> Result<Json<CardListResponse>> {
    let cards = state.dashboard().cards().await?;
    Ok(Json(CardListResponse {
        cards,
        request_token: state.request_token().as_str().to_string(),
    }))
}

pub async fn create_card_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CardInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Card>)> {
    let Json(input) = payload?;
    let card = state.dashboard().create_card(input).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

pub async fn update_card_handler(
    State(state): State<AppState>,
    id: std::result::Result<Path<CardId>, PathRejection>,
    payload: std::result::Result<Json<CardInput>, JsonRejection>,
) -> Result<Json<Card>> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let card = state.dashboard().update_card(id, input).await?;
    Ok(Json(card))
}

pub async fn delete_card_handler(
    State(state): State<AppState>,
    id: std::result::Result<Path<CardId>, PathRejection>,
) -> Result<Json<DeleteCardResponse>> {
    let Path(id) = id?;
    let deleted = state.dashboard().delete_card(id).await?;
    Ok(Json(DeleteCardResponse { deleted }))
}

/// Persists a full new ordering. Anything short of an exact permutation of
/// the stored ids is rejected with 400 and nothing is written.
pub async fn reorder_cards_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ReorderCardsRequest>, JsonRejection>,
) -> Result<Json<ReorderCardsResponse>> {
    let Json(request) = payload?;
    state.dashboard().reorder(&request.card_ids).await?;
    info!(count = request.card_ids.len(), "order saved");
    Ok(Json(ReorderCardsResponse { success: true }))
}
