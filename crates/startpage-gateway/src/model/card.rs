use serde::{Deserialize, Serialize};
use startpage_core::{Card, CardId};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderCardsRequest {
    pub card_ids: Vec<CardId>,
}

#[derive(Debug, Serialize)]
pub struct ReorderCardsResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardListResponse {
    pub cards: Vec<Card>,
    /// Token the client must echo in the request token header on mutations.
    pub request_token: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteCardResponse {
    pub deleted: bool,
}
