use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_card_handler, delete_card_handler, health_handler, list_cards_handler,
    reorder_cards_handler, update_card_handler,
};
use crate::state::AppState;
use crate::token::require_request_token;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        let cards = Router::new()
            .route("/cards", get(list_cards_handler).post(create_card_handler))
            .route("/cards/reorder", post(reorder_cards_handler))
            .route(
                "/cards/{id}",
                put(update_card_handler).delete(delete_card_handler),
            )
            .route_layer(from_fn_with_state(state.clone(), require_request_token));

        Router::new()
            .route("/health", get(health_handler))
            .merge(cards)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
