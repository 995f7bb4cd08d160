mod cards;
mod health;

pub use cards::{
    create_card_handler, delete_card_handler, list_cards_handler, reorder_cards_handler,
    update_card_handler,
};
pub use health::health_handler;
