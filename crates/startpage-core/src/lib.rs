//! Core types and traits for the Startpage dashboard.
//!
//! This crate provides the card model, input validation, the reorder
//! validator and the contracts shared by the storage backends, the
//! dashboard service and the HTTP gateway.

pub mod card;
pub mod dashboard;
pub mod error;
pub mod reorder;
pub mod repository;

pub use card::{Card, CardId, NewCard, MAX_TITLE_LENGTH, MAX_URL_LENGTH};
pub use dashboard::{CardInput, Dashboard};
pub use error::{CardError, DashboardError, StorageError};
pub use reorder::{validate_reorder, ReorderRejection};
pub use repository::CardRepository;
