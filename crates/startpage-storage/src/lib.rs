//! Card storage backends.
//!
//! [`SqliteCardRepository`] is the durable store used in production;
//! [`InMemoryCardRepository`] backs tests and throwaway instances.

mod error;
pub mod memory;
pub mod sqlite;

pub use memory::InMemoryCardRepository;
pub use sqlite::SqliteCardRepository;
pub use startpage_core::{CardRepository, StorageError};
