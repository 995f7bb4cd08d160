//! Dashboard service implementation.
//!
//! This crate wires a [`CardRepository`](startpage_core::CardRepository)
//! into the [`Dashboard`](startpage_core::Dashboard) contract used by the
//! HTTP gateway. Core types are re-exported from `startpage_core`.

pub mod service;

pub use service::DashboardService;
pub use startpage_core::{CardInput, Dashboard, DashboardError};
