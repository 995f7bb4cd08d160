//! Client side of the card ordering protocol.
//!
//! [`OrderController`] is a pure state machine that turns drag and keyboard
//! gestures into complete candidate orders. [`OrderSync`] executes the
//! commands it emits against a [`ReorderTransport`], and [`HttpTransport`]
//! is the transport that talks to the gateway.

pub mod controller;
pub mod error;
pub mod sync;
pub mod transport;

pub use controller::{
    ControllerState, Direction, DropPlacement, OrderController, SyncCommand, TargetBounds,
};
pub use error::{ClientError, ControllerError};
pub use sync::{OrderSync, SyncOutcome};
pub use transport::{HttpTransport, ReorderTransport};
