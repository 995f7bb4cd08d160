use startpage_core::CardId;
use tracing::{info, warn};

use crate::controller::{Direction, OrderController, SyncCommand};
use crate::error::ClientError;
use crate::transport::ReorderTransport;

/// How a command chain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing was sent.
    Unchanged,
    /// The server accepted the visible order.
    Saved,
    /// The server refused or could not be reached; the view was replaced
    /// with the authoritative order.
    Reloaded,
}

/// Runs an [`OrderController`]'s commands against a transport until the
/// chain settles.
pub struct OrderSync<T> {
    controller: OrderController,
    transport: T,
}

impl<T: ReorderTransport> OrderSync<T> {
    pub fn new(transport: T, order: Vec<CardId>) -> Self {
        Self {
            controller: OrderController::new(order),
            transport,
        }
    }

    /// Starts from the server's current order.
    pub async fn connect(transport: T) -> Result<Self, ClientError> {
        let order = transport.fetch_order().await?;
        Ok(Self::new(transport, order))
    }

    pub fn controller(&self) -> &OrderController {
        &self.controller
    }

    /// For gestures that do not commit on their own (drag start/over/end).
    pub fn controller_mut(&mut self) -> &mut OrderController {
        &mut self.controller
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn drop_card(&mut self) -> Result<SyncOutcome, ClientError> {
        let command = self.controller.drop_card();
        self.run(command).await
    }

    pub async fn move_card(
        &mut self,
        id: CardId,
        direction: Direction,
    ) -> Result<SyncOutcome, ClientError> {
        let command = self.controller.move_card(id, direction)?;
        self.run(command).await
    }

    /// Executes `command` and whatever follow-up the controller asks for.
    ///
    /// A failed submission is never retried: the order is reloaded instead.
    /// An error is returned only when the reload itself fails, in which case
    /// the controller stays in the reloading state and [`SyncCommand::Reload`]
    /// can be run again.
    pub async fn run(&mut self, mut command: SyncCommand) -> Result<SyncOutcome, ClientError> {
        let mut outcome = SyncOutcome::Unchanged;
        loop {
            command = match command {
                SyncCommand::None => return Ok(outcome),
                SyncCommand::Submit(order) => match self.transport.submit(&order).await {
                    Ok(()) => {
                        info!(count = order.len(), "card order saved");
                        outcome = SyncOutcome::Saved;
                        self.controller.submit_succeeded()
                    }
                    Err(e) => {
                        warn!(error = %e, "card order rejected, reloading");
                        self.controller.submit_failed()
                    }
                },
                SyncCommand::Reload => {
                    let order = self.transport.fetch_order().await?;
                    self.controller.reloaded(order);
                    return Ok(SyncOutcome::Reloaded);
                }
            };
        }
    }
}
