use startpage_core::CardId;
use tracing::debug;

use crate::error::ControllerError;

/// Where the dragged card lands if dropped now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPlacement {
    Before(CardId),
    After(CardId),
    /// The empty area after the last card.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Vertical extent of the card under the pointer, in the same coordinate
/// space as the pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetBounds {
    pub top: f64,
    pub height: f64,
}

impl TargetBounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    fn placement(&self, target: CardId, pointer_y: f64) -> DropPlacement {
        if pointer_y < self.top + self.height / 2.0 {
            DropPlacement::Before(target)
        } else {
            DropPlacement::After(target)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Dragging,
    Submitting,
    Reloading,
}

/// What the caller must do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncCommand {
    /// Send this complete order to the server.
    Submit(Vec<CardId>),
    /// Throw away local state and fetch the authoritative order.
    Reload,
    None,
}

#[derive(Debug, Clone, Copy)]
struct Gesture {
    source: CardId,
    preview: Option<DropPlacement>,
}

/// State machine behind the drag and keyboard reordering UI.
///
/// `order` mirrors what is on screen. It is updated optimistically on every
/// committed gesture and only replaced wholesale by [`reloaded`].
///
/// At most one submission is in flight. A gesture committed while one is
/// pending marks the controller dirty; when the pending submission succeeds
/// the order is re-derived from the current view and submitted once more.
///
/// [`reloaded`]: OrderController::reloaded
#[derive(Debug, Clone)]
pub struct OrderController {
    order: Vec<CardId>,
    gesture: Option<Gesture>,
    in_flight: bool,
    dirty: bool,
    reloading: bool,
}

impl OrderController {
    pub fn new(order: Vec<CardId>) -> Self {
        Self {
            order,
            gesture: None,
            in_flight: false,
            dirty: false,
            reloading: false,
        }
    }

    /// The visible order.
    pub fn order(&self) -> &[CardId] {
        &self.order
    }

    pub fn preview(&self) -> Option<DropPlacement> {
        self.gesture.and_then(|g| g.preview)
    }

    pub fn state(&self) -> ControllerState {
        if self.reloading {
            ControllerState::Reloading
        } else if self.gesture.is_some() {
            ControllerState::Dragging
        } else if self.in_flight {
            ControllerState::Submitting
        } else {
            ControllerState::Idle
        }
    }

    /// Whether a submission has been issued and not yet resolved.
    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    fn ensure_movable(&self, id: CardId) -> Result<(), ControllerError> {
        if self.reloading {
            return Err(ControllerError::Reloading);
        }
        if !self.order.contains(&id) {
            return Err(ControllerError::UnknownCard(id));
        }
        Ok(())
    }

    pub fn drag_start(&mut self, id: CardId) -> Result<(), ControllerError> {
        self.ensure_movable(id)?;
        self.gesture = Some(Gesture {
            source: id,
            preview: None,
        });
        Ok(())
    }

    /// Updates the live preview while hovering `target`.
    ///
    /// Hovering the dragged card itself, or a card that is not visible,
    /// leaves the preview as it was.
    pub fn drag_over(
        &mut self,
        target: CardId,
        pointer_y: f64,
        bounds: TargetBounds,
    ) -> Option<DropPlacement> {
        let gesture = self.gesture.as_mut()?;
        if target != gesture.source && self.order.contains(&target) {
            gesture.preview = Some(bounds.placement(target, pointer_y));
        }
        gesture.preview
    }

    /// Hovering the trailing gap previews a drop at the end.
    pub fn drag_over_gap(&mut self) -> Option<DropPlacement> {
        let gesture = self.gesture.as_mut()?;
        gesture.preview = Some(DropPlacement::End);
        gesture.preview
    }

    /// Commits the gesture. The full visible order is submitted even when
    /// there was no preview and nothing moved.
    pub fn drop_card(&mut self) -> SyncCommand {
        let Some(gesture) = self.gesture.take() else {
            return SyncCommand::None;
        };
        if let Some(placement) = gesture.preview {
            self.place(gesture.source, placement);
        }
        self.request_submit()
    }

    /// Abandons the gesture without touching the order.
    pub fn drag_end(&mut self) {
        self.gesture = None;
    }

    /// Swaps `id` with its visible neighbour. Moving past either edge is a
    /// no-op and submits nothing.
    pub fn move_card(
        &mut self,
        id: CardId,
        direction: Direction,
    ) -> Result<SyncCommand, ControllerError> {
        self.ensure_movable(id)?;
        let Some(index) = self.order.iter().position(|&c| c == id) else {
            return Err(ControllerError::UnknownCard(id));
        };
        let neighbour = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1).filter(|&i| i < self.order.len()),
        };
        let Some(neighbour) = neighbour else {
            return Ok(SyncCommand::None);
        };

        self.order.swap(index, neighbour);
        Ok(self.request_submit())
    }

    pub fn submit_succeeded(&mut self) -> SyncCommand {
        if !self.in_flight {
            return SyncCommand::None;
        }
        self.in_flight = false;
        if std::mem::take(&mut self.dirty) {
            debug!("resubmitting order changed while a submission was pending");
            return self.request_submit();
        }
        SyncCommand::None
    }

    /// Any failure discards local changes, including a queued resubmission.
    pub fn submit_failed(&mut self) -> SyncCommand {
        self.in_flight = false;
        self.dirty = false;
        self.gesture = None;
        self.reloading = true;
        SyncCommand::Reload
    }

    /// Replaces the visible order with the server's.
    pub fn reloaded(&mut self, order: Vec<CardId>) {
        self.order = order;
        self.gesture = None;
        self.in_flight = false;
        self.dirty = false;
        self.reloading = false;
    }

    fn place(&mut self, source: CardId, placement: DropPlacement) {
        let Some(from) = self.order.iter().position(|&c| c == source) else {
            return;
        };
        let mut order = self.order.clone();
        order.remove(from);

        let to = match placement {
            DropPlacement::End => order.len(),
            DropPlacement::Before(target) | DropPlacement::After(target) => {
                let Some(at) = order.iter().position(|&c| c == target) else {
                    return;
                };
                match placement {
                    DropPlacement::After(_) => at + 1,
                    _ => at,
                }
            }
        };
        order.insert(to, source);
        self.order = order;
    }

    fn request_submit(&mut self) -> SyncCommand {
        if self.in_flight {
            self.dirty = true;
            return SyncCommand::None;
        }
        self.in_flight = true;
        SyncCommand::Submit(self.order.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[i64]) -> Vec<CardId> {
        values.iter().copied().map(CardId::new).collect()
    }

    fn id(value: i64) -> CardId {
        CardId::new(value)
    }

    const BOUNDS: TargetBounds = TargetBounds {
        top: 100.0,
        height: 40.0,
    };

    #[test]
    fn preview_follows_vertical_midpoint() {
        let mut controller = OrderController::new(ids(&[1, 2, 3]));
        controller.drag_start(id(1)).unwrap();

        assert_eq!(
            controller.drag_over(id(3), 110.0, BOUNDS),
            Some(DropPlacement::Before(id(3)))
        );
        assert_eq!(
            controller.drag_over(id(3), 120.0, BOUNDS),
            Some(DropPlacement::After(id(3)))
        );
        assert_eq!(controller.state(), ControllerState::Dragging);
        assert_eq!(controller.order(), ids(&[1, 2, 3]));
    }

    #[test]
    fn hovering_source_keeps_preview() {
        let mut controller = OrderController::new(ids(&[1, 2, 3]));
        controller.drag_start(id(2)).unwrap();
        controller.drag_over(id(3), 130.0, BOUNDS);

        assert_eq!(
            controller.drag_over(id(2), 101.0, BOUNDS),
            Some(DropPlacement::After(id(3)))
        );
    }

    #[test]
    fn drag_over_without_gesture_is_ignored() {
        let mut controller = OrderController::new(ids(&[1, 2]));
        assert_eq!(controller.drag_over(id(2), 0.0, BOUNDS), None);
        assert_eq!(controller.drag_over_gap(), None);
    }

    #[test]
    fn drop_submits_full_order() {
        let mut controller = OrderController::new(ids(&[1, 2, 3, 4]));
        controller.drag_start(id(1)).unwrap();
        controller.drag_over(id(3), 130.0, BOUNDS);

        assert_eq!(controller.drop_card(), SyncCommand::Submit(ids(&[2, 3, 1, 4])));
        assert_eq!(controller.state(), ControllerState::Submitting);
        assert_eq!(controller.preview(), None);
    }

    #[test]
    fn drop_before_and_at_end() {
        let mut controller = OrderController::new(ids(&[1, 2, 3]));
        controller.drag_start(id(3)).unwrap();
        controller.drag_over(id(1), 100.0, BOUNDS);
        assert_eq!(controller.drop_card(), SyncCommand::Submit(ids(&[3, 1, 2])));
        controller.submit_succeeded();

        controller.drag_start(id(3)).unwrap();
        controller.drag_over_gap();
        assert_eq!(controller.drop_card(), SyncCommand::Submit(ids(&[1, 2, 3])));
    }

    #[test]
    fn drop_without_preview_submits_unchanged_order() {
        let mut controller = OrderController::new(ids(&[1, 2]));
        controller.drag_start(id(1)).unwrap();

        assert_eq!(controller.drop_card(), SyncCommand::Submit(ids(&[1, 2])));
    }

    #[test]
    fn drag_end_discards_gesture() {
        let mut controller = OrderController::new(ids(&[1, 2]));
        controller.drag_start(id(1)).unwrap();
        controller.drag_over_gap();
        controller.drag_end();

        assert_eq!(controller.drop_card(), SyncCommand::None);
        assert_eq!(controller.state(), ControllerState::Idle);
        assert_eq!(controller.order(), ids(&[1, 2]));
    }

    #[test]
    fn unknown_card_cannot_be_dragged() {
        let mut controller = OrderController::new(ids(&[1, 2]));
        assert_eq!(
            controller.drag_start(id(9)),
            Err(ControllerError::UnknownCard(id(9)))
        );
        assert_eq!(
            controller.move_card(id(9), Direction::Up),
            Err(ControllerError::UnknownCard(id(9)))
        );
    }

    #[test]
    fn keyboard_moves_swap_neighbours() {
        let mut controller = OrderController::new(ids(&[1, 2, 3]));

        assert_eq!(
            controller.move_card(id(2), Direction::Up),
            Ok(SyncCommand::Submit(ids(&[2, 1, 3])))
        );
        controller.submit_succeeded();
        assert_eq!(
            controller.move_card(id(2), Direction::Down),
            Ok(SyncCommand::Submit(ids(&[1, 2, 3])))
        );
    }

    #[test]
    fn keyboard_moves_at_edges_are_noops() {
        let mut controller = OrderController::new(ids(&[1, 2, 3]));

        assert_eq!(controller.move_card(id(1), Direction::Up), Ok(SyncCommand::None));
        assert_eq!(controller.move_card(id(3), Direction::Down), Ok(SyncCommand::None));
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[test]
    fn gestures_during_flight_are_queued_once() {
        let mut controller = OrderController::new(ids(&[1, 2, 3]));
        assert_eq!(
            controller.move_card(id(3), Direction::Up),
            Ok(SyncCommand::Submit(ids(&[1, 3, 2])))
        );
        assert!(controller.is_submitting());

        assert_eq!(controller.move_card(id(3), Direction::Up), Ok(SyncCommand::None));
        assert_eq!(controller.move_card(id(2), Direction::Up), Ok(SyncCommand::None));
        assert_eq!(controller.order(), ids(&[3, 2, 1]));

        // the latest view is what gets resubmitted
        assert_eq!(controller.submit_succeeded(), SyncCommand::Submit(ids(&[3, 2, 1])));
        assert!(controller.is_submitting());
        assert_eq!(controller.submit_succeeded(), SyncCommand::None);
        assert!(!controller.is_submitting());
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[test]
    fn failure_forces_reload_and_drops_queue() {
        let mut controller = OrderController::new(ids(&[1, 2, 3]));
        controller.move_card(id(1), Direction::Down).unwrap();
        controller.move_card(id(3), Direction::Up).unwrap();

        assert_eq!(controller.submit_failed(), SyncCommand::Reload);
        assert_eq!(controller.state(), ControllerState::Reloading);
        assert_eq!(
            controller.drag_start(id(1)),
            Err(ControllerError::Reloading)
        );

        controller.reloaded(ids(&[3, 1]));
        assert_eq!(controller.state(), ControllerState::Idle);
        assert_eq!(controller.order(), ids(&[3, 1]));
        assert_eq!(controller.submit_succeeded(), SyncCommand::None);
    }

    #[test]
    fn dragging_during_flight_still_reports_submission() {
        let mut controller = OrderController::new(ids(&[1, 2, 3]));
        controller.move_card(id(2), Direction::Down).unwrap();
        controller.drag_start(id(1)).unwrap();

        assert_eq!(controller.state(), ControllerState::Dragging);
        assert!(controller.is_submitting());

        assert_eq!(controller.submit_failed(), SyncCommand::Reload);
        assert!(!controller.is_submitting());
        assert_eq!(controller.preview(), None);
    }

    #[test]
    fn stray_success_is_ignored() {
        let mut controller = OrderController::new(ids(&[1]));
        assert_eq!(controller.submit_succeeded(), SyncCommand::None);
        assert_eq!(controller.state(), ControllerState::Idle);
    }
}
