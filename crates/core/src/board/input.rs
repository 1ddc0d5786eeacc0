//! Move input pipeline: raw pointer presses to move-input events

use shakmaty::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Dragged and released outside the board
    MovedOutOfBoard,
    /// The handler refused `Started`
    Vetoed,
    /// The handler refused `Validate`
    Rejected,
    /// Pressed outside the board while a piece was selected
    ClickedOutside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveInputEvent {
    Started { square: Square, timestamp_ms: u64 },
    Validate { from: Square, to: Square },
    /// The board already shows the piece on `to`
    Finished { from: Square, to: Square },
    Canceled {
        from: Option<Square>,
        to: Option<Square>,
        reason: CancelReason,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum InputState {
    #[default]
    Idle,
    /// Pointer held down on `from`
    Pressed { from: Square },
    /// Released on `from`; the next press picks the destination
    Selected { from: Square },
}

/// Classification happens in the handler; this only tracks where the pointer went.
/// The handler's return value permits (`true`) or vetoes the step.
#[derive(Debug, Default)]
pub struct MoveInput {
    state: InputState,
}

impl MoveInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<Square> {
        match self.state {
            InputState::Pressed { from } | InputState::Selected { from } => Some(from),
            InputState::Idle => None,
        }
    }

    pub fn reset(&mut self) {
        self.state = InputState::Idle;
    }

    pub fn pointer_down(
        &mut self,
        square: Option<Square>,
        timestamp_ms: u64,
        handler: &mut dyn FnMut(MoveInputEvent) -> bool,
    ) {
        match (self.state, square) {
            (InputState::Pressed { .. }, _) => {}
            (InputState::Selected { .. }, None) => {
                self.state = InputState::Idle;
                handler(MoveInputEvent::Canceled {
                    from: None,
                    to: None,
                    reason: CancelReason::ClickedOutside,
                });
            }
            (InputState::Idle, None) => {}
            (InputState::Selected { from }, Some(to)) if from != to => {
                self.state = InputState::Idle;
                if self.validate(from, to, handler) {
                    return;
                }
                self.start(to, timestamp_ms, handler);
            }
            (_, Some(square)) => self.start(square, timestamp_ms, handler),
        }
    }

    pub fn pointer_up(&mut self, square: Option<Square>, handler: &mut dyn FnMut(MoveInputEvent) -> bool) {
        let InputState::Pressed { from } = self.state else {
            return;
        };

        match square {
            None => {
                self.state = InputState::Idle;
                handler(MoveInputEvent::Canceled {
                    from: Some(from),
                    to: None,
                    reason: CancelReason::MovedOutOfBoard,
                });
            }
            Some(to) if to == from => self.state = InputState::Selected { from },
            Some(to) => {
                self.state = InputState::Idle;
                self.validate(from, to, handler);
            }
        }
    }

    fn start(&mut self, square: Square, timestamp_ms: u64, handler: &mut dyn FnMut(MoveInputEvent) -> bool) {
        if handler(MoveInputEvent::Started { square, timestamp_ms }) {
            self.state = InputState::Pressed { from: square };
        } else {
            self.state = InputState::Idle;
            handler(MoveInputEvent::Canceled {
                from: None,
                to: None,
                reason: CancelReason::Vetoed,
            });
        }
    }

    fn validate(&mut self, from: Square, to: Square, handler: &mut dyn FnMut(MoveInputEvent) -> bool) -> bool {
        if handler(MoveInputEvent::Validate { from, to }) {
            handler(MoveInputEvent::Finished { from, to });
            true
        } else {
            handler(MoveInputEvent::Canceled {
                from: Some(from),
                to: Some(to),
                reason: CancelReason::Rejected,
            });
            false
        }
    }
}
