//! Edit-mode interpretation of move-input events

use shakmaty::Square;
use tracing::debug;

use super::EditorSession;
use crate::board::MoveInputEvent;

/// What the controller has to do for one move-input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Empty square pressed: open the piece picker there
    PickPiece(Square),
    /// Second press inside the window; the square is cleared on the following cancel
    DoubleClick(Square),
    Drag(Square),
    Drop { from: Square, to: Square },
    /// The board already shows the piece on `to`
    Moved { from: Square, to: Square },
    Remove(Square),
    Nothing,
}

impl Gesture {
    /// Answer handed back to the move-input driver
    pub fn permits(&self) -> bool {
        !matches!(self, Gesture::PickPiece(_) | Gesture::DoubleClick(_))
    }

    /// True when the board changed and observers must hear about it
    pub fn changes_board(&self) -> bool {
        matches!(self, Gesture::Moved { .. } | Gesture::Remove(_))
    }
}

/// `occupied` reports whether the board currently holds a piece on a square.
pub fn classify<F>(session: &mut EditorSession, event: MoveInputEvent, occupied: F) -> Gesture
where
    F: Fn(Square) -> bool,
{
    let gesture = match event {
        MoveInputEvent::Started { square, timestamp_ms } => {
            if !occupied(square) {
                session.forget_click();
                Gesture::PickPiece(square)
            } else if session.is_double_click(square, timestamp_ms) {
                session.pending_double_click = true;
                Gesture::DoubleClick(square)
            } else {
                session.record_click(square, timestamp_ms);
                Gesture::Drag(square)
            }
        }
        // no legality in edit mode
        MoveInputEvent::Validate { from, to } => Gesture::Drop { from, to },
        MoveInputEvent::Finished { from, to } => Gesture::Moved { from, to },
        MoveInputEvent::Canceled { from, .. } => {
            if session.pending_double_click {
                let square = session.last_clicked_square;
                session.forget_click();
                square.map_or(Gesture::Nothing, Gesture::Remove)
            } else {
                from.map_or(Gesture::Nothing, Gesture::Remove)
            }
        }
    };
    debug!(?event, ?gesture, "edit gesture");
    gesture
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CancelReason;
    use crate::config::Mode;

    fn started(square: Square, timestamp_ms: u64) -> MoveInputEvent {
        MoveInputEvent::Started { square, timestamp_ms }
    }

    fn vetoed() -> MoveInputEvent {
        MoveInputEvent::Canceled { from: None, to: None, reason: CancelReason::Vetoed }
    }

    #[test]
    fn test_empty_square_requests_picker() {
        let mut session = EditorSession::new(Mode::Edit);
        for square in [Square::A1, Square::E4, Square::H8] {
            let gesture = classify(&mut session, started(square, 0), |_| false);
            assert_eq!(gesture, Gesture::PickPiece(square));
            assert!(!gesture.permits());
        }
    }

    #[test]
    fn test_fast_second_press_removes_piece() {
        let mut session = EditorSession::new(Mode::Edit);
        assert_eq!(classify(&mut session, started(Square::E2, 1_000), |_| true), Gesture::Drag(Square::E2));

        let second = classify(&mut session, started(Square::E2, 1_250), |_| true);
        assert_eq!(second, Gesture::DoubleClick(Square::E2));
        assert!(session.pending_double_click());

        assert_eq!(classify(&mut session, vetoed(), |_| true), Gesture::Remove(Square::E2));
        assert!(!session.pending_double_click());
        assert_eq!(session.last_clicked_square(), None);
    }

    #[test]
    fn test_slow_second_press_drags_again() {
        let mut session = EditorSession::new(Mode::Edit);
        classify(&mut session, started(Square::E2, 1_000), |_| true);
        assert_eq!(classify(&mut session, started(Square::E2, 1_300), |_| true), Gesture::Drag(Square::E2));
        assert!(!session.pending_double_click());
    }

    #[test]
    fn test_other_square_resets_window() {
        let mut session = EditorSession::new(Mode::Edit).with_double_click_ms(500);
        classify(&mut session, started(Square::E2, 0), |_| true);
        classify(&mut session, started(Square::D2, 100), |_| true);
        assert_eq!(classify(&mut session, started(Square::E2, 200), |_| true), Gesture::Drag(Square::E2));
    }

    #[test]
    fn test_cancel_with_source_removes() {
        let mut session = EditorSession::new(Mode::Edit);
        let off_board = MoveInputEvent::Canceled {
            from: Some(Square::B1),
            to: None,
            reason: CancelReason::MovedOutOfBoard,
        };
        let gesture = classify(&mut session, off_board, |_| true);
        assert_eq!(gesture, Gesture::Remove(Square::B1));
        assert!(gesture.changes_board());

        assert_eq!(classify(&mut session, vetoed(), |_| true), Gesture::Nothing);
    }

    #[test]
    fn test_validate_always_permits() {
        let mut session = EditorSession::new(Mode::Edit);
        let gesture = classify(&mut session, MoveInputEvent::Validate { from: Square::A1, to: Square::H8 }, |_| false);
        assert!(gesture.permits());
        assert!(!gesture.changes_board());
    }
}
