//! Right-button annotations: same square toggles a circle, two squares toggle an arrow

use shakmaty::Square;

use super::annotations::{Arrow, ArrowKind, Marker, MarkerKind};
use super::BoardView;

#[derive(Debug, Default)]
pub struct RightClickAnnotator {
    pressed: Option<Square>,
}

impl RightClickAnnotator {
    pub fn pointer_down(&mut self, square: Option<Square>) {
        self.pressed = square;
    }

    /// Returns true when an annotation was toggled
    pub fn pointer_up<B: BoardView + ?Sized>(&mut self, square: Option<Square>, board: &mut B) -> bool {
        let (Some(from), Some(to)) = (self.pressed.take(), square) else {
            return false;
        };

        if from == to {
            let marker = Marker::new(MarkerKind::Circle, from);
            if board.markers(Some(marker.kind), Some(from)).is_empty() {
                board.add_marker(marker);
            } else {
                board.remove_markers(Some(marker.kind), Some(from));
            }
        } else {
            let kind = ArrowKind::Default;
            if board.arrows(Some(kind), Some(from), Some(to)).is_empty() {
                board.add_arrow(Arrow::new(kind, from, to));
            } else {
                board.remove_arrows(Some(kind), Some(from), Some(to));
            }
        }
        true
    }
}
