//! Board rendering surface
//!
//! `BoardView` is the capability the widget drives: piece placement, orientation,
//! square geometry, annotations and the redraw hook that extensions such as the
//! piece picker draw through. `SvgBoard` is a headless implementation that keeps
//! the placement in memory and renders a typed SVG element tree.

use shakmaty::{Color, File, Piece, Rank, Square};
use std::rc::Rc;

pub mod annotations;
pub mod annotator;
pub mod input;
pub mod placement;
pub mod svg;

pub use annotations::{Arrow, ArrowKind, Marker, MarkerKind};
pub use annotator::RightClickAnnotator;
pub use input::{CancelReason, MoveInput, MoveInputEvent};
pub use placement::Placement;
pub use svg::{SvgBoard, SvgElement};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }
}

/// Square size and orientation; everything else is derived
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGeometry {
    pub square_size: f32,
    pub orientation: Color,
}

impl BoardGeometry {
    pub fn width(&self) -> f32 {
        self.square_size * 8.0
    }

    pub fn height(&self) -> f32 {
        self.square_size * 8.0
    }

    /// Top-left corner of `square` as currently oriented
    pub fn square_to_point(&self, square: Square) -> Point {
        let file = square.file() as u32 as f32;
        let rank = square.rank() as u32 as f32;
        let (col, row) = match self.orientation {
            Color::White => (file, 7.0 - rank),
            Color::Black => (7.0 - file, rank),
        };
        Point::new(col * self.square_size, row * self.square_size)
    }

    /// `None` for points off the drawable area
    pub fn point_to_square(&self, point: Point) -> Option<Square> {
        if point.x < 0.0 || point.y < 0.0 || point.x >= self.width() || point.y >= self.height() {
            return None;
        }
        let col = (point.x / self.square_size) as u32;
        let row = (point.y / self.square_size) as u32;
        let (file, rank) = match self.orientation {
            Color::White => (col, 7 - row),
            Color::Black => (7 - col, row),
        };
        Some(Square::from_coords(File::new(file), Rank::new(rank)))
    }

    pub fn square_rect(&self, square: Square) -> Rect {
        let point = self.square_to_point(square);
        Rect::new(point.x, point.y, self.square_size, self.square_size)
    }
}

/// Called with the interactive top layer after every redraw
pub type RedrawHook = Rc<dyn Fn(&BoardGeometry, &mut SvgElement)>;

pub trait BoardView {
    fn geometry(&self) -> BoardGeometry;

    /// Placement field only, e.g. `8/8/8/8/8/8/8/8`
    fn position(&self) -> String;
    /// Accepts a full FEN or a bare placement; only the placement is applied
    fn set_position(&mut self, fen: &str, animate: bool);

    fn piece(&self, square: Square) -> Option<Piece>;
    fn set_piece(&mut self, square: Square, piece: Option<Piece>, animate: bool);

    fn orientation(&self) -> Color;
    fn set_orientation(&mut self, color: Color, animate: bool);

    fn add_marker(&mut self, marker: Marker);
    fn markers(&self, kind: Option<MarkerKind>, square: Option<Square>) -> Vec<Marker>;
    fn remove_markers(&mut self, kind: Option<MarkerKind>, square: Option<Square>);

    fn add_arrow(&mut self, arrow: Arrow);
    fn arrows(&self, kind: Option<ArrowKind>, from: Option<Square>, to: Option<Square>) -> Vec<Arrow>;
    fn remove_arrows(&mut self, kind: Option<ArrowKind>, from: Option<Square>, to: Option<Square>);

    fn on_after_redraw(&mut self, hook: RedrawHook);
    fn redraw(&mut self);

    /// Topmost interactive element under `point`
    fn hit_test(&self, point: Point) -> Option<&SvgElement>;

    /// Moves the piece on `from` to `to`; no-op when `from` is empty
    fn relocate(&mut self, from: Square, to: Square) {
        if let Some(piece) = self.piece(from) {
            self.set_piece(from, None, false);
            self.set_piece(to, Some(piece), true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_to_point_white() {
        let geometry = BoardGeometry { square_size: 40.0, orientation: Color::White };
        assert_eq!(geometry.square_to_point(Square::A8), Point::new(0.0, 0.0));
        assert_eq!(geometry.square_to_point(Square::A1), Point::new(0.0, 280.0));
        assert_eq!(geometry.square_to_point(Square::H1), Point::new(280.0, 280.0));
    }

    #[test]
    fn test_square_to_point_black() {
        let geometry = BoardGeometry { square_size: 40.0, orientation: Color::Black };
        assert_eq!(geometry.square_to_point(Square::H1), Point::new(0.0, 0.0));
        assert_eq!(geometry.square_to_point(Square::A8), Point::new(280.0, 280.0));
    }

    #[test]
    fn test_point_to_square_roundtrip() {
        for orientation in [Color::White, Color::Black] {
            let geometry = BoardGeometry { square_size: 50.0, orientation };
            for square in Square::ALL {
                let corner = geometry.square_to_point(square);
                let center = Point::new(corner.x + 25.0, corner.y + 25.0);
                assert_eq!(geometry.point_to_square(center), Some(square));
            }
        }
    }

    #[test]
    fn test_point_off_board() {
        let geometry = BoardGeometry { square_size: 40.0, orientation: Color::White };
        assert_eq!(geometry.point_to_square(Point::new(-1.0, 10.0)), None);
        assert_eq!(geometry.point_to_square(Point::new(10.0, 320.0)), None);
    }
}
