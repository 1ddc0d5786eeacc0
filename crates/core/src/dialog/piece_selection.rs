//! Piece picker for the board editor

use shakmaty::{Color, Piece, Square};

use super::{place_dialog, ClickOutcome, DialogAction, DialogCallback, DialogState, Phase};
use crate::board::{svg::piece_element, BoardGeometry, Point, Rect, SvgElement};
use crate::piece::{piece_code, PICKER_ROLES};

const PIECE_ROWS: usize = 6;
const ACTION_ROWS: usize = 2;

/// Two columns (white left, black right) of pieces, optionally followed by
/// two rows of board actions.
pub struct PieceSelectionDialog {
    state: DialogState,
    assets_url: String,
    show_actions: bool,
}

impl PieceSelectionDialog {
    pub fn new(assets_url: &str) -> Self {
        Self {
            state: DialogState::default(),
            assets_url: assets_url.to_string(),
            show_actions: true,
        }
    }

    /// Piece grid only
    pub fn without_actions(mut self) -> Self {
        self.show_actions = false;
        self
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn target(&self) -> Option<Square> {
        self.state.target()
    }

    pub fn open(&mut self, square: Square, callback: DialogCallback) {
        self.state.open(square, callback);
    }

    pub fn close(&mut self) {
        self.state.close();
    }

    pub fn finish_action(&mut self) {
        self.state.finish_action();
    }

    pub fn handle_pointer_down(&mut self, button: i16, target: Option<&SvgElement>) -> ClickOutcome {
        self.state.handle_pointer_down(button, target)
    }

    pub fn handle_context_menu(&mut self) -> bool {
        self.state.handle_context_menu()
    }

    fn rows(&self) -> usize {
        if self.show_actions {
            PIECE_ROWS + ACTION_ROWS
        } else {
            PIECE_ROWS
        }
    }

    /// Redraw hook body: renders into the interactive layer while shown
    pub fn draw(&self, geometry: &BoardGeometry, layer: &mut SvgElement) {
        let (Phase::Shown, Some(square)) = (self.state.phase(), self.state.target()) else {
            return;
        };
        let size = geometry.square_size;
        let width = size * 2.0;
        let height = size * self.rows() as f32;
        let origin = place_dialog(geometry, geometry.square_to_point(square), width, height);

        let mut group = SvgElement::group("piece-selection-dialog-group");
        group.push(
            SvgElement::new("rect")
                .attr("x", origin.x)
                .attr("y", origin.y)
                .attr("width", width)
                .attr("height", height)
                .attr("class", "piece-selection-dialog"),
        );

        for (row, role) in PICKER_ROLES.into_iter().enumerate() {
            let y = origin.y + row as f32 * size;
            for (col, color) in [Color::White, Color::Black].into_iter().enumerate() {
                let point = Point::new(origin.x + col as f32 * size, y);
                self.draw_piece_button(&mut group, Piece { color, role }, point, size);
            }
        }

        if self.show_actions {
            for (index, action) in DialogAction::ALL.into_iter().enumerate() {
                let row = PIECE_ROWS + index / 2;
                let point = Point::new(
                    origin.x + (index % 2) as f32 * size,
                    origin.y + row as f32 * size,
                );
                group.push(
                    SvgElement::rect(Rect::new(point.x, point.y, size, size))
                        .attr("class", "piece-selection-dialog-action")
                        .attr("data-action", action.as_str())
                        .attr("aria-label", action.label()),
                );
            }
        }

        layer.push(group);
    }

    fn draw_piece_button(&self, group: &mut SvgElement, piece: Piece, point: Point, size: f32) {
        group.push(piece_element(&self.assets_url, piece, point, size));
        group.push(
            SvgElement::rect(Rect::new(point.x, point.y, size, size))
                .attr("class", "piece-selection-dialog-button")
                .attr("data-piece", piece_code(piece)),
        );
    }
}
