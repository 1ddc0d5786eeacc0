//! Promotion picker for play mode

use shakmaty::{Color, Piece, Square};

use super::{place_dialog, ClickOutcome, DialogCallback, DialogState, Phase};
use crate::board::{svg::piece_element, BoardGeometry, Point, Rect, SvgElement};
use crate::piece::{piece_code, PROMOTION_ROLES};

pub struct PromotionDialog {
    state: DialogState,
    color: Color,
    assets_url: String,
}

impl PromotionDialog {
    pub fn new(assets_url: &str) -> Self {
        Self {
            state: DialogState::default(),
            color: Color::White,
            assets_url: assets_url.to_string(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn target(&self) -> Option<Square> {
        self.state.target()
    }

    /// Offers the promotion pieces of `color` on `square`
    pub fn open(&mut self, square: Square, color: Color, callback: DialogCallback) {
        if self.state.is_active() {
            return;
        }
        self.color = color;
        self.state.open(square, callback);
    }

    pub fn close(&mut self) {
        self.state.close();
    }

    pub fn handle_pointer_down(&mut self, button: i16, target: Option<&SvgElement>) -> ClickOutcome {
        match self.state.handle_pointer_down(button, target) {
            // no action buttons here; treat a stray action tag as a cancel
            ClickOutcome::Action(_) => self.state.resolve(super::DialogResult::Canceled),
            outcome => outcome,
        }
    }

    pub fn handle_context_menu(&mut self) -> bool {
        self.state.handle_context_menu()
    }

    pub fn draw(&self, geometry: &BoardGeometry, layer: &mut SvgElement) {
        let (Phase::Shown, Some(square)) = (self.state.phase(), self.state.target()) else {
            return;
        };
        let size = geometry.square_size;
        let height = size * PROMOTION_ROLES.len() as f32;
        let origin = place_dialog(geometry, geometry.square_to_point(square), size, height);

        let mut group = SvgElement::group("promotion-dialog-group");
        group.push(
            SvgElement::new("rect")
                .attr("x", origin.x)
                .attr("y", origin.y)
                .attr("width", size)
                .attr("height", height)
                .attr("class", "promotion-dialog"),
        );
        for (row, role) in PROMOTION_ROLES.into_iter().enumerate() {
            let piece = Piece { color: self.color, role };
            let point = Point::new(origin.x, origin.y + row as f32 * size);
            group.push(piece_element(&self.assets_url, piece, point, size));
            group.push(
                SvgElement::rect(Rect::new(point.x, point.y, size, size))
                    .attr("class", "promotion-dialog-button")
                    .attr("data-piece", piece_code(piece)),
            );
        }
        layer.push(group);
    }
}
