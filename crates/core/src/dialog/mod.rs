//! Modal pickers drawn on the board's interactive layer
//!
//! Both dialogs share [`DialogState`]: a target square, a single pending
//! callback resolved at most once per open/close cycle, and a guard that swallows
//! clicks while an action is being carried out.

use shakmaty::{Piece, Square};
use tracing::debug;

use crate::board::{BoardGeometry, Point, SvgElement};
use crate::piece::parse_piece_code;

pub mod piece_selection;
pub mod promotion;

pub use piece_selection::PieceSelectionDialog;
pub use promotion::PromotionDialog;

pub const BUTTON_RIGHT: i16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Hidden,
    Shown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResult {
    PieceSelected { square: Square, piece: Piece },
    Canceled,
}

/// Buttons below the piece grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    RotateBoard,
    LoadFen,
    ClearBoard,
    ResetBoard,
}

impl DialogAction {
    pub const ALL: [DialogAction; 4] = [
        DialogAction::RotateBoard,
        DialogAction::LoadFen,
        DialogAction::ClearBoard,
        DialogAction::ResetBoard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DialogAction::RotateBoard => "rotate",
            DialogAction::LoadFen => "load-fen",
            DialogAction::ClearBoard => "clear",
            DialogAction::ResetBoard => "reset",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == name)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DialogAction::RotateBoard => "Rotate board",
            DialogAction::LoadFen => "Load FEN",
            DialogAction::ClearBoard => "Clear board",
            DialogAction::ResetBoard => "Start position",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The pending callback has been invoked with this result
    Resolved(DialogResult),
    /// The controller must perform the action, then call `finish_action`
    Action(DialogAction),
    Ignored,
}

pub type DialogCallback = Box<dyn FnOnce(DialogResult)>;

pub struct DialogState {
    phase: Phase,
    target: Option<Square>,
    callback: Option<DialogCallback>,
    closing: bool,
}

impl Default for DialogState {
    fn default() -> Self {
        Self {
            phase: Phase::Hidden,
            target: None,
            callback: None,
            closing: false,
        }
    }
}

impl DialogState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn target(&self) -> Option<Square> {
        self.target
    }

    pub fn is_active(&self) -> bool {
        self.phase != Phase::Hidden
    }

    /// True while an action is in flight and clicks are being swallowed
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// No-op when already active; the first request keeps its square and callback
    pub fn open(&mut self, square: Square, callback: DialogCallback) {
        if self.is_active() {
            debug!(%square, "dialog already active, open ignored");
            return;
        }
        self.target = Some(square);
        self.callback = Some(callback);
        self.closing = false;
        self.phase = Phase::Shown;
        debug!(%square, "dialog shown");
    }

    /// Programmatic dismissal; the callback is dropped without being called
    pub fn close(&mut self) {
        self.phase = Phase::Hidden;
        self.target = None;
        self.callback = None;
        self.closing = false;
    }

    /// Hides the dialog and invokes the callback exactly once
    pub fn resolve(&mut self, result: DialogResult) -> ClickOutcome {
        let callback = self.callback.take();
        self.close();
        debug!(?result, "dialog resolved");
        if let Some(callback) = callback {
            callback(result);
        }
        ClickOutcome::Resolved(result)
    }

    pub fn begin_action(&mut self, action: DialogAction) -> ClickOutcome {
        self.closing = true;
        debug!(action = action.as_str(), "dialog action started");
        ClickOutcome::Action(action)
    }

    pub fn finish_action(&mut self) {
        self.close();
    }

    /// Delegated pointer-down handler shared by both dialogs
    pub fn handle_pointer_down(&mut self, button: i16, target: Option<&SvgElement>) -> ClickOutcome {
        if self.phase != Phase::Shown || self.closing {
            return ClickOutcome::Ignored;
        }
        let Some(square) = self.target else {
            return self.resolve(DialogResult::Canceled);
        };
        if button == BUTTON_RIGHT {
            return self.resolve(DialogResult::Canceled);
        }

        if let Some(element) = target {
            if let Some(piece) = element.get("data-piece").and_then(|c| parse_piece_code(c).ok()) {
                return self.resolve(DialogResult::PieceSelected { square, piece });
            }
            if let Some(action) = element.get("data-action").and_then(DialogAction::from_name) {
                return self.begin_action(action);
            }
        }
        self.resolve(DialogResult::Canceled)
    }

    /// Returns true when the native context menu must be suppressed
    pub fn handle_context_menu(&mut self) -> bool {
        if self.phase != Phase::Shown {
            return false;
        }
        if !self.closing {
            self.resolve(DialogResult::Canceled);
        }
        true
    }
}

/// Top-left corner for a `width` x `height` dialog anchored on the square at `anchor`.
///
/// Prefers extending right and down from the square; flips to the left or upward
/// when that would overflow, and never goes below zero.
pub fn place_dialog(geometry: &BoardGeometry, anchor: Point, width: f32, height: f32) -> Point {
    let size = geometry.square_size;

    let mut x = anchor.x;
    if x + width > geometry.width() {
        x = anchor.x + size - width;
    }
    let mut y = anchor.y;
    if y + height > geometry.height() {
        y = anchor.y + size - height;
    }

    Point::new(x.max(0.0), y.max(0.0))
}
