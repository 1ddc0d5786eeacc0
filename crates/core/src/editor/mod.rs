//! Board-editor state: the per-widget session, gesture classification and FEN assembly

use shakmaty::Square;

use crate::config::Mode;

pub mod fen;
pub mod gesture;

pub use fen::{FenMetadata, SplitFen};
pub use gesture::Gesture;

pub const DEFAULT_DOUBLE_CLICK_MS: u64 = 300;

/// Owned by a single widget; never shared
#[derive(Debug, Clone)]
pub struct EditorSession {
    mode: Mode,
    last_clicked_square: Option<Square>,
    last_click_ms: u64,
    pending_double_click: bool,
    double_click_ms: u64,
    metadata: FenMetadata,
}

impl EditorSession {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            last_clicked_square: None,
            last_click_ms: 0,
            pending_double_click: false,
            double_click_ms: DEFAULT_DOUBLE_CLICK_MS,
            metadata: FenMetadata::default(),
        }
    }

    pub fn with_double_click_ms(mut self, window_ms: u64) -> Self {
        self.double_click_ms = window_ms;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn last_clicked_square(&self) -> Option<Square> {
        self.last_clicked_square
    }

    pub fn pending_double_click(&self) -> bool {
        self.pending_double_click
    }

    pub fn metadata(&self) -> &FenMetadata {
        &self.metadata
    }

    /// Only `load` may call this; placement edits never touch the counters
    pub(crate) fn set_metadata(&mut self, metadata: FenMetadata) {
        self.metadata = metadata;
    }

    fn is_double_click(&self, square: Square, timestamp_ms: u64) -> bool {
        self.last_clicked_square == Some(square)
            && timestamp_ms.saturating_sub(self.last_click_ms) < self.double_click_ms
    }

    fn record_click(&mut self, square: Square, timestamp_ms: u64) {
        self.pending_double_click = false;
        self.last_clicked_square = Some(square);
        self.last_click_ms = timestamp_ms;
    }

    fn forget_click(&mut self) {
        self.pending_double_click = false;
        self.last_clicked_square = None;
    }
}
