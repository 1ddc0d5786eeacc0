//! EgChess Core Library
//!
//! A chessboard widget with a free-form position editor and a rules-checked
//! play mode, rendered headlessly to SVG.

pub mod board;
pub mod config;
pub mod dialog;
pub mod editor;
pub mod error;
pub mod events;
pub mod game;
pub mod piece;
pub mod prompt;
pub mod scheduler;
pub mod widget;

pub use board::{BoardView, Point, SvgBoard};
pub use config::{Mode, Orientation, WidgetConfig, START_FEN};
pub use error::{Error, Result};
pub use events::{Event, EventKind};
pub use game::{Game, GameOutcome, MoveDescriptor, MoveRecord};
pub use prompt::{FenPrompt, NoPrompt, PresetPrompt};
pub use widget::{EgChess, PointerInput, PointerResponse};
