//! Widget configuration

use serde::{Deserialize, Serialize};
use shakmaty::Color;
use std::fs;
use std::path::Path;

use crate::error::Result;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Which input handler drives the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Free board editing, no legality checks
    Edit,
    /// Moves validated by the rules engine
    Play,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    White,
    Black,
}

impl From<Orientation> for Color {
    fn from(orientation: Orientation) -> Color {
        match orientation {
            Orientation::White => Color::White,
            Orientation::Black => Color::Black,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Required; left optional so a missing value surfaces at construction
    pub mode: Option<Mode>,
    pub position: Option<String>,
    pub orientation: Orientation,
    pub assets_url: String,
    pub square_size: f32,
    pub double_click_ms: u64,
    pub draggable: bool,
    pub legal_move_markers: bool,
    pub css_class: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            mode: None,
            position: None,
            orientation: Orientation::White,
            assets_url: "./dist/assets/".to_string(),
            square_size: 40.0,
            double_click_ms: 300,
            draggable: true,
            legal_move_markers: true,
            css_class: "default".to_string(),
        }
    }
}

impl WidgetConfig {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::default()
        }
    }

    pub fn with_position(mut self, fen: &str) -> Self {
        self.position = Some(fen.to_string());
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// The configured position, or the standard start
    pub fn position_or_start(&self) -> &str {
        self.position.as_deref().unwrap_or(START_FEN)
    }
}
