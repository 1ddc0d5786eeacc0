//! Play-mode game state backed by shakmaty

use shakmaty::{
    fen::Fen, san::San, CastlingMode, Chess, Color, EnPassantMode, File, Move, Piece, Position, Role,
    Square,
};
use tracing::warn;

use crate::error::{Error, Result};

/// A legal move as the board sees it: castling targets the king's destination square
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveDescriptor {
    pub from: Square,
    pub to: Square,
    pub role: Role,
    pub captured: Option<Role>,
    pub promotion: Option<Role>,
    pub castle: bool,
    pub en_passant: bool,
    pub uci: String,
}

impl MoveDescriptor {
    pub fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub color: Color,
    pub mv: MoveDescriptor,
    pub fen_after: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    FiftyMoves,
    ThreefoldRepetition,
}

struct Played {
    before: Chess,
    record: MoveRecord,
}

pub struct Game {
    position: Chess,
    history: Vec<Played>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self {
            position: Chess::default(),
            history: Vec::new(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut game = Self::new();
        game.load(fen)?;
        Ok(game)
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    /// Replaces the position; on error the current game is untouched
    pub fn load(&mut self, fen: &str) -> Result<()> {
        let parsed: Fen = fen
            .trim()
            .parse()
            .map_err(|e| Error::InvalidFen(format!("{}: {}", fen, e)))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| Error::InvalidFen(format!("{}: {}", fen, e)))?;

        self.position = position;
        self.history.clear();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.position = Chess::default();
        self.history.clear();
    }

    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    /// Forces the side to move by rewriting the turn field and reloading
    pub fn set_turn(&mut self, color: Color) -> Result<()> {
        let fen = self.fen();
        let mut tokens: Vec<String> = fen.split(' ').map(String::from).collect();
        if tokens.len() < 2 {
            return Err(Error::InvalidFen(fen));
        }
        tokens[1] = color.char().to_string();
        self.load(&tokens.join(" "))
    }

    /// Legal moves, optionally restricted to those leaving `square`
    pub fn moves(&self, square: Option<Square>) -> Vec<MoveDescriptor> {
        self.position
            .legal_moves()
            .iter()
            .filter_map(describe)
            .filter(|m| square.map_or(true, |sq| m.from == sq))
            .collect()
    }

    /// True when some legal move from `from` to `to` needs a promotion piece
    pub fn is_promotion(&self, from: Square, to: Square) -> bool {
        self.moves(Some(from))
            .iter()
            .any(|m| m.to == to && m.is_promotion())
    }

    /// Plays the move from `from` to `to`; a missing promotion piece defaults to a queen
    pub fn play(&mut self, from: Square, to: Square, promotion: Option<Role>) -> Result<MoveRecord> {
        let wanted = promotion.or_else(|| self.is_promotion(from, to).then_some(Role::Queen));
        let mv = self
            .position
            .legal_moves()
            .iter()
            .find(|m| {
                m.from() == Some(from)
                    && (board_target(m) == to || m.to() == to)
                    && m.promotion() == wanted
            })
            .cloned();

        match mv {
            Some(mv) => self.apply(mv),
            None => {
                let uci = format!("{}{}", from, to);
                warn!(%uci, "illegal move rejected");
                Err(Error::IllegalMove(uci))
            }
        }
    }

    pub fn play_san(&mut self, san: &str) -> Result<MoveRecord> {
        let parsed: San = san
            .trim()
            .parse()
            .map_err(|e| {
                warn!(%san, error = %e, "unreadable move rejected");
                Error::IllegalMove(san.to_string())
            })?;
        let mv = parsed.to_move(&self.position).map_err(|e| {
            warn!(%san, error = %e, "illegal move rejected");
            Error::IllegalMove(san.to_string())
        })?;
        self.apply(mv)
    }

    fn apply(&mut self, mv: Move) -> Result<MoveRecord> {
        let descriptor = describe(&mv).ok_or_else(|| Error::IllegalMove(format!("{:?}", mv)))?;
        let color = self.position.turn();
        let before = self.position.clone();
        let next = self
            .position
            .clone()
            .play(mv)
            .map_err(|e| Error::IllegalMove(format!("{}: {}", descriptor.uci, e)))?;

        self.position = next;
        let record = MoveRecord {
            color,
            mv: descriptor,
            fen_after: self.fen(),
        };
        self.history.push(Played {
            before,
            record: record.clone(),
        });
        Ok(record)
    }

    pub fn undo(&mut self) -> Option<MoveRecord> {
        let played = self.history.pop()?;
        self.position = played.before;
        Some(played.record)
    }

    pub fn history(&self) -> Vec<MoveRecord> {
        self.history.iter().map(|p| p.record.clone()).collect()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position.board().piece_at(square)
    }

    pub fn is_check(&self) -> bool {
        self.position.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    pub fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    pub fn is_draw_by_fifty_moves(&self) -> bool {
        self.position.halfmoves() >= 100
    }

    pub fn is_threefold_repetition(&self) -> bool {
        let current = repetition_key(&self.fen());
        let seen = self
            .history
            .iter()
            .filter(|p| repetition_key(&Fen::from_position(&p.before, EnPassantMode::Legal).to_string()) == current)
            .count();
        seen + 1 >= 3
    }

    pub fn is_draw(&self) -> bool {
        self.is_stalemate()
            || self.is_insufficient_material()
            || self.is_draw_by_fifty_moves()
            || self.is_threefold_repetition()
    }

    pub fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_draw()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        if self.is_checkmate() {
            Some(GameOutcome::Checkmate { winner: self.turn().other() })
        } else if self.is_stalemate() {
            Some(GameOutcome::Stalemate)
        } else if self.is_insufficient_material() {
            Some(GameOutcome::InsufficientMaterial)
        } else if self.is_draw_by_fifty_moves() {
            Some(GameOutcome::FiftyMoves)
        } else if self.is_threefold_repetition() {
            Some(GameOutcome::ThreefoldRepetition)
        } else {
            None
        }
    }
}

/// Placement, turn, castling and en passant; counters do not matter for repetition
fn repetition_key(fen: &str) -> String {
    fen.split(' ').take(4).collect::<Vec<_>>().join(" ")
}

/// Square the moving piece lands on; shakmaty encodes castling as king-takes-rook
fn board_target(mv: &Move) -> Square {
    match mv {
        Move::Castle { king, rook } => {
            let file = if rook.file() > king.file() { File::G } else { File::C };
            Square::from_coords(file, king.rank())
        }
        _ => mv.to(),
    }
}

fn describe(mv: &Move) -> Option<MoveDescriptor> {
    let from = mv.from()?;
    let to = board_target(mv);
    let promo = mv.promotion().map(|r| r.char().to_string()).unwrap_or_default();

    Some(MoveDescriptor {
        from,
        to,
        role: mv.role(),
        captured: mv.capture(),
        promotion: mv.promotion(),
        castle: mv.is_castle(),
        en_passant: mv.is_en_passant(),
        uci: format!("{}{}{}", from, to, promo),
    })
}
