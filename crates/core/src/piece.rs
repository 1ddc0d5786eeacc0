//! Two-letter piece codes ("wk", "bp") used by the board and its dialogs

use shakmaty::{Color, Piece, Role, Square};

use crate::error::{Error, Result};

/// Dialog column order: pawn, bishop, knight, rook, queen, king
pub const PICKER_ROLES: [Role; 6] = [
    Role::Pawn,
    Role::Bishop,
    Role::Knight,
    Role::Rook,
    Role::Queen,
    Role::King,
];

/// Promotion choices, strongest first
pub const PROMOTION_ROLES: [Role; 4] = [Role::Queen, Role::Knight, Role::Rook, Role::Bishop];

/// Returns the code for a piece, e.g. `wk` for the white king
pub fn piece_code(piece: Piece) -> String {
    let mut code = String::with_capacity(2);
    code.push(piece.color.char());
    code.push(piece.role.char());
    code
}

pub fn parse_piece_code(code: &str) -> Result<Piece> {
    let mut chars = code.trim().chars();
    let color = chars.next().and_then(Color::from_char);
    let role = chars.next().and_then(|c| Role::from_char(c.to_ascii_lowercase()));

    match (color, role, chars.next()) {
        (Some(color), Some(role), None) => Ok(Piece { color, role }),
        _ => Err(Error::InvalidPiece(code.to_string())),
    }
}

pub fn parse_square(name: &str) -> Result<Square> {
    name.trim()
        .parse::<Square>()
        .map_err(|_| Error::InvalidSquare(name.to_string()))
}

pub fn color_name(color: Color) -> &'static str {
    if color == Color::White { "white" } else { "black" }
}
