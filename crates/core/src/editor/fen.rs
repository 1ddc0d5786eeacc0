//! FEN assembly for edit mode
//!
//! The board only knows piece placement. Turn comes from orientation, castling
//! rights are read off king/rook occupancy, and the remaining fields are carried
//! in [`FenMetadata`]. Castling rights parsed from an incoming FEN are not kept:
//! a load followed by a compose reports whatever the occupancy implies.

use shakmaty::{Color, Piece, Role, Square};
use std::fmt;
use tracing::debug;

/// Fields that cannot be derived from the placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenMetadata {
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Default for FenMetadata {
    fn default() -> Self {
        Self {
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

impl fmt::Display for FenMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.en_passant {
            Some(square) => write!(f, "{}", square)?,
            None => f.write_str("-")?,
        }
        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)
    }
}

/// A FEN split into what the editor applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitFen {
    pub placement: String,
    pub orientation: Color,
    pub metadata: FenMetadata,
}

/// (king square, rook square, flag) in output order
const CASTLING_PROBES: [(Color, Square, Square, char); 4] = [
    (Color::White, Square::E1, Square::H1, 'K'),
    (Color::White, Square::E1, Square::A1, 'Q'),
    (Color::Black, Square::E8, Square::H8, 'k'),
    (Color::Black, Square::E8, Square::A8, 'q'),
];

/// Occupancy heuristic: a king and rook on their home squares grant the right
pub fn castling_rights<F>(probe: F) -> String
where
    F: Fn(Square) -> Option<Piece>,
{
    let rights: String = CASTLING_PROBES
        .iter()
        .filter(|(color, king, rook, _)| {
            probe(*king) == Some(Piece { color: *color, role: Role::King })
                && probe(*rook) == Some(Piece { color: *color, role: Role::Rook })
        })
        .map(|(_, _, _, flag)| *flag)
        .collect();

    if rights.is_empty() {
        "-".to_string()
    } else {
        rights
    }
}

pub fn compose<F>(placement: &str, orientation: Color, probe: F, metadata: &FenMetadata) -> String
where
    F: Fn(Square) -> Option<Piece>,
{
    format!(
        "{} {} {} {}",
        placement,
        orientation.char(),
        castling_rights(probe),
        metadata
    )
}

/// Splits without validating. Missing or unreadable fields fall back to
/// white, no en passant, clock 0 and move 1.
pub fn split(fen: &str) -> SplitFen {
    let mut fields = fen.split_whitespace();
    let placement = fields.next().unwrap_or("8/8/8/8/8/8/8/8").to_string();
    let orientation = match fields.next() {
        Some("b") => Color::Black,
        _ => Color::White,
    };
    let _castling = fields.next();
    let en_passant = match fields.next() {
        None | Some("-") => None,
        Some(field) => {
            let square = field.parse::<Square>().ok();
            if square.is_none() {
                debug!(%field, "unreadable en passant field dropped");
            }
            square
        }
    };
    let halfmove_clock = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0);
    let fullmove_number = fields
        .next()
        .and_then(|f| f.parse().ok())
        .filter(|n: &u32| *n > 0)
        .unwrap_or(1);

    SplitFen {
        placement,
        orientation,
        metadata: FenMetadata {
            en_passant,
            halfmove_clock,
            fullmove_number,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Placement;
    use crate::config::START_FEN;

    fn compose_placement(placement: &Placement, orientation: Color, metadata: &FenMetadata) -> String {
        compose(&placement.board_fen(), orientation, |sq| placement.get(sq), metadata)
    }

    #[test]
    fn test_start_position_composes_to_start_fen() {
        let placement = Placement::start();
        assert_eq!(compose_placement(&placement, Color::White, &FenMetadata::default()), START_FEN);
    }

    #[test]
    fn test_empty_board_roundtrip() {
        let original = "8/8/8/8/8/8/8/8 w - - 0 1";
        let split = split(original);
        let placement = Placement::parse(&split.placement);
        assert_eq!(compose_placement(&placement, split.orientation, &split.metadata), original);
    }

    #[test]
    fn test_castling_flags_follow_occupancy() {
        let placement = Placement::parse("r3k3/8/8/8/8/8/8/4K2R");
        let rights = castling_rights(|sq| placement.get(sq));
        assert_eq!(rights, "Kq");

        let wrong_color = Placement::parse("4k2R/8/8/8/8/8/8/8");
        assert_eq!(castling_rights(|sq| wrong_color.get(sq)), "-");
    }

    #[test]
    fn test_castling_field_is_not_carried_over() {
        let split = split("4k3/8/8/8/8/8/8/4K3 w KQkq - 0 1");
        let placement = Placement::parse(&split.placement);
        assert_eq!(
            compose_placement(&placement, split.orientation, &split.metadata),
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1"
        );
    }

    #[test]
    fn test_metadata_passes_through() {
        let split = split("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e6 0 2");
        assert_eq!(split.orientation, Color::Black);
        assert_eq!(split.metadata.en_passant, Some(Square::E6));
        assert_eq!(split.metadata.fullmove_number, 2);

        let placement = Placement::parse(&split.placement);
        assert!(compose_placement(&placement, split.orientation, &split.metadata).ends_with(" b KQkq e6 0 2"));
    }

    #[test]
    fn test_unreadable_en_passant_keeps_counters() {
        let split = split("8/8/8/8/8/8/8/8 w - e9 7 12");
        assert_eq!(split.metadata.en_passant, None);
        assert_eq!(split.metadata.halfmove_clock, 7);
        assert_eq!(split.metadata.fullmove_number, 12);
        assert_eq!(split.metadata.to_string(), "- 7 12");
    }

    #[test]
    fn test_missing_fields_default() {
        let split = split("8/8/8/8/8/8/8/8");
        assert_eq!(split.orientation, Color::White);
        assert_eq!(split.metadata, FenMetadata::default());
        assert_eq!(split.metadata.to_string(), "- 0 1");
    }
}
