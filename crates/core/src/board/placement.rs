//! Piece placement as drawn on the board

use shakmaty::{File, Piece, Rank, Square};

use crate::config::START_FEN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    squares: [Option<Piece>; 64],
}

impl Default for Placement {
    fn default() -> Self {
        Self::empty()
    }
}

impl Placement {
    pub fn empty() -> Self {
        Self { squares: [None; 64] }
    }

    pub fn start() -> Self {
        Self::parse(START_FEN)
    }

    /// Reads the placement field of `fen`.
    ///
    /// Lenient in the way a renderer is: unknown characters are skipped, extra
    /// files and ranks are dropped and missing ranks stay empty.
    pub fn parse(fen: &str) -> Self {
        let mut placement = Self::empty();
        let field = fen.split_whitespace().next().unwrap_or("");

        for (row, rank_text) in field.split('/').take(8).enumerate() {
            let rank = 7 - row as u32;
            let mut file = 0u32;
            for ch in rank_text.chars() {
                if file >= 8 {
                    break;
                }
                if let Some(skip) = ch.to_digit(10) {
                    file += skip;
                } else if let Some(piece) = Piece::from_char(ch) {
                    let square = Square::from_coords(File::new(file), Rank::new(rank));
                    placement.squares[square as usize] = Some(piece);
                    file += 1;
                }
            }
        }
        placement
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    /// Returns whatever was on the square before
    pub fn set(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.squares[square as usize], piece)
    }

    pub fn clear(&mut self) {
        self.squares = [None; 64];
    }

    pub fn occupied_count(&self) -> usize {
        self.squares.iter().filter(|p| p.is_some()).count()
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::ALL
            .into_iter()
            .filter_map(move |sq| self.get(sq).map(|piece| (sq, piece)))
    }

    /// Placement field, rank 8 first
    pub fn board_fen(&self) -> String {
        let mut fen = String::with_capacity(64);
        for rank in (0..8u32).rev() {
            let mut empty = 0;
            for file in 0..8u32 {
                let square = Square::from_coords(File::new(file), Rank::new(rank));
                match self.get(square) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }
        fen
    }
}
