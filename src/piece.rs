/*
  Shatranj, a bitboard chess position and move generation core.
  Copyright (C) 2024 The Shatranj Authors (see AUTHORS.md file)

  Shatranj is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Shatranj is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! Piece types, indexed flatly across both colors so that a `Position` can
//! keep a single array of 12 bitboards rather than splitting type from color.

use super::Side;
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
/// One of the twelve piece types on a board: the six white pieces (0..6),
/// then the six black pieces (6..12), in the same order. Variant names are
/// single FEN letters rather than spelled-out words so that board-printing
/// and parsing code can stay a direct lookup rather than a match statement.
pub enum Piece {
    P = 0,
    N = 1,
    B = 2,
    R = 3,
    Q = 4,
    K = 5,
    p = 6,
    n = 7,
    b = 8,
    r = 9,
    q = 10,
    k = 11,
}

/// Every piece type, in index order. Convenient for looping over all 12
/// bitboards of a `Position`.
pub const ALL_PIECES: [Piece; 12] = [
    Piece::P,
    Piece::N,
    Piece::B,
    Piece::R,
    Piece::Q,
    Piece::K,
    Piece::p,
    Piece::n,
    Piece::b,
    Piece::r,
    Piece::q,
    Piece::k,
];

/// FEN letters in index order, `P` through `k`.
pub const ASCII_PIECES: &str = "PNBRQKpnbrqk";

impl Piece {
    #[inline(always)]
    #[must_use]
    /// Which side this piece belongs to.
    pub const fn side(self) -> Side {
        if (self as u8) < 6 {
            Side::White
        } else {
            Side::Black
        }
    }

    #[inline(always)]
    #[must_use]
    /// The white or black pawn, according to `side`.
    pub const fn pawn(side: Side) -> Piece {
        match side {
            Side::White | Side::Both => Piece::P,
            Side::Black => Piece::p,
        }
    }

    #[inline(always)]
    #[must_use]
    /// The white or black knight, according to `side`.
    pub const fn knight(side: Side) -> Piece {
        match side {
            Side::White | Side::Both => Piece::N,
            Side::Black => Piece::n,
        }
    }

    #[inline(always)]
    #[must_use]
    /// The white or black bishop, according to `side`.
    pub const fn bishop(side: Side) -> Piece {
        match side {
            Side::White | Side::Both => Piece::B,
            Side::Black => Piece::b,
        }
    }

    #[inline(always)]
    #[must_use]
    /// The white or black rook, according to `side`.
    pub const fn rook(side: Side) -> Piece {
        match side {
            Side::White | Side::Both => Piece::R,
            Side::Black => Piece::r,
        }
    }

    #[inline(always)]
    #[must_use]
    /// The white or black queen, according to `side`.
    pub const fn queen(side: Side) -> Piece {
        match side {
            Side::White | Side::Both => Piece::Q,
            Side::Black => Piece::q,
        }
    }

    #[inline(always)]
    #[must_use]
    /// The white or black king, according to `side`.
    pub const fn king(side: Side) -> Piece {
        match side {
            Side::White | Side::Both => Piece::K,
            Side::Black => Piece::k,
        }
    }

    #[must_use]
    /// The FEN letter for this piece (uppercase for white, lowercase for black).
    pub const fn code(self) -> char {
        match self {
            Piece::P => 'P',
            Piece::N => 'N',
            Piece::B => 'B',
            Piece::R => 'R',
            Piece::Q => 'Q',
            Piece::K => 'K',
            Piece::p => 'p',
            Piece::n => 'n',
            Piece::b => 'b',
            Piece::r => 'r',
            Piece::q => 'q',
            Piece::k => 'k',
        }
    }

    #[must_use]
    /// Parse a FEN piece letter, returning `None` for anything else.
    pub fn from_code(c: char) -> Option<Piece> {
        ASCII_PIECES
            .find(c)
            .map(|idx| Piece::try_from(idx as u8).unwrap())
    }
}

impl TryFrom<u8> for Piece {
    type Error = &'static str;

    fn try_from(x: u8) -> Result<Piece, Self::Error> {
        if x < 12 {
            // SAFETY: Piece is repr(u8) with contiguous discriminants 0..12.
            Ok(unsafe { std::mem::transmute(x) })
        } else {
            Err("piece index out of bounds")
        }
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_layout_matches_original() {
        assert_eq!(Piece::P as u8, 0);
        assert_eq!(Piece::K as u8, 5);
        assert_eq!(Piece::p as u8, 6);
        assert_eq!(Piece::k as u8, 11);
    }

    #[test]
    fn side_split_at_six() {
        assert_eq!(Piece::Q.side(), Side::White);
        assert_eq!(Piece::q.side(), Side::Black);
    }

    #[test]
    fn code_round_trips_through_from_code() {
        for &p in ALL_PIECES.iter() {
            assert_eq!(Piece::from_code(p.code()), Some(p));
        }
        assert_eq!(Piece::from_code('x'), None);
    }
}
