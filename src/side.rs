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

//! The side to move, and the three-way index used to look up per-color occupancy.

use std::fmt::{Display, Formatter};
use std::ops::Not;

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
/// Which player owns a piece, or (as `Both`) the union of both players'
/// occupancy. `Both` is only ever used to index `Position::occupancies`; it
/// is never a legal value for `Position::turn`.
pub enum Side {
    White = 0,
    Black = 1,
    Both = 2,
}

impl Side {
    #[inline(always)]
    #[must_use]
    /// The side that moves next after this one. Only meaningful for `White`
    /// and `Black`; calling this on `Both` is a programmer error.
    pub const fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
            Side::Both => Side::Both,
        }
    }
}

impl Not for Side {
    type Output = Side;

    #[inline(always)]
    /// Flip `White` to `Black` and vice versa. Panics (in debug builds) if
    /// applied to `Side::Both`, which has no opponent.
    fn not(self) -> Side {
        debug_assert_ne!(self, Side::Both, "Side::Both has no opponent");
        self.opponent()
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Side::White => "white",
            Side::Black => "black",
            Side::Both => "both",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_flips_white_and_black() {
        assert_eq!(!Side::White, Side::Black);
        assert_eq!(!Side::Black, Side::White);
    }

    #[test]
    fn indices_match_original_layout() {
        assert_eq!(Side::White as usize, 0);
        assert_eq!(Side::Black as usize, 1);
        assert_eq!(Side::Both as usize, 2);
    }
}
