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

//! Errors surfaced at the boundary of this crate: malformed FEN strings and
//! malformed packed-array board encodings. Internal invariant violations
//! (e.g. a `Move` referencing a square with no piece on it) are programmer
//! errors and are caught with `debug_assert!`, not this type.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Something rejected while parsing a position from an external representation.
pub enum PositionError {
    #[error("invalid FEN string: {reason}")]
    InvalidFen { reason: String },

    #[error("invalid packed board array: {reason}")]
    InvalidPackedArray { reason: String },
}
