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

//! Bitboard chess position representation, magic-bitboard move generation,
//! and perft, with a packed-array codec for learned evaluators.

// Many module elements are re-exported to make names more ergonomic to access.

pub mod attacks;
pub use crate::attacks::{KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};

mod bitboard;
pub use crate::bitboard::{Bitboard, NOT_AB_FILE, NOT_A_FILE, NOT_HG_FILE, NOT_H_FILE};

mod castling;
pub use castling::{CastleRights, CASTLING_RIGHTS};

mod direction;
use direction::Direction;

mod error;
pub use error::PositionError;

pub mod magic;
pub use magic::MAGIC;

pub mod movegen;
pub use movegen::{generate_captures, generate_legal_moves, generate_moves};

mod moves;
pub use moves::Move;

pub mod perft;
pub use perft::{perft, perft_divide, perft_fen};

mod piece;
pub use piece::{Piece, ALL_PIECES, ASCII_PIECES};

pub mod position;
pub use position::{MoveFlag, Position, Snapshot, START_POSITION};

mod side;
pub use side::Side;

mod square;
pub use square::Square;
