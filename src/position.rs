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

//! `Position`: a full chess position, its FEN and packed-array codecs, and
//! the snapshot/restore pair that backs [`Position::make_move`]'s
//! try-then-rollback legality check.

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use crate::attacks::{KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};
use crate::magic::MAGIC;
use crate::{Bitboard, CastleRights, Move, Piece, PositionError, Side, Square, ALL_PIECES};

/// The standard chess starting position, in FEN.
pub const START_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Whether [`Position::try_move`] should accept any pseudo-legal move, or
/// only ones that capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveFlag {
    AllMoves,
    CapturesOnly,
}

/// A full chess position: piece placement, side to move, castling rights,
/// the en passant target, and the two move clocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub(crate) bitboards: [Bitboard; 12],
    pub(crate) occupancies: [Bitboard; 3],
    pub turn: Side,
    pub castle: CastleRights,
    pub en_passant: Option<Square>,
    pub halfmove: u32,
    pub fullmove: u32,
}

/// A saved copy of every field of a [`Position`], used to undo a move that
/// turns out to leave the mover's own king in check. Also available to
/// callers that want to try several moves in turn and roll back between
/// attempts (move generators, perft, evaluators).
#[derive(Clone, Copy)]
pub struct Snapshot {
    bitboards: [Bitboard; 12],
    occupancies: [Bitboard; 3],
    turn: Side,
    castle: CastleRights,
    en_passant: Option<Square>,
    halfmove: u32,
    fullmove: u32,
}

impl Position {
    #[must_use]
    /// The bitboard for one piece type.
    pub fn piece_bitboard(&self, piece: Piece) -> Bitboard {
        self.bitboards[piece as usize]
    }

    #[must_use]
    /// The combined occupancy of one side, or of the whole board when `side`
    /// is [`Side::Both`].
    pub fn occupancy(&self, side: Side) -> Bitboard {
        self.occupancies[side as usize]
    }

    #[must_use]
    /// Parse a position from a FEN string, rejecting anything
    /// [`Position::validate_fen`] would reject.
    pub fn from_fen(fen: &str) -> Result<Position, PositionError> {
        if !Position::validate_fen(fen) {
            return Err(PositionError::InvalidFen {
                reason: format!("malformed FEN: {fen}"),
            });
        }

        let parts: Vec<&str> = fen.split_whitespace().collect();
        let (board_part, turn_part, castle_part, en_passant_part, halfmove_part, fullmove_part) =
            (parts[0], parts[1], parts[2], parts[3], parts[4], parts[5]);

        let mut bitboards = [Bitboard::EMPTY; 12];
        let mut rank = 7i32;
        let mut file = 0i32;
        for c in board_part.chars() {
            if c == '/' {
                rank -= 1;
                file = 0;
            } else if let Some(digit) = c.to_digit(10) {
                file += digit as i32;
            } else {
                let piece = Piece::from_code(c).ok_or_else(|| PositionError::InvalidFen {
                    reason: format!("unrecognized piece letter '{c}'"),
                })?;
                let sq = Square::try_from((rank * 8 + file) as u8).unwrap();
                bitboards[piece as usize].insert(sq);
                file += 1;
            }
        }

        let turn = if turn_part == "w" {
            Side::White
        } else {
            Side::Black
        };

        let mut castle = CastleRights::NO_RIGHTS;
        if castle_part != "-" {
            for c in castle_part.chars() {
                castle |= match c {
                    'K' => CastleRights::WK,
                    'Q' => CastleRights::WQ,
                    'k' => CastleRights::BK,
                    'q' => CastleRights::BQ,
                    _ => unreachable!("validate_fen already rejected other letters"),
                };
            }
        }

        let en_passant = if en_passant_part == "-" {
            None
        } else {
            let mut chars = en_passant_part.chars();
            let file = chars.next().unwrap() as u8 - b'a';
            let rank = chars.next().unwrap().to_digit(10).unwrap() as u8 - 1;
            Some(Square::try_from(rank * 8 + file).unwrap())
        };

        let halfmove: u32 = halfmove_part.parse().map_err(|_| PositionError::InvalidFen {
            reason: "halfmove clock is not a number".to_string(),
        })?;
        let fullmove: u32 = fullmove_part.parse().map_err(|_| PositionError::InvalidFen {
            reason: "fullmove number is not a number".to_string(),
        })?;

        let mut occupancies = [Bitboard::EMPTY; 3];
        for &piece in &ALL_PIECES {
            if (piece as u8) < 6 {
                occupancies[Side::White as usize] =
                    Bitboard::new(occupancies[Side::White as usize].value() | bitboards[piece as usize].value());
            } else {
                occupancies[Side::Black as usize] =
                    Bitboard::new(occupancies[Side::Black as usize].value() | bitboards[piece as usize].value());
            }
        }
        occupancies[Side::Both as usize] = Bitboard::new(
            occupancies[Side::White as usize].value() | occupancies[Side::Black as usize].value(),
        );

        log::debug!("parsed position from fen: {fen}");

        Ok(Position {
            bitboards,
            occupancies,
            turn,
            castle,
            en_passant,
            halfmove,
            fullmove,
        })
    }

    #[must_use]
    /// Check that `fen` has the right shape to be parsed: six whitespace
    /// separated fields, eight ranks each summing to eight files, a legal
    /// side-to-move letter, legal castling letters, a legal en passant
    /// square or `-`, and non-negative clocks.
    pub fn validate_fen(fen: &str) -> bool {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 6 {
            log::warn!("rejected fen with {} fields: {fen}", parts.len());
            return false;
        }
        let (board_part, turn_part, castle_part, en_passant_part, halfmove_part, fullmove_part) =
            (parts[0], parts[1], parts[2], parts[3], parts[4], parts[5]);

        let ranks: Vec<&str> = board_part.split('/').collect();
        if ranks.len() != 8 {
            return false;
        }
        for rank in &ranks {
            let mut file_count = 0u32;
            for c in rank.chars() {
                if let Some(digit) = c.to_digit(10) {
                    file_count += digit;
                } else if "PNBRQKpnbrqk".contains(c) {
                    file_count += 1;
                } else {
                    return false;
                }
            }
            if file_count != 8 {
                return false;
            }
        }

        if turn_part != "w" && turn_part != "b" {
            return false;
        }

        if castle_part != "-" && !castle_part.chars().all(|c| "KQkq".contains(c)) {
            return false;
        }

        if en_passant_part != "-" {
            let chars: Vec<char> = en_passant_part.chars().collect();
            if chars.len() != 2 || !('a'..='h').contains(&chars[0]) || !('1'..='6').contains(&chars[1]) {
                return false;
            }
        }

        if halfmove_part.parse::<i64>().map(|v| v < 0).unwrap_or(true) {
            return false;
        }
        if fullmove_part.parse::<i64>().map(|v| v < 1).unwrap_or(true) {
            return false;
        }

        true
    }

    #[must_use]
    /// Serialize this position back to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut board_part = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let sq = Square::try_from((rank * 8 + file) as u8).unwrap();
                match self.piece_at(sq) {
                    None => empty += 1,
                    Some(piece) => {
                        if empty > 0 {
                            board_part.push_str(&empty.to_string());
                            empty = 0;
                        }
                        board_part.push(piece.code());
                    }
                }
            }
            if empty > 0 {
                board_part.push_str(&empty.to_string());
            }
            if rank > 0 {
                board_part.push('/');
            }
        }

        let turn_part = match self.turn {
            Side::White | Side::Both => "w",
            Side::Black => "b",
        };

        let mut castle_part = String::new();
        if self.castle.is_kingside_castle_legal(Side::White) {
            castle_part.push('K');
        }
        if self.castle.is_queenside_castle_legal(Side::White) {
            castle_part.push('Q');
        }
        if self.castle.is_kingside_castle_legal(Side::Black) {
            castle_part.push('k');
        }
        if self.castle.is_queenside_castle_legal(Side::Black) {
            castle_part.push('q');
        }
        if castle_part.is_empty() {
            castle_part.push('-');
        }

        let en_passant_part = match self.en_passant {
            None => "-".to_string(),
            Some(sq) => sq.to_string(),
        };

        format!(
            "{board_part} {turn_part} {castle_part} {en_passant_part} {} {}",
            self.halfmove, self.fullmove
        )
    }

    #[must_use]
    /// The piece occupying `sq`, if any.
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        ALL_PIECES
            .iter()
            .copied()
            .find(|&p| self.bitboards[p as usize].contains(sq))
    }

    #[must_use]
    /// Encode this position as a 69-integer packed array: 64 board squares
    /// in row-major order from rank 1 to rank 8 (0 for empty, 1..=12 for
    /// `ALL_PIECES` index + 1), then the four castling-right bits in
    /// `KQkq` order, then the en passant square index (or -1).
    ///
    /// This encoding cannot represent side to move or the move clocks;
    /// [`Position::from_packed_array`] always decodes them as white to move
    /// with both clocks at their starting values.
    pub fn to_packed_array(&self) -> [i32; 69] {
        let mut array = [0i32; 69];
        for rank in 0..8 {
            for file in 0..8 {
                let sq = Square::try_from((rank * 8 + file) as u8).unwrap();
                array[rank * 8 + file] = self.piece_at(sq).map_or(0, |p| p as i32 + 1);
            }
        }
        array[64] = i32::from(self.castle.is_kingside_castle_legal(Side::White));
        array[65] = i32::from(self.castle.is_queenside_castle_legal(Side::White));
        array[66] = i32::from(self.castle.is_kingside_castle_legal(Side::Black));
        array[67] = i32::from(self.castle.is_queenside_castle_legal(Side::Black));
        array[68] = self.en_passant.map_or(-1, |sq| sq as i32);
        array
    }

    /// Decode a position from a 69-integer packed array produced by
    /// [`Position::to_packed_array`]. Side to move and both move clocks are
    /// not recoverable from the array and are always decoded as a fresh
    /// white-to-move position.
    pub fn from_packed_array(array: &[i32]) -> Result<Position, PositionError> {
        if array.len() != 69 {
            return Err(PositionError::InvalidPackedArray {
                reason: format!("expected 69 entries, got {}", array.len()),
            });
        }

        const PIECE_LETTERS: [char; 12] = [
            'P', 'N', 'B', 'R', 'Q', 'K', 'p', 'n', 'b', 'r', 'q', 'k',
        ];

        let mut board_part = String::new();
        for rank in 0..8 {
            let mut empty = 0;
            let mut row = String::new();
            for file in 0..8 {
                let value = array[rank * 8 + file];
                if value == 0 {
                    empty += 1;
                } else {
                    let idx = usize::try_from(value - 1).map_err(|_| PositionError::InvalidPackedArray {
                        reason: format!("square value out of range: {value}"),
                    })?;
                    let letter = *PIECE_LETTERS.get(idx).ok_or_else(|| PositionError::InvalidPackedArray {
                        reason: format!("square value out of range: {value}"),
                    })?;
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(letter);
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            board_part.push_str(&row);
            if rank != 7 {
                board_part.push('/');
            }
        }

        let (wk, wq, bk, bq) = (array[64], array[65], array[66], array[67]);
        let mut castle_part = String::new();
        if wk != 0 {
            castle_part.push('K');
        }
        if wq != 0 {
            castle_part.push('Q');
        }
        if bk != 0 {
            castle_part.push('k');
        }
        if bq != 0 {
            castle_part.push('q');
        }
        if castle_part.is_empty() {
            castle_part.push('-');
        }

        let ep_square = array[68];
        let en_passant_part = if ep_square < 0 {
            "-".to_string()
        } else {
            let sq = u8::try_from(ep_square).map_err(|_| PositionError::InvalidPackedArray {
                reason: format!("en passant square out of range: {ep_square}"),
            })?;
            let file = sq % 8;
            let rank = sq / 8;
            format!("{}{}", (b'a' + file) as char, 8 - rank)
        };

        let fen = format!("{board_part} w {castle_part} {en_passant_part} 0 1");
        Position::from_fen(&fen)
    }

    #[must_use]
    /// Capture every mutable field of this position, to be restored later
    /// with [`Position::restore`].
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            bitboards: self.bitboards,
            occupancies: self.occupancies,
            turn: self.turn,
            castle: self.castle,
            en_passant: self.en_passant,
            halfmove: self.halfmove,
            fullmove: self.fullmove,
        }
    }

    /// Overwrite every mutable field of this position with a previously
    /// captured [`Snapshot`].
    pub fn restore(&mut self, snap: Snapshot) {
        self.bitboards = snap.bitboards;
        self.occupancies = snap.occupancies;
        self.turn = snap.turn;
        self.castle = snap.castle;
        self.en_passant = snap.en_passant;
        self.halfmove = snap.halfmove;
        self.fullmove = snap.fullmove;
    }

    #[must_use]
    /// Whether `sq` is attacked by any piece of `side`.
    pub fn is_square_attacked(&self, sq: Square, side: Side) -> bool {
        let occ = self.occupancies[Side::Both as usize];
        let idx = sq as usize;

        let (queen, bishop, rook, knight, king, pawn) = match side {
            Side::White | Side::Both => (
                Piece::Q,
                Piece::B,
                Piece::R,
                Piece::N,
                Piece::K,
                Piece::P,
            ),
            Side::Black => (
                Piece::q,
                Piece::b,
                Piece::r,
                Piece::n,
                Piece::k,
                Piece::p,
            ),
        };

        if (MAGIC.queen_attacks(occ, sq as u8).value() & self.bitboards[queen as usize].value()) != 0 {
            return true;
        }
        if (MAGIC.bishop_attacks(occ, sq as u8).value() & self.bitboards[bishop as usize].value()) != 0 {
            return true;
        }
        if (MAGIC.rook_attacks(occ, sq as u8).value() & self.bitboards[rook as usize].value()) != 0 {
            return true;
        }
        if (KNIGHT_ATTACKS[idx].value() & self.bitboards[knight as usize].value()) != 0 {
            return true;
        }
        if (KING_ATTACKS[idx].value() & self.bitboards[king as usize].value()) != 0 {
            return true;
        }
        let pawn_side = match side {
            Side::White | Side::Both => Side::Black,
            Side::Black => Side::White,
        };
        if (PAWN_ATTACKS[pawn_side as usize][idx].value() & self.bitboards[pawn as usize].value()) != 0 {
            return true;
        }

        false
    }

    #[must_use]
    /// Whether `side`'s king currently sits in check.
    pub fn is_king_in_check(&self, side: Side) -> bool {
        let king = Piece::king(side);
        let Some(king_sq) = self.bitboards[king as usize].clone().next() else {
            return false;
        };
        self.is_square_attacked(king_sq, !side)
    }

    #[must_use]
    /// Whether the halfmove clock has crossed the fifty-move threshold. A
    /// position with no legal moves is checkmate (if the side to move is in
    /// check) or stalemate otherwise; this query covers the other terminal
    /// condition a caller needs without tracking its own ply history.
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove > 50
    }

    /// Apply `m` to this position. Returns `true` if the move was legal
    /// (the mover's own king is not left in check) and the position was
    /// updated; returns `false` and leaves the position unchanged otherwise.
    ///
    /// With `MoveFlag::CapturesOnly`, a non-capturing move is rejected
    /// outright without being applied or rolled back.
    pub fn make_move(&mut self, m: Move, flag: MoveFlag) -> bool {
        if flag == MoveFlag::CapturesOnly && !m.is_capture() {
            return false;
        }

        let state = self.snapshot();
        let mover = self.turn;

        let source = m.source();
        let target = m.target();
        let piece = m.piece();

        self.bitboards[piece as usize].remove(source);
        self.bitboards[piece as usize].insert(target);

        if m.is_capture() {
            let opponent_range = if mover == Side::White { 6..12 } else { 0..6 };
            for idx in opponent_range {
                if self.bitboards[idx].contains(target) {
                    self.bitboards[idx].remove(target);
                    break;
                }
            }
        }

        if let Some(promoted) = m.promoted() {
            self.bitboards[piece as usize].remove(target);
            self.bitboards[promoted as usize].insert(target);
        }

        if m.is_en_passant() {
            let captured_sq = match mover {
                Side::White | Side::Both => Square::try_from(target as u8 - 8).unwrap(),
                Side::Black => Square::try_from(target as u8 + 8).unwrap(),
            };
            let captured_pawn = Piece::pawn(!mover);
            self.bitboards[captured_pawn as usize].remove(captured_sq);
        }

        self.en_passant = None;
        if m.is_double_push() {
            self.en_passant = Some(match mover {
                Side::White | Side::Both => Square::try_from(target as u8 - 8).unwrap(),
                Side::Black => Square::try_from(target as u8 + 8).unwrap(),
            });
        }

        if m.is_castling() {
            let (rook, rook_from, rook_to) = match target {
                Square::G1 => (Piece::R, Square::H1, Square::F1),
                Square::C1 => (Piece::R, Square::A1, Square::D1),
                Square::G8 => (Piece::r, Square::H8, Square::F8),
                Square::C8 => (Piece::r, Square::A8, Square::D8),
                _ => unreachable!("castling move must land on a castling target square"),
            };
            self.bitboards[rook as usize].remove(rook_from);
            self.bitboards[rook as usize].insert(rook_to);
        }

        self.castle &= CastleRights(crate::castling::CASTLING_RIGHTS[source as usize]);
        self.castle &= CastleRights(crate::castling::CASTLING_RIGHTS[target as usize]);

        self.recompute_occupancies();

        self.halfmove += 1;
        if m.is_capture() || piece == Piece::P || piece == Piece::p {
            self.halfmove = 0;
        }
        if mover == Side::Black {
            self.fullmove += 1;
        }

        self.turn = !mover;

        let king_sq = self.bitboards[Piece::king(mover) as usize].clone().next().unwrap();
        if self.is_square_attacked(king_sq, self.turn) {
            self.restore(state);
            return false;
        }

        true
    }

    fn recompute_occupancies(&mut self) {
        let mut white = Bitboard::EMPTY;
        let mut black = Bitboard::EMPTY;
        for &piece in &ALL_PIECES {
            if (piece as u8) < 6 {
                white = Bitboard::new(white.value() | self.bitboards[piece as usize].value());
            } else {
                black = Bitboard::new(black.value() | self.bitboards[piece as usize].value());
            }
        }
        self.occupancies[Side::White as usize] = white;
        self.occupancies[Side::Black as usize] = black;
        self.occupancies[Side::Both as usize] = Bitboard::new(white.value() | black.value());
    }
}

impl Default for Position {
    fn default() -> Position {
        Position::from_fen(START_POSITION).unwrap()
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_position_round_trips_through_fen() {
        let pos = Position::default();
        assert_eq!(pos.to_fen(), START_POSITION);
    }

    #[test]
    fn rejects_malformed_fen() {
        assert!(!Position::validate_fen("not a fen"));
        assert!(Position::from_fen("not a fen").is_err());
    }

    #[test]
    fn en_passant_square_round_trips() {
        let pos = Position::from_fen(
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
        )
        .unwrap();
        assert_eq!(pos.en_passant, Some(Square::D6));
        assert_eq!(pos.to_fen(), "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3");
    }

    #[test]
    fn packed_array_round_trips_piece_placement() {
        let pos = Position::default();
        let array = pos.to_packed_array();
        let decoded = Position::from_packed_array(&array).unwrap();
        for sq in 0u8..64 {
            let sq = Square::try_from(sq).unwrap();
            assert_eq!(pos.piece_at(sq).is_some(), decoded.piece_at(sq).is_some());
        }
    }

    #[test]
    fn quiet_pawn_push_does_not_flag_capture() {
        let mut pos = Position::default();
        let m = Move::new(Square::E2, Square::E4, Piece::P, None, false, true, false, false);
        assert!(pos.make_move(m, MoveFlag::AllMoves));
        assert_eq!(pos.en_passant, Some(Square::E3));
        assert_eq!(pos.turn, Side::Black);
    }

    #[test]
    fn rook_on_open_file_checks_the_king() {
        let pos = Position::from_fen("4r3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(pos.is_king_in_check(Side::White));
        assert!(!pos.is_king_in_check(Side::Black));
    }

    #[test]
    fn illegal_move_leaving_king_in_check_is_rejected_and_rolled_back() {
        // White king on e1 pinned-ish scenario: moving the king into an open
        // file attacked by a black rook must be rejected.
        let mut pos = Position::from_fen("4r3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let before = pos;
        let m = Move::new(Square::E1, Square::E2, Piece::K, None, false, false, false, false);
        assert!(!pos.make_move(m, MoveFlag::AllMoves));
        assert_eq!(pos, before);
    }

    #[test]
    fn fifty_move_threshold_is_crossed_strictly_above_fifty() {
        let mut pos = Position::default();
        pos.halfmove = 50;
        assert!(!pos.is_fifty_move_draw());
        pos.halfmove = 51;
        assert!(pos.is_fifty_move_draw());
    }

    #[test]
    fn castling_hops_the_rook() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let m = Move::new(Square::E1, Square::G1, Piece::K, None, false, false, false, true);
        assert!(pos.make_move(m, MoveFlag::AllMoves));
        assert!(pos.piece_bitboard(Piece::R).contains(Square::F1));
        assert!(!pos.piece_bitboard(Piece::R).contains(Square::H1));
    }
}
