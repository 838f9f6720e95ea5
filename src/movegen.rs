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

//! Pseudo-legal move generation: every move a piece could make ignoring
//! whether it leaves the mover's own king in check. Legality is decided
//! afterward by [`crate::Position::make_move`], which applies the move and
//! rolls it back if the king ends up attacked.

use std::convert::TryFrom;

use crate::attacks::{KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};
use crate::magic::MAGIC;
use crate::{Bitboard, Move, Piece, Position, Side, Square};

/// Every pseudo-legal move available to the side to move in `pos`.
#[must_use]
pub fn generate_moves(pos: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(48);
    let both = pos.occupancy(Side::Both);

    match pos.turn {
        Side::White | Side::Both => {
            generate_pawn_moves(pos, Side::White, &mut moves);
            generate_king_castles(pos, Side::White, &mut moves);
        }
        Side::Black => {
            generate_pawn_moves(pos, Side::Black, &mut moves);
            generate_king_castles(pos, Side::Black, &mut moves);
        }
    }

    generate_leaper_moves(pos, Piece::knight(pos.turn), &KNIGHT_ATTACKS, &mut moves);
    generate_leaper_moves(pos, Piece::king(pos.turn), &KING_ATTACKS, &mut moves);
    generate_slider_moves(pos, Piece::bishop(pos.turn), both, SliderKind::Bishop, &mut moves);
    generate_slider_moves(pos, Piece::rook(pos.turn), both, SliderKind::Rook, &mut moves);
    generate_slider_moves(pos, Piece::queen(pos.turn), both, SliderKind::Queen, &mut moves);

    moves
}

/// Every pseudo-legal move that is a capture. A strict subset of
/// [`generate_moves`]'s output, provided as a cheaper alternative for
/// callers (e.g. quiescence search) that only want captures.
#[must_use]
pub fn generate_captures(pos: &Position) -> Vec<Move> {
    generate_moves(pos).into_iter().filter(|m| m.is_capture()).collect()
}

fn generate_pawn_moves(pos: &Position, side: Side, moves: &mut Vec<Move>) {
    let piece = Piece::pawn(side);
    let mut bitboard = pos.piece_bitboard(piece);
    let both = pos.occupancy(Side::Both);
    let enemies = pos.occupancy(!side);
    let (step, start_rank, promo_rank): (i32, i32, i32) = match side {
        Side::White | Side::Both => (8, 1, 7),
        Side::Black => (-8, 6, 0),
    };

    while let Some(source) = bitboard.pop_lsb() {
        let source_idx = source as i32;
        let target_idx = source_idx + step;

        if (0..64).contains(&target_idx) {
            let target = Square::try_from(target_idx as u8).unwrap();
            if !both.contains(target) {
                if target_idx / 8 == promo_rank {
                    push_promotions(source, target, piece, false, side, moves);
                } else {
                    moves.push(Move::new(source, target, piece, None, false, false, false, false));
                    let double_idx = target_idx + step;
                    if source_idx / 8 == start_rank {
                        let double_target = Square::try_from(double_idx as u8).unwrap();
                        if !both.contains(double_target) {
                            moves.push(Move::new(source, double_target, piece, None, false, true, false, false));
                        }
                    }
                }
            }
        }

        let mut attacks = Bitboard::new(PAWN_ATTACKS[side as usize][source as usize].value() & enemies.value());
        while let Some(target) = attacks.pop_lsb() {
            if target as i32 / 8 == promo_rank {
                push_promotions(source, target, piece, true, side, moves);
            } else {
                moves.push(Move::new(source, target, piece, None, true, false, false, false));
            }
        }

        if let Some(ep) = pos.en_passant {
            if PAWN_ATTACKS[side as usize][source as usize].contains(ep) {
                moves.push(Move::new(source, ep, piece, None, true, false, true, false));
            }
        }
    }
}

fn push_promotions(source: Square, target: Square, piece: Piece, capture: bool, side: Side, moves: &mut Vec<Move>) {
    for promoted in [
        Piece::queen(side),
        Piece::rook(side),
        Piece::bishop(side),
        Piece::knight(side),
    ] {
        moves.push(Move::new(source, target, piece, Some(promoted), capture, false, false, false));
    }
}

fn generate_king_castles(pos: &Position, side: Side, moves: &mut Vec<Move>) {
    let both = pos.occupancy(Side::Both);
    let opponent = !side;

    let (king_sq, kingside_empty, kingside_safe, queenside_empty, queenside_safe, king_target, queen_target): (
        Square,
        [Square; 2],
        [Square; 2],
        [Square; 3],
        [Square; 2],
        Square,
        Square,
    ) = match side {
        Side::White | Side::Both => (
            Square::E1,
            [Square::F1, Square::G1],
            [Square::E1, Square::F1],
            [Square::B1, Square::C1, Square::D1],
            [Square::E1, Square::D1],
            Square::G1,
            Square::C1,
        ),
        Side::Black => (
            Square::E8,
            [Square::F8, Square::G8],
            [Square::E8, Square::F8],
            [Square::B8, Square::C8, Square::D8],
            [Square::E8, Square::D8],
            Square::G8,
            Square::C8,
        ),
    };

    if pos.castle.is_kingside_castle_legal(side)
        && kingside_empty.iter().all(|&sq| !both.contains(sq))
        && kingside_safe.iter().all(|&sq| !pos.is_square_attacked(sq, opponent))
    {
        moves.push(Move::new(king_sq, king_target, Piece::king(side), None, false, false, false, true));
    }

    if pos.castle.is_queenside_castle_legal(side)
        && queenside_empty.iter().all(|&sq| !both.contains(sq))
        && queenside_safe.iter().all(|&sq| !pos.is_square_attacked(sq, opponent))
    {
        moves.push(Move::new(king_sq, queen_target, Piece::king(side), None, false, false, false, true));
    }
}

fn generate_leaper_moves(pos: &Position, piece: Piece, table: &[Bitboard; 64], moves: &mut Vec<Move>) {
    let own = pos.occupancy(pos.turn);
    let both = pos.occupancy(Side::Both);
    let mut bitboard = pos.piece_bitboard(piece);
    while let Some(source) = bitboard.pop_lsb() {
        let mut targets = Bitboard::new(table[source as usize].value() & !own.value());
        while let Some(target) = targets.pop_lsb() {
            let capture = both.contains(target);
            moves.push(Move::new(source, target, piece, None, capture, false, false, false));
        }
    }
}

#[derive(Clone, Copy)]
enum SliderKind {
    Bishop,
    Rook,
    Queen,
}

fn generate_slider_moves(pos: &Position, piece: Piece, both: Bitboard, kind: SliderKind, moves: &mut Vec<Move>) {
    let own = pos.occupancy(pos.turn);
    let mut bitboard = pos.piece_bitboard(piece);
    while let Some(source) = bitboard.pop_lsb() {
        let raw = match kind {
            SliderKind::Bishop => MAGIC.bishop_attacks(both, source as u8),
            SliderKind::Rook => MAGIC.rook_attacks(both, source as u8),
            SliderKind::Queen => MAGIC.queen_attacks(both, source as u8),
        };
        let mut targets = Bitboard::new(raw.value() & !own.value());
        while let Some(target) = targets.pop_lsb() {
            let capture = both.contains(target);
            moves.push(Move::new(source, target, piece, None, capture, false, false, false));
        }
    }
}

/// Every pseudo-legal move that, once made, turns out to keep the mover's
/// own king safe. Builds on [`generate_moves`] plus
/// [`crate::Position::make_move`]'s rollback, rather than tracking pins or
/// checkers directly.
#[must_use]
pub fn generate_legal_moves(pos: &Position) -> Vec<Move> {
    generate_moves(pos)
        .into_iter()
        .filter(|&m| {
            let mut copy = *pos;
            copy.make_move(m, crate::position::MoveFlag::AllMoves)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_has_twenty_moves() {
        let pos = Position::default();
        assert_eq!(generate_legal_moves(&pos).len(), 20);
    }

    #[test]
    fn kiwipete_has_forty_eight_legal_moves() {
        let pos = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        assert_eq!(generate_legal_moves(&pos).len(), 48);
    }

    #[test]
    fn en_passant_capture_is_generated() {
        let pos = Position::from_fen(
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
        )
        .unwrap();
        assert!(generate_moves(&pos)
            .iter()
            .any(|m| m.is_en_passant() && m.target() == Square::F6));
    }

    #[test]
    fn castling_blocked_by_occupied_square_is_not_generated() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R2QK2R w KQkq - 0 1").unwrap();
        assert!(!generate_moves(&pos)
            .iter()
            .any(|m| m.is_castling() && m.target() == Square::C1));
    }

    #[test]
    fn no_castling_rights_means_no_castling_moves() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap();
        assert!(!generate_moves(&pos).iter().any(|m| m.is_castling()));
    }
}
