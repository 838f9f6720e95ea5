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

//! Attack mask generation: precomputed leaper tables (pawn, knight, king) and
//! the on-the-fly ray walks used both directly and to build the magic
//! tables in [`crate::magic`].

use once_cell::sync::Lazy;
use std::convert::TryFrom;

use super::{Bitboard, Side, Square, NOT_AB_FILE, NOT_A_FILE, NOT_HG_FILE, NOT_H_FILE};

/// Pawn attack masks, indexed `[side][square]`.
pub static PAWN_ATTACKS: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    for sq in 0u8..64 {
        table[Side::White as usize][sq as usize] = mask_pawn_attacks(Side::White, sq);
        table[Side::Black as usize][sq as usize] = mask_pawn_attacks(Side::Black, sq);
    }
    table
});

/// Knight attack masks, indexed by source square.
pub static KNIGHT_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    let mut table = [Bitboard::EMPTY; 64];
    for sq in 0u8..64 {
        table[sq as usize] = mask_knight_attacks(sq);
    }
    table
});

/// King attack masks, indexed by source square.
pub static KING_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    let mut table = [Bitboard::EMPTY; 64];
    for sq in 0u8..64 {
        table[sq as usize] = mask_king_attacks(sq);
    }
    table
});

/// Compute the squares a pawn of `side` standing on `square` attacks.
#[must_use]
pub fn mask_pawn_attacks(side: Side, square: u8) -> Bitboard {
    let bitboard = 1u64 << square;
    let attacks = match side {
        Side::White | Side::Both => {
            ((bitboard << 7) & NOT_H_FILE) | ((bitboard << 9) & NOT_A_FILE)
        }
        Side::Black => ((bitboard >> 7) & NOT_A_FILE) | ((bitboard >> 9) & NOT_H_FILE),
    };
    Bitboard::new(attacks)
}

/// Compute the squares a knight standing on `square` attacks.
#[must_use]
pub fn mask_knight_attacks(square: u8) -> Bitboard {
    let bitboard = 1u64 << square;
    let mut attacks = 0u64;
    attacks |= (bitboard << 17) & NOT_A_FILE;
    attacks |= (bitboard << 15) & NOT_H_FILE;
    attacks |= (bitboard << 10) & NOT_AB_FILE;
    attacks |= (bitboard << 6) & NOT_HG_FILE;
    attacks |= (bitboard >> 6) & NOT_AB_FILE;
    attacks |= (bitboard >> 10) & NOT_HG_FILE;
    attacks |= (bitboard >> 15) & NOT_A_FILE;
    attacks |= (bitboard >> 17) & NOT_H_FILE;
    Bitboard::new(attacks)
}

/// Compute the squares a king standing on `square` attacks.
#[must_use]
pub fn mask_king_attacks(square: u8) -> Bitboard {
    let bitboard = 1u64 << square;
    let mut attacks = 0u64;
    attacks |= bitboard >> 8;
    attacks |= bitboard << 8;
    attacks |= (bitboard >> 9) & NOT_H_FILE;
    attacks |= (bitboard << 9) & NOT_A_FILE;
    attacks |= (bitboard >> 7) & NOT_A_FILE;
    attacks |= (bitboard << 7) & NOT_H_FILE;
    attacks |= (bitboard >> 1) & NOT_H_FILE;
    attacks |= (bitboard << 1) & NOT_A_FILE;
    Bitboard::new(attacks)
}

/// Relevant-occupancy mask for a bishop on `square`: every square a bishop
/// could be blocked on, excluding the board edge (a blocker on the edge
/// itself doesn't change which squares beyond it are reachable, since there
/// is nothing beyond it).
#[must_use]
pub fn bishop_relevant_mask(square: u8) -> Bitboard {
    let tr = i32::from(square / 8);
    let tf = i32::from(square % 8);
    let mut attacks = 0u64;
    for &(dr, df) in &[(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let (mut r, mut f) = (tr + dr, tf + df);
        while (1..=6).contains(&r) && (1..=6).contains(&f) {
            attacks |= 1 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }
    Bitboard::new(attacks)
}

/// Relevant-occupancy mask for a rook on `square`.
#[must_use]
pub fn rook_relevant_mask(square: u8) -> Bitboard {
    let tr = i32::from(square / 8);
    let tf = i32::from(square % 8);
    let mut attacks = 0u64;
    for r in (tr + 1)..7 {
        attacks |= 1 << (r * 8 + tf);
    }
    for r in (1..tr).rev() {
        attacks |= 1 << (r * 8 + tf);
    }
    for f in (tf + 1)..7 {
        attacks |= 1 << (tr * 8 + f);
    }
    for f in (1..tf).rev() {
        attacks |= 1 << (tr * 8 + f);
    }
    Bitboard::new(attacks)
}

/// Full-range bishop attacks from `square`, stopping at (and including) the
/// first blocker in `blockers` along each diagonal. Used to populate the
/// magic attack tables offline; not on the hot path of move generation.
#[must_use]
pub fn bishop_attacks_on_the_fly(square: u8, blockers: Bitboard) -> Bitboard {
    let tr = i32::from(square / 8);
    let tf = i32::from(square % 8);
    let mut attacks = 0u64;
    for &(dr, df) in &[(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let (mut r, mut f) = (tr + dr, tf + df);
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let sq = (r * 8 + f) as u8;
            attacks |= 1 << sq;
            if blockers.contains(Square::try_from(sq).unwrap()) {
                break;
            }
            r += dr;
            f += df;
        }
    }
    Bitboard::new(attacks)
}

/// Full-range rook attacks from `square`, stopping at (and including) the
/// first blocker in `blockers` along each rank/file.
#[must_use]
pub fn rook_attacks_on_the_fly(square: u8, blockers: Bitboard) -> Bitboard {
    let tr = i32::from(square / 8);
    let tf = i32::from(square % 8);
    let mut attacks = 0u64;
    for r in (tr + 1)..8 {
        let sq = (r * 8 + tf) as u8;
        attacks |= 1 << sq;
        if blockers.contains(Square::try_from(sq).unwrap()) {
            break;
        }
    }
    for r in (0..tr).rev() {
        let sq = (r * 8 + tf) as u8;
        attacks |= 1 << sq;
        if blockers.contains(Square::try_from(sq).unwrap()) {
            break;
        }
    }
    for f in (tf + 1)..8 {
        let sq = (tr * 8 + f) as u8;
        attacks |= 1 << sq;
        if blockers.contains(Square::try_from(sq).unwrap()) {
            break;
        }
    }
    for f in (0..tf).rev() {
        let sq = (tr * 8 + f) as u8;
        attacks |= 1 << sq;
        if blockers.contains(Square::try_from(sq).unwrap()) {
            break;
        }
    }
    Bitboard::new(attacks)
}

/// Given an index in `0..(1 << bits_in_mask)` and the relevant-occupancy
/// mask for a square, scatter the index's bits across the mask's set bits
/// to produce one concrete occupancy subset. Enumerating every index
/// produces every subset of the mask exactly once, which is how the magic
/// search verifies a candidate multiplier is collision-free.
#[must_use]
pub fn index_to_occupancy(index: usize, mask: Bitboard) -> Bitboard {
    let mut occupancy = Bitboard::EMPTY;
    let mut mask = mask;
    let mut i = 0;
    while let Some(sq) = mask.pop_lsb() {
        if index & (1 << i) != 0 {
            occupancy.insert(sq);
        }
        i += 1;
    }
    occupancy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_in_corner_has_two_targets() {
        assert_eq!(mask_knight_attacks(Square::A1 as u8).len(), 2);
    }

    #[test]
    fn king_in_corner_has_three_targets() {
        assert_eq!(mask_king_attacks(Square::A1 as u8).len(), 3);
    }

    #[test]
    fn white_pawn_on_e4_attacks_d5_and_f5() {
        let attacks = mask_pawn_attacks(Side::White, Square::E4 as u8);
        assert!(attacks.contains(Square::D5));
        assert!(attacks.contains(Square::F5));
        assert_eq!(attacks.len(), 2);
    }

    #[test]
    fn bishop_relevant_mask_excludes_edges() {
        let mask = bishop_relevant_mask(Square::D4 as u8);
        assert!(!mask.contains(Square::A1));
        assert!(!mask.contains(Square::H8));
    }

    #[test]
    fn rook_attacks_on_the_fly_stop_at_blocker() {
        let mut blockers = Bitboard::EMPTY;
        blockers.insert(Square::D6);
        let attacks = rook_attacks_on_the_fly(Square::D4 as u8, blockers);
        assert!(attacks.contains(Square::D5));
        assert!(attacks.contains(Square::D6));
        assert!(!attacks.contains(Square::D7));
    }

    #[test]
    fn index_to_occupancy_round_trips_every_subset() {
        let mask = rook_relevant_mask(Square::A1 as u8);
        let bits = mask.len();
        for index in 0..(1usize << bits) {
            let occ = index_to_occupancy(index, mask);
            assert!(occ.value() & !mask.value() == 0);
        }
    }
}
