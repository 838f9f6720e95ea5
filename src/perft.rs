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

//! Performance testing, or "perft." Perft counts the leaves of the legal
//! move tree to a fixed depth, which is used both to validate move
//! generation (known-good node counts exist for many positions) and to
//! benchmark move generation and make/unmake speed.

use std::time::Instant;

use crate::movegen::generate_legal_moves;
use crate::position::MoveFlag;
use crate::Position;

#[must_use]
/// Count the legal move sequences from `pos` down to `depth`, logging
/// timing and speed. This is the node count used for move-generator
/// correctness checks and benchmarking.
pub fn perft(pos: &Position, depth: u8) -> u64 {
    let tic = Instant::now();
    let num_nodes = perft_search(pos, depth);
    let toc = Instant::now();
    let time = toc - tic;
    let speed = (num_nodes as f64) / time.as_secs_f64().max(f64::EPSILON);
    log::info!(
        "perft({depth}): {num_nodes} nodes in {:.2}s ({speed:.0} nodes/sec)",
        time.as_secs_f64()
    );

    num_nodes
}

#[must_use]
/// Convenience entry point that parses `fen` before running [`perft`].
///
/// # Panics
///
/// Panics if `fen` is not a legal FEN.
pub fn perft_fen(fen: &str, depth: u8) -> u64 {
    perft(&Position::from_fen(fen).unwrap(), depth)
}

/// Run perft from `pos` to `depth`, printing the node count contributed by
/// each of the position's root moves ("divide"). Returns the total.
#[must_use]
pub fn perft_divide(pos: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut total = 0;
    for m in generate_legal_moves(pos) {
        let mut child = *pos;
        if child.make_move(m, MoveFlag::AllMoves) {
            let count = perft_search(&child, depth - 1);
            println!("{m}: {count}");
            total += count;
        }
    }
    total
}

fn perft_search(pos: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut total = 0;
    for m in generate_legal_moves(pos) {
        let mut child = *pos;
        if child.make_move(m, MoveFlag::AllMoves) {
            total += perft_search(&child, depth - 1);
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perft_start_position() {
        perft_assistant(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            &[1, 20, 400, 8_902, 197_281],
        );
    }

    #[test]
    /// <https://www.chessprogramming.org/Perft_Results#Position_2>
    fn perft_kiwipete() {
        perft_assistant(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            &[1, 48, 2_039, 97_862, 4_085_603],
        );
    }

    #[test]
    /// <https://www.chessprogramming.org/Perft_Results#Position_3>
    fn perft_endgame() {
        perft_assistant(
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            &[1, 14, 191, 2_812, 43_238],
        );
    }

    #[test]
    /// <https://www.chessprogramming.org/Perft_Results#Position_4>
    fn perft_unbalanced() {
        perft_assistant(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            &[1, 6, 264, 9_467, 422_333],
        );
    }

    #[test]
    /// <https://www.chessprogramming.org/Perft_Results#Position_5>
    fn perft_edwards() {
        perft_assistant(
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            &[1, 44, 1_486, 62_379, 2_103_487],
        );
    }

    #[test]
    /// <https://www.chessprogramming.org/Perft_Results#Position_6>
    fn perft_edwards2() {
        perft_assistant(
            "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
            &[1, 46, 2_079, 89_890, 3_894_594],
        );
    }

    fn perft_assistant(fen: &str, node_counts: &[u64]) {
        for (i, num) in node_counts.iter().enumerate() {
            assert_eq!(*num, perft_fen(fen, i as u8));
        }
    }
}
