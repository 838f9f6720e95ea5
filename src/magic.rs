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

//! Magic bitboards: perfect-hash lookup tables for sliding-piece attacks.
//!
//! A magic multiplier turns the relevant occupancy bits under a slider into
//! a dense index into a small precomputed attack table, replacing what would
//! otherwise be a loop walking rays one square at a time. The multipliers
//! below were found offline (see [`find_magic_number`]) and are simply
//! loaded at startup; nothing about move generation depends on being able to
//! regenerate them.

use once_cell::sync::Lazy;

use crate::attacks::{
    bishop_attacks_on_the_fly, bishop_relevant_mask, index_to_occupancy, rook_attacks_on_the_fly,
    rook_relevant_mask,
};
use crate::Bitboard;

/// Relevant bishop-occupancy bit counts per square, i.e. the size of the
/// mask `bishop_relevant_mask` produces for that square.
pub const BISHOP_RELEVANT_BITS: [u8; 64] = [
    6, 5, 5, 5, 5, 5, 5, 6, //
    5, 5, 5, 5, 5, 5, 5, 5, //
    5, 5, 7, 7, 7, 7, 5, 5, //
    5, 5, 7, 9, 9, 7, 5, 5, //
    5, 5, 7, 9, 9, 7, 5, 5, //
    5, 5, 7, 7, 7, 7, 5, 5, //
    5, 5, 5, 5, 5, 5, 5, 5, //
    6, 5, 5, 5, 5, 5, 5, 6, //
];

/// Relevant rook-occupancy bit counts per square.
pub const ROOK_RELEVANT_BITS: [u8; 64] = [
    12, 11, 11, 11, 11, 11, 11, 12, //
    11, 10, 10, 10, 10, 10, 10, 11, //
    11, 10, 10, 10, 10, 10, 10, 11, //
    11, 10, 10, 10, 10, 10, 10, 11, //
    11, 10, 10, 10, 10, 10, 10, 11, //
    11, 10, 10, 10, 10, 10, 10, 11, //
    11, 10, 10, 10, 10, 10, 10, 11, //
    12, 11, 11, 11, 11, 11, 11, 12, //
];

/// Known-good bishop magic multipliers, one per square, found offline.
pub const BISHOP_MAGICS: [u64; 64] = [
    9_368_648_609_924_554_880,
    9_009_475_591_934_976,
    4_504_776_450_605_056,
    1_130_334_595_844_096,
    1_725_202_480_235_520,
    288_516_396_277_699_584,
    613_618_303_369_805_920,
    10_168_455_467_108_368,
    9_046_920_051_966_080,
    36_031_066_926_022_914,
    1_152_925_941_509_587_232,
    9_301_886_096_196_101,
    290_536_121_828_773_904,
    5_260_205_533_369_993_472,
    7_512_287_909_098_426_400,
    153_141_218_749_450_240,
    9_241_386_469_758_076_456,
    5_352_528_174_448_640_064,
    2_310_346_668_982_272_096,
    1_154_049_638_051_909_890,
    282_645_627_930_625,
    2_306_405_976_892_514_304,
    11_534_281_888_680_707_074,
    72_339_630_111_982_113,
    8_149_474_640_617_539_202,
    2_459_884_588_819_024_896,
    11_675_583_734_899_409_218,
    1_196_543_596_102_144,
    5_774_635_144_585_216,
    145_242_600_416_216_065,
    2_522_607_328_671_633_440,
    145_278_609_400_071_184,
    5_101_802_674_455_216,
    650_979_603_259_904,
    9_511_646_410_653_040_801,
    1_153_493_285_013_424_640,
    18_016_048_314_974_752,
    4_688_397_299_729_694_976,
    9_226_754_220_791_842_050,
    4_611_969_694_574_863_363,
    145_532_532_652_773_378,
    5_265_289_125_480_634_376,
    288_239_448_330_604_544,
    2_395_019_802_642_432,
    14_555_704_381_721_968_898,
    2_324_459_974_457_168_384,
    23_652_833_739_932_677,
    282_583_111_844_497,
    4_629_880_776_036_450_560,
    5_188_716_322_066_279_440,
    146_367_151_686_549_765,
    1_153_170_821_083_299_856,
    2_315_697_107_408_912_522,
    2_342_448_293_961_403_408,
    2_309_255_902_098_161_920,
    469_501_395_595_331_584,
    4_615_626_809_856_761_874,
    576_601_773_662_552_642,
    621_501_155_230_386_208,
    13_835_058_055_890_469_376,
    3_748_138_521_932_726_784,
    9_223_517_207_018_883_457,
    9_237_736_128_969_216_257,
    1_127_068_154_855_556,
];

/// Known-good rook magic multipliers, one per square, found offline.
pub const ROOK_MAGICS: [u64; 64] = [
    612_498_416_294_952_992,
    2_377_936_612_260_610_304,
    36_037_730_568_766_080,
    72_075_188_908_654_856,
    144_119_655_536_003_584,
    5_836_666_216_720_237_568,
    9_403_535_813_175_676_288,
    1_765_412_295_174_865_024,
    3_476_919_663_777_054_752,
    288_300_746_238_222_339,
    9_288_811_671_472_386,
    146_648_600_474_026_240,
    3_799_946_587_537_536,
    704_237_264_700_928,
    10_133_167_915_730_964,
    2_305_983_769_267_405_952,
    9_223_634_270_415_749_248,
    10_344_480_540_467_205,
    9_376_496_898_355_021_824,
    2_323_998_695_235_782_656,
    9_241_527_722_809_755_650,
    189_159_985_010_188_292,
    2_310_421_375_767_019_786,
    4_647_717_014_536_733_827,
    5_585_659_813_035_147_264,
    1_442_911_135_872_321_664,
    140_814_801_969_667,
    1_188_959_108_457_300_100,
    288_815_318_485_696_640,
    758_869_733_499_076_736,
    234_750_139_167_147_013,
    2_305_924_931_420_225_604,
    9_403_727_128_727_390_345,
    9_223_970_239_903_959_360,
    309_094_713_112_139_074,
    38_290_492_990_967_808,
    3_461_016_597_114_651_648,
    181_289_678_366_835_712,
    4_927_518_981_226_496_513,
    1_155_212_901_905_072_225,
    36_099_167_912_755_202,
    9_024_792_514_543_648,
    4_611_826_894_462_124_048,
    291_045_264_466_247_688,
    83_880_127_713_378_308,
    1_688_867_174_481_936,
    563_516_973_121_544,
    9_227_888_831_703_941_123,
    703_691_741_225_216,
    45_203_259_517_829_248,
    693_563_138_976_596_032,
    4_038_638_777_286_134_272,
    865_817_582_546_978_176,
    13_835_621_555_058_516_608,
    11_541_041_685_463_296,
    288_511_853_443_695_360,
    283_749_161_902_275,
    176_489_098_445_378,
    2_306_124_759_338_845_321,
    720_584_805_193_941_061,
    4_977_040_710_267_061_250,
    10_097_633_331_715_778_562,
    325_666_550_235_288_577,
    1_100_057_149_646,
];

/// The precomputed mask, magic multiplier, shift, and attack table for one
/// square of one slider type.
struct SquareAttacks {
    mask: Bitboard,
    magic: u64,
    shift: u8,
    attacks: Vec<Bitboard>,
}

impl SquareAttacks {
    #[inline(always)]
    fn index(&self, occupancy: Bitboard) -> usize {
        let relevant = Bitboard::new(occupancy.value() & self.mask.value());
        let key = relevant.value().wrapping_mul(self.magic) >> self.shift;
        key as usize
    }

    #[inline(always)]
    fn lookup(&self, occupancy: Bitboard) -> Bitboard {
        self.attacks[self.index(occupancy)]
    }
}

/// The full set of magic attack tables for bishops and rooks, built once at
/// startup and shared read-only for the lifetime of the process.
pub struct AttacksTable {
    bishop: Vec<SquareAttacks>,
    rook: Vec<SquareAttacks>,
}

impl AttacksTable {
    fn load() -> AttacksTable {
        let mut bishop = Vec::with_capacity(64);
        let mut rook = Vec::with_capacity(64);

        for sq in 0u8..64 {
            let mask = bishop_relevant_mask(sq);
            let bits = BISHOP_RELEVANT_BITS[sq as usize];
            let magic = BISHOP_MAGICS[sq as usize];
            let shift = 64 - bits;
            let mut attacks = vec![Bitboard::EMPTY; 1 << bits];
            for index in 0..(1usize << bits) {
                let occupancy = index_to_occupancy(index, mask);
                let key = (occupancy.value().wrapping_mul(magic) >> shift) as usize;
                let computed = bishop_attacks_on_the_fly(sq, occupancy);
                if attacks[key] != Bitboard::EMPTY && attacks[key] != computed {
                    // A collision here means BISHOP_MAGICS is stale relative
                    // to bishop_relevant_mask/BISHOP_RELEVANT_BITS.
                    panic!("bishop magic collision at square {sq}");
                }
                attacks[key] = computed;
            }
            bishop.push(SquareAttacks {
                mask,
                magic,
                shift,
                attacks,
            });

            let mask = rook_relevant_mask(sq);
            let bits = ROOK_RELEVANT_BITS[sq as usize];
            let magic = ROOK_MAGICS[sq as usize];
            let shift = 64 - bits;
            let mut attacks = vec![Bitboard::EMPTY; 1 << bits];
            for index in 0..(1usize << bits) {
                let occupancy = index_to_occupancy(index, mask);
                let key = (occupancy.value().wrapping_mul(magic) >> shift) as usize;
                let computed = rook_attacks_on_the_fly(sq, occupancy);
                if attacks[key] != Bitboard::EMPTY && attacks[key] != computed {
                    panic!("rook magic collision at square {sq}");
                }
                attacks[key] = computed;
            }
            rook.push(SquareAttacks {
                mask,
                magic,
                shift,
                attacks,
            });
        }

        log::debug!("magic attack tables initialized for 64 squares");
        AttacksTable { bishop, rook }
    }

    #[inline(always)]
    #[must_use]
    /// The squares a bishop on `sq` attacks, given the full board occupancy.
    pub fn bishop_attacks(&self, occupancy: Bitboard, sq: u8) -> Bitboard {
        self.bishop[sq as usize].lookup(occupancy)
    }

    #[inline(always)]
    #[must_use]
    /// The squares a rook on `sq` attacks, given the full board occupancy.
    pub fn rook_attacks(&self, occupancy: Bitboard, sq: u8) -> Bitboard {
        self.rook[sq as usize].lookup(occupancy)
    }

    #[inline(always)]
    #[must_use]
    /// The squares a queen on `sq` attacks: the union of its bishop and rook
    /// reach.
    pub fn queen_attacks(&self, occupancy: Bitboard, sq: u8) -> Bitboard {
        Bitboard::new(
            self.bishop_attacks(occupancy, sq).value() | self.rook_attacks(occupancy, sq).value(),
        )
    }
}

/// The process-wide magic attack tables, built once on first use.
pub static MAGIC: Lazy<AttacksTable> = Lazy::new(AttacksTable::load);

#[allow(dead_code)]
/// Search for a magic multiplier for one square's relevant-occupancy mask by
/// brute force. Not called at runtime; this is the offline tool that
/// produced [`BISHOP_MAGICS`]/[`ROOK_MAGICS`] and would be used again if the
/// relevant-bit tables ever changed.
fn find_magic_number(
    sq: u8,
    relevant_bits: u8,
    mask: Bitboard,
    on_the_fly: impl Fn(u8, Bitboard) -> Bitboard,
) -> u64 {
    let occupancies: Vec<Bitboard> = (0..(1usize << relevant_bits))
        .map(|i| index_to_occupancy(i, mask))
        .collect();
    let references: Vec<Bitboard> = occupancies.iter().map(|&occ| on_the_fly(sq, occ)).collect();

    'candidate: for _ in 0..100_000_000u64 {
        let magic = random_sparse_u64();
        if ((mask.value().wrapping_mul(magic)) & 0xFF00_0000_0000_0000).count_ones() < 6 {
            continue;
        }
        let shift = 64 - relevant_bits;
        let mut used = vec![Bitboard::EMPTY; 1 << relevant_bits];
        let mut seen = vec![false; 1 << relevant_bits];
        for (occ, &reference) in occupancies.iter().zip(references.iter()) {
            let key = (occ.value().wrapping_mul(magic) >> shift) as usize;
            if seen[key] && used[key] != reference {
                continue 'candidate;
            }
            seen[key] = true;
            used[key] = reference;
        }
        return magic;
    }
    panic!("exhausted candidates without finding a usable magic number");
}

#[allow(dead_code)]
/// Sparse 64-bit candidates (the AND of three random draws) collide less
/// often than uniformly-random ones, since a magic multiplier only needs to
/// scatter a handful of high bits.
fn random_sparse_u64() -> u64 {
    fastrand::u64(..) & fastrand::u64(..) & fastrand::u64(..)
}

#[allow(dead_code)]
/// Regenerate and print both magic tables from scratch. A development tool,
/// not part of the public API.
fn generate_magics() {
    for sq in 0u8..64 {
        let bishop_mask = bishop_relevant_mask(sq);
        let bishop_magic = find_magic_number(
            sq,
            BISHOP_RELEVANT_BITS[sq as usize],
            bishop_mask,
            bishop_attacks_on_the_fly,
        );
        let rook_mask = rook_relevant_mask(sq);
        let rook_magic = find_magic_number(
            sq,
            ROOK_RELEVANT_BITS[sq as usize],
            rook_mask,
            rook_attacks_on_the_fly,
        );
        println!("square {sq}: bishop {bishop_magic}, rook {rook_magic}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Square;

    #[test]
    fn rook_on_d4_empty_board_reaches_whole_rank_and_file() {
        let attacks = MAGIC.rook_attacks(Bitboard::EMPTY, Square::D4 as u8);
        assert!(attacks.contains(Square::D1));
        assert!(attacks.contains(Square::D8));
        assert!(attacks.contains(Square::A4));
        assert!(attacks.contains(Square::H4));
        assert!(!attacks.contains(Square::D4));
    }

    #[test]
    fn bishop_on_d4_stops_at_blocker() {
        let mut occ = Bitboard::EMPTY;
        occ.insert(Square::F6);
        let attacks = MAGIC.bishop_attacks(occ, Square::D4 as u8);
        assert!(attacks.contains(Square::E5));
        assert!(attacks.contains(Square::F6));
        assert!(!attacks.contains(Square::G7));
    }

    #[test]
    fn queen_attacks_union_bishop_and_rook() {
        let occ = Bitboard::EMPTY;
        let queen = MAGIC.queen_attacks(occ, Square::D4 as u8);
        let bishop = MAGIC.bishop_attacks(occ, Square::D4 as u8);
        let rook = MAGIC.rook_attacks(occ, Square::D4 as u8);
        assert_eq!(queen.value(), bishop.value() | rook.value());
    }

    #[test]
    fn every_square_table_is_collision_free() {
        // AttacksTable::load() itself panics on collision; forcing Lazy
        // evaluation for every square is the assertion.
        for sq in 0u8..64 {
            let _ = MAGIC.bishop_attacks(Bitboard::EMPTY, sq);
            let _ = MAGIC.rook_attacks(Bitboard::EMPTY, sq);
        }
    }
}
