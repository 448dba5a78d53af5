//! Zobrist hashing keys for repetition detection.
//!
//! All keys come from one deterministic xorshift64 stream evaluated at
//! compile time, in this order: 12×128 piece-square keys (indexed by
//! [`Piece::index`] and the 0x88 square index), the side-to-move key, 16
//! castling-combination keys, then 8 en-passant-file keys.

use crate::castle_rights::CastleRights;
use crate::file::File;
use crate::piece::Piece;
use crate::square::Square;

struct Keys {
    piece_square: [[u64; Square::CELLS]; Piece::COUNT],
    side: u64,
    castling: [u64; 16],
    en_passant: [u64; 8],
}

static KEYS: Keys = generate();

const SEED: u64 = 0x5a4f_4252_4953_5421; // "ZOBRIST!"

/// Xorshift64 PRNG. Returns (value, next_state).
const fn xorshift64(mut state: u64) -> (u64, u64) {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    (state, state)
}

const fn generate() -> Keys {
    let mut keys = Keys {
        piece_square: [[0; Square::CELLS]; Piece::COUNT],
        side: 0,
        castling: [0; 16],
        en_passant: [0; 8],
    };
    let mut state = SEED;

    let mut piece = 0;
    while piece < Piece::COUNT {
        let mut sq = 0;
        while sq < Square::CELLS {
            let (val, next) = xorshift64(state);
            keys.piece_square[piece][sq] = val;
            state = next;
            sq += 1;
        }
        piece += 1;
    }

    let (val, next) = xorshift64(state);
    keys.side = val;
    state = next;

    let mut idx = 0;
    while idx < 16 {
        let (val, next) = xorshift64(state);
        keys.castling[idx] = val;
        state = next;
        idx += 1;
    }

    idx = 0;
    while idx < 8 {
        let (val, next) = xorshift64(state);
        keys.en_passant[idx] = val;
        state = next;
        idx += 1;
    }
    keys
}

#[inline]
pub(crate) fn piece_key(piece: Piece, sq: Square) -> u64 {
    KEYS.piece_square[piece.index()][sq.index()]
}

/// Key XORed in while Black is to move.
#[inline]
pub(crate) fn side_key() -> u64 {
    KEYS.side
}

#[inline]
pub(crate) fn castling_key(rights: CastleRights) -> u64 {
    KEYS.castling[rights.bits() as usize]
}

#[inline]
pub(crate) fn en_passant_key(file: File) -> u64 {
    KEYS.en_passant[file.index()]
}
