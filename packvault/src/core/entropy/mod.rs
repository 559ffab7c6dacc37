//! Deterministic entropy stream for pack generation.
//!
//! Every draw the sampler and resolver make flows through a [`PackRng`]
//! seeded from the reveal-proof digest. Nothing in pack generation may touch
//! a platform RNG; identical digests must yield identical draw trajectories
//! forever.
//!
//! The reveal protocol fixes only the seed derivation and the draw order.
//! The generator itself is ChaCha20 (`rand_chacha::ChaCha20Rng`) seeded from
//! the raw 32-byte digest, and uniform doubles are built from the top 53 bits
//! of each 64-bit output. Reimplementations in other languages must reproduce
//! this exact generator and double construction to replay lineups; swapping
//! the generator silently breaks replay for every past session.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Deterministic draw stream for one pack request.
pub struct PackRng {
    inner: ChaCha20Rng,
}

impl PackRng {
    /// Seed a stream from a 32-byte digest.
    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self {
            inner: ChaCha20Rng::from_seed(digest),
        }
    }

    /// Draw a uniform double in `[0, 1)` with 53-bit precision.
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a uniform index in `[0, len)`, consuming exactly one draw.
    ///
    /// `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "next_index on empty range");
        let r = self.next_f64();
        let idx = (r * len as f64) as usize;
        idx.min(len - 1)
    }
}
