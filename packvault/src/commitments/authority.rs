//! Commit-reveal authority for pack randomness.
//!
//! The authority owns the process-wide secret seed and publishes its SHA-256
//! hash as the commitment before any caller input exists. Per request it
//! derives a nonce binding the caller seed to the commitment, a reveal proof
//! a caller can verify once the secret is disclosed, and the digest that
//! seeds the deterministic draw stream.
//!
//! Rotating the secret invalidates reproducibility of every past session;
//! the commitment is the audit anchor and never changes during a process
//! lifetime.

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::core::entropy::PackRng;

/// Length of a derived nonce in hex characters.
pub const NONCE_HEX_LEN: usize = 16;

/// Owns the secret seed and the published commitment.
pub struct CommitmentAuthority {
    secret: String,
    commitment: String,
}

impl CommitmentAuthority {
    /// Fix the secret and compute its published commitment.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        let commitment = hex::encode(Sha256::digest(secret.as_bytes()));
        Self { secret, commitment }
    }

    /// The published commitment: `hex(SHA256(secret))`. Constant for the
    /// authority's lifetime.
    pub fn commitment(&self) -> &str {
        &self.commitment
    }

    /// Derive the per-request nonce from a caller seed.
    ///
    /// `nonce = hex(SHA256(commitment ":" caller_seed))[..16]`. Pure function
    /// of the published commitment and the caller seed; the empty seed is
    /// valid and still deterministic.
    pub fn derive_nonce(&self, caller_seed: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.commitment.as_bytes());
        hasher.update(b":");
        hasher.update(caller_seed.as_bytes());
        let digest = hex::encode(hasher.finalize());
        digest[..NONCE_HEX_LEN].to_string()
    }

    /// The auditable entropy commitment for one request.
    ///
    /// `proof = hex(SHA256(secret ":" caller_seed ":" nonce))`, full digest.
    /// A caller holding the disclosed secret can recompute this and compare.
    pub fn reveal_proof(&self, caller_seed: &str, nonce: &str) -> String {
        hex::encode(Self::request_digest(&self.secret, caller_seed, nonce))
    }

    /// Seed the deterministic draw stream for one request.
    ///
    /// Same `(secret, caller_seed, nonce)` always yields the same generator
    /// trajectory.
    pub fn seed_stream(&self, caller_seed: &str, nonce: &str) -> PackRng {
        PackRng::from_digest(Self::request_digest(&self.secret, caller_seed, nonce))
    }

    /// Recompute nonce and proof from a disclosed secret and compare.
    ///
    /// This is the audit path a caller runs after the operator reveals the
    /// secret; it does not require a live authority.
    pub fn verify_reveal(secret: &str, caller_seed: &str, nonce: &str, proof: &str) -> bool {
        let authority = CommitmentAuthority::new(secret);
        authority.derive_nonce(caller_seed) == nonce
            && authority.reveal_proof(caller_seed, nonce) == proof
    }

    fn request_digest(secret: &str, caller_seed: &str, nonce: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hasher.update(b":");
        hasher.update(caller_seed.as_bytes());
        hasher.update(b":");
        hasher.update(nonce.as_bytes());
        hasher.finalize().into()
    }
}

impl Drop for CommitmentAuthority {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

impl std::fmt::Debug for CommitmentAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The secret never appears in logs or debug output.
        f.debug_struct("CommitmentAuthority")
            .field("commitment", &self.commitment)
            .finish_non_exhaustive()
    }
}
