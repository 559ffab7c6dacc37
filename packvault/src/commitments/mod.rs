//! Commit-reveal commitments for provably fair pack generation.

pub mod authority;

pub use authority::{CommitmentAuthority, NONCE_HEX_LEN};
