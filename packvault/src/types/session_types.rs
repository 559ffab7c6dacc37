//! Pack session types and lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::catalog_types::Rarity;

/// Lifecycle state of a pack session.
///
/// `Pending` is the only non-terminal state. A pending session whose expiry
/// has elapsed is logically expired even before an explicit transition is
/// recorded; callers must apply the lazy expiry check through
/// [`PackSession::is_expired`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Created by a build; awaiting the owner's accept/reject decision.
    Pending,
    /// Owner accepted; units transferred to the owner.
    Accepted,
    /// Owner rejected; units released back to the pool.
    Rejected,
    /// Expiry sweep closed the session and released its units.
    Expired,
    /// Operator force-settled the session.
    Settled,
}

impl SessionState {
    /// Stable string form used for persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Pending => "pending",
            SessionState::Accepted => "accepted",
            SessionState::Rejected => "rejected",
            SessionState::Expired => "expired",
            SessionState::Settled => "settled",
        }
    }

    /// Parse the stable string form back into a state.
    pub fn parse(s: &str) -> Option<SessionState> {
        match s {
            "pending" => Some(SessionState::Pending),
            "accepted" => Some(SessionState::Accepted),
            "rejected" => Some(SessionState::Rejected),
            "expired" => Some(SessionState::Expired),
            "settled" => Some(SessionState::Settled),
            _ => None,
        }
    }

    /// Whether the state accepts no further owner transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Pending)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Currency selected for a build.
///
/// Token payments settle through a token account the caller must supply;
/// native payments need no extra account material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    /// Native ledger currency.
    Native,
    /// Token payment through the given token account.
    Token {
        /// Caller's token account; required before a build is admitted.
        token_account: Option<String>,
    },
}

impl Currency {
    /// Whether the selection carries all account material it needs.
    pub fn has_required_accounts(&self) -> bool {
        match self {
            Currency::Native => true,
            Currency::Token { token_account } => token_account.is_some(),
        }
    }
}

/// The aggregate produced by one build: composition, proof material and
/// lifecycle state of a single pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackSession {
    /// Unique session identifier.
    pub session_id: String,

    /// Wallet that built the pack and owns the decision window.
    pub wallet: String,

    /// Pack type the session was built for.
    pub pack_type: String,

    /// Currency selected at build time.
    pub currency: Currency,

    /// Resolved rarities in slot order.
    pub rarities: Vec<Rarity>,

    /// Reserved inventory unit identifiers in slot order.
    pub unit_ids: Vec<String>,

    /// Published commitment hash active when the session was built.
    pub commitment: String,

    /// Nonce derived from the caller seed.
    pub nonce: String,

    /// Auditable reveal proof for this session's entropy.
    pub proof: String,

    /// Current lifecycle state.
    pub state: SessionState,

    /// Unix timestamp of creation.
    pub created_at: i64,

    /// Unix timestamp after which the session is inert.
    pub expires_at: i64,

    /// Integrity hash over the session composition.
    pub composition_hash: Vec<u8>,
}

impl PackSession {
    /// Compute the deterministic integrity hash over this session's
    /// composition and proof material.
    pub fn compute_hash(&self) -> Vec<u8> {
        let mut hasher = blake3::Hasher::new();

        hasher.update(self.session_id.as_bytes());
        hasher.update(self.wallet.as_bytes());
        hasher.update(self.pack_type.as_bytes());

        let rarities_bytes = bincode::serialize(&self.rarities).unwrap_or_default();
        hasher.update(&rarities_bytes);

        for unit_id in &self.unit_ids {
            hasher.update(unit_id.as_bytes());
        }

        hasher.update(self.commitment.as_bytes());
        hasher.update(self.nonce.as_bytes());
        hasher.update(self.proof.as_bytes());
        hasher.update(&self.created_at.to_le_bytes());
        hasher.update(&self.expires_at.to_le_bytes());

        hasher.finalize().as_bytes().to_vec()
    }

    /// Verify the stored composition hash against a recomputation.
    pub fn verify_integrity(&self) -> bool {
        self.compute_hash() == self.composition_hash
    }

    /// Lazy expiry check: a pending session past its deadline is inert even
    /// if no sweep has recorded the transition yet.
    pub fn is_expired(&self, now: i64) -> bool {
        now > self.expires_at
    }
}

/// Data handed to the settlement gateway after an accept or reject.
///
/// The engine only prepares this payload; it never submits anything to the
/// gateway itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementHandoff {
    /// Session being settled.
    pub session_id: String,

    /// Wallet the settlement concerns.
    pub wallet: String,

    /// Reserved unit identifiers in slot order.
    pub unit_ids: Vec<String>,

    /// Resolved rarities in slot order.
    pub rarities: Vec<Rarity>,

    /// Price per slot in smallest currency units, aligned with `rarities`.
    pub prices: Vec<u64>,

    /// Sum of `prices`.
    pub total_price: u64,

    /// Outcome the gateway should settle: accepted or rejected.
    pub outcome: SessionState,
}
