//! Pack engine: preview, build, accept, reject, admin settle, expiry sweep.
//!
//! The engine wires the commitment authority, sampler, resolver, inventory
//! reservation and session ledger into the transport-agnostic operation
//! surface. It prepares settlement handoffs but never talks to the
//! settlement gateway itself.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::CatalogStore;
use crate::commitments::CommitmentAuthority;
use crate::config::EngineConfig;
use crate::core::inventory::{InventoryStore, ReserveRequest};
use crate::core::resolver::{self, ResolvedSlot};
use crate::core::sampler::SlotLayout;
use crate::core::session::SessionStore;
use crate::pricing::PriceTable;
use crate::types::error::{PackVaultError, Result};
use crate::types::session_types::{
    Currency, PackSession, SessionState, SettlementHandoff,
};

/// Read-only pack preview: the lineup a seed would produce, plus the proof
/// material to audit it. No session is created, nothing is reserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackPreview {
    /// Resolved lineup in slot order; unresolved slots carry no template.
    pub lineup: Vec<ResolvedSlot>,
    /// Published commitment hash.
    pub commitment: String,
    /// Nonce derived from the caller seed.
    pub nonce: String,
    /// Reveal proof for this request.
    pub proof: String,
}

/// Outcome of a successful build: a pending session with reserved inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPack {
    /// Identifier of the pending session.
    pub session_id: String,
    /// Resolved lineup in slot order; every slot carries a template.
    pub lineup: Vec<ResolvedSlot>,
    /// Published commitment hash.
    pub commitment: String,
    /// Nonce derived from the caller seed.
    pub nonce: String,
    /// Reveal proof for this request.
    pub proof: String,
    /// Unix timestamp after which the session is inert.
    pub expires_at: i64,
}

/// The provably-fair pack engine.
pub struct PackEngine {
    authority: CommitmentAuthority,
    catalog: Arc<dyn CatalogStore>,
    inventory: Arc<dyn InventoryStore>,
    sessions: Arc<dyn SessionStore>,
    prices: PriceTable,
    session_ttl_secs: i64,
}

impl PackEngine {
    /// Assemble an engine from configuration and collaborator stores.
    pub fn new(
        config: &EngineConfig,
        catalog: Arc<dyn CatalogStore>,
        inventory: Arc<dyn InventoryStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            authority: CommitmentAuthority::new(config.secret_seed.clone()),
            catalog,
            inventory,
            sessions,
            prices: PriceTable::default(),
            session_ttl_secs: config.session_ttl_secs,
        }
    }

    /// Replace the default price table with one from the pricing source.
    pub fn with_price_table(mut self, prices: PriceTable) -> Self {
        self.prices = prices;
        self
    }

    /// The published commitment hash, constant for the engine's lifetime.
    pub fn commitment(&self) -> &str {
        self.authority.commitment()
    }

    /// Recompute nonce and proof from a disclosed secret and compare.
    pub fn verify_reveal(secret: &str, caller_seed: &str, nonce: &str, proof: &str) -> bool {
        CommitmentAuthority::verify_reveal(secret, caller_seed, nonce, proof)
    }

    /// Run the commit-reveal pipeline read-only and return the lineup a
    /// build with this seed would produce.
    pub fn preview(&self, caller_seed: &str, wallet: &str, pack_type: &str) -> Result<PackPreview> {
        let layout = Self::layout_for(pack_type)?;
        let (nonce, proof, lineup) = self.run_pipeline(caller_seed, layout);
        debug!(wallet, pack_type, nonce = %nonce, "pack preview generated");
        Ok(PackPreview {
            lineup,
            commitment: self.authority.commitment().to_string(),
            nonce,
            proof,
        })
    }

    /// Build a pack: resolve the lineup, reserve one unit per slot
    /// all-or-nothing, and persist a pending session with a decision window.
    ///
    /// A retried build with a new caller seed is always a fresh attempt;
    /// nothing of a previously failed attempt is reused.
    pub fn build(
        &self,
        caller_seed: &str,
        wallet: &str,
        pack_type: &str,
        currency: Currency,
    ) -> Result<BuiltPack> {
        let layout = Self::layout_for(pack_type)?;

        if !currency.has_required_accounts() {
            return Err(PackVaultError::CurrencyAccountsMissing);
        }

        let now = chrono::Utc::now().timestamp();
        let (nonce, proof, lineup) = self.run_pipeline(caller_seed, layout);

        // Every slot must have resolved to a template before anything is
        // reserved.
        let mut requests = Vec::with_capacity(lineup.len());
        for (slot_index, slot) in lineup.iter().enumerate() {
            match &slot.template {
                Some(template) => requests.push(ReserveRequest {
                    template_id: template.template_id,
                    slot_index,
                }),
                None => {
                    return Err(PackVaultError::OutOfStock {
                        template_id: None,
                        slot_index,
                    })
                }
            }
        }

        let unit_ids = self.inventory.reserve(&requests, wallet)?;

        let mut session = PackSession {
            session_id: Uuid::new_v4().to_string(),
            wallet: wallet.to_string(),
            pack_type: pack_type.to_string(),
            currency,
            rarities: lineup.iter().map(|s| s.rarity).collect(),
            unit_ids: unit_ids.clone(),
            commitment: self.authority.commitment().to_string(),
            nonce: nonce.clone(),
            proof: proof.clone(),
            state: SessionState::Pending,
            created_at: now,
            expires_at: now + self.session_ttl_secs,
            composition_hash: Vec::new(),
        };
        session.composition_hash = session.compute_hash();
        let session_id = session.session_id.clone();
        let expires_at = session.expires_at;

        // The insert is the atomic one-pending-session-per-wallet gate. If
        // it refuses, compensate by releasing everything reserved above.
        if let Err(err) = self.sessions.insert_pending(session, now) {
            self.inventory.release(&unit_ids)?;
            return Err(err);
        }

        info!(
            wallet,
            pack_type,
            session_id = %session_id,
            nonce = %nonce,
            "pack session built"
        );

        Ok(BuiltPack {
            session_id,
            lineup,
            commitment: self.authority.commitment().to_string(),
            nonce,
            proof,
            expires_at,
        })
    }

    /// Accept a pending session: transfer its units to the wallet and hand
    /// the composition to settlement.
    pub fn accept(&self, session_id: &str, wallet: &str) -> Result<SettlementHandoff> {
        let session = self.guarded_session(session_id, wallet)?;
        self.sessions
            .transition(session_id, SessionState::Pending, SessionState::Accepted)?;
        self.inventory.transfer(&session.unit_ids, wallet)?;

        info!(session_id, wallet, "pack session accepted");
        Ok(self.handoff(&session, SessionState::Accepted))
    }

    /// Reject a pending session: release its units back to the pool and hand
    /// the composition to settlement.
    pub fn reject(&self, session_id: &str, wallet: &str) -> Result<SettlementHandoff> {
        let session = self.guarded_session(session_id, wallet)?;
        self.sessions
            .transition(session_id, SessionState::Pending, SessionState::Rejected)?;
        self.inventory.release(&session.unit_ids)?;

        info!(session_id, wallet, "pack session rejected");
        Ok(self.handoff(&session, SessionState::Rejected))
    }

    /// Operator escape hatch: force any existing session to settled,
    /// bypassing ownership, state and expiry checks. Units the session still
    /// held in reservation are released.
    pub fn admin_settle(&self, session_id: &str) -> Result<PackSession> {
        let prior = self.sessions.force_state(session_id, SessionState::Settled)?;
        if prior.state == SessionState::Pending {
            self.inventory.release(&prior.unit_ids)?;
        }
        warn!(session_id, prior_state = %prior.state, "session force-settled by operator");
        self.sessions
            .get(session_id)?
            .ok_or_else(|| PackVaultError::SessionNotFound(session_id.to_string()))
    }

    /// Close every pending session whose decision window has elapsed,
    /// releasing its units. Returns the number of sessions swept.
    ///
    /// Transitions are compare-and-set per session, so a sweep racing an
    /// accept or reject never double-processes one.
    pub fn sweep_expired(&self) -> Result<usize> {
        let now = chrono::Utc::now().timestamp();
        let mut swept = 0;
        for session in self.sessions.expired_pending(now)? {
            match self.sessions.transition(
                &session.session_id,
                SessionState::Pending,
                SessionState::Expired,
            ) {
                Ok(_) => {
                    self.inventory.release(&session.unit_ids)?;
                    swept += 1;
                }
                // Lost the race to an accept/reject/settle; nothing to do.
                Err(PackVaultError::InvalidState { .. }) => {}
                Err(err) => return Err(err),
            }
        }
        if swept > 0 {
            info!(swept, "expired pack sessions swept");
        }
        Ok(swept)
    }

    /// Common accept/reject guards: existence, ownership, pending state,
    /// lazy expiry.
    fn guarded_session(&self, session_id: &str, wallet: &str) -> Result<PackSession> {
        let session = self
            .sessions
            .get(session_id)?
            .ok_or_else(|| PackVaultError::SessionNotFound(session_id.to_string()))?;

        if session.wallet != wallet {
            return Err(PackVaultError::WalletMismatch {
                session_id: session_id.to_string(),
                wallet: wallet.to_string(),
            });
        }
        if session.state != SessionState::Pending {
            return Err(PackVaultError::InvalidState {
                current: session.state,
            });
        }
        let now = chrono::Utc::now().timestamp();
        if session.is_expired(now) {
            return Err(PackVaultError::SessionExpired {
                session_id: session_id.to_string(),
            });
        }
        Ok(session)
    }

    fn handoff(&self, session: &PackSession, outcome: SessionState) -> SettlementHandoff {
        let prices = self.prices.price_vector(&session.rarities);
        let total_price = prices.iter().sum();
        SettlementHandoff {
            session_id: session.session_id.clone(),
            wallet: session.wallet.clone(),
            unit_ids: session.unit_ids.clone(),
            rarities: session.rarities.clone(),
            prices,
            total_price,
            outcome,
        }
    }

    fn run_pipeline(
        &self,
        caller_seed: &str,
        layout: &'static SlotLayout,
    ) -> (String, String, Vec<ResolvedSlot>) {
        let nonce = self.authority.derive_nonce(caller_seed);
        let proof = self.authority.reveal_proof(caller_seed, &nonce);
        let mut rng = self.authority.seed_stream(caller_seed, &nonce);
        let lineup = resolver::resolve_lineup(&mut rng, layout, self.catalog.as_ref());
        (nonce, proof, lineup)
    }

    fn layout_for(pack_type: &str) -> Result<&'static SlotLayout> {
        SlotLayout::for_pack_type(pack_type)
            .ok_or_else(|| PackVaultError::UnsupportedPackType(pack_type.to_string()))
    }
}
