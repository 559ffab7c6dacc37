//! Session lifecycle: build, accept, reject, expiry, admin settlement.

mod common;

use common::{fixture, fixture_with, full_catalog, PACK_TYPE};
use packvault::{
    Currency, InventoryStore, PackSession, Rarity, SessionState, SessionStore, UnitStatus,
};

fn native() -> Currency {
    Currency::Native
}

#[test]
fn build_creates_a_pending_session_with_reserved_units() {
    let fx = fixture();
    let built = fx
        .engine
        .build("abc", "wallet-a", PACK_TYPE, native())
        .unwrap();

    assert_eq!(built.lineup.len(), 11);
    let session = fx.sessions.get(&built.session_id).unwrap().unwrap();
    assert_eq!(session.state, SessionState::Pending);
    assert_eq!(session.wallet, "wallet-a");
    assert_eq!(session.unit_ids.len(), 11);
    assert!(session.expires_at > session.created_at);
    assert!(session.verify_integrity());

    for unit_id in &session.unit_ids {
        let unit = fx.inventory.get_unit(unit_id).unwrap().unwrap();
        assert_eq!(unit.status, UnitStatus::Reserved);
        assert_eq!(unit.owner.as_deref(), Some("wallet-a"));
    }
}

#[test]
fn build_refuses_a_second_active_session() {
    let fx = fixture();
    fx.engine
        .build("abc", "wallet-a", PACK_TYPE, native())
        .unwrap();
    let err = fx
        .engine
        .build("def", "wallet-a", PACK_TYPE, native())
        .unwrap_err();
    assert_eq!(err.code(), "active_session_exists");

    // A different wallet is unaffected.
    fx.engine
        .build("def", "wallet-b", PACK_TYPE, native())
        .unwrap();
}

#[test]
fn build_guards_currency_accounts() {
    let fx = fixture();
    let err = fx
        .engine
        .build(
            "abc",
            "wallet-a",
            PACK_TYPE,
            Currency::Token {
                token_account: None,
            },
        )
        .unwrap_err();
    assert_eq!(err.code(), "currency_accounts_missing");

    fx.engine
        .build(
            "abc",
            "wallet-a",
            PACK_TYPE,
            Currency::Token {
                token_account: Some("token-acct-1".to_string()),
            },
        )
        .unwrap();
}

#[test]
fn build_rejects_unsupported_pack_types() {
    let fx = fixture();
    let err = fx
        .engine
        .build("abc", "wallet-a", "mega-bundle-v7", native())
        .unwrap_err();
    assert_eq!(err.code(), "unsupported_pack_type");
}

#[test]
fn accept_transfers_units_and_prepares_the_handoff() {
    let fx = fixture();
    let built = fx
        .engine
        .build("abc", "wallet-a", PACK_TYPE, native())
        .unwrap();

    let handoff = fx.engine.accept(&built.session_id, "wallet-a").unwrap();
    assert_eq!(handoff.session_id, built.session_id);
    assert_eq!(handoff.wallet, "wallet-a");
    assert_eq!(handoff.outcome, SessionState::Accepted);
    assert_eq!(handoff.unit_ids.len(), 11);
    assert_eq!(handoff.prices.len(), 11);
    assert_eq!(handoff.total_price, handoff.prices.iter().sum::<u64>());
    // Fixed slots anchor the floor of the price vector.
    assert_eq!(&handoff.prices[..4], &[1_000_000; 4]);
    assert_eq!(&handoff.prices[4..7], &[2_000_000; 3]);
    assert_eq!(handoff.prices[10], 1_000_000);

    let session = fx.sessions.get(&built.session_id).unwrap().unwrap();
    assert_eq!(session.state, SessionState::Accepted);
    for unit_id in &handoff.unit_ids {
        let unit = fx.inventory.get_unit(unit_id).unwrap().unwrap();
        assert_eq!(unit.status, UnitStatus::UserOwned);
        assert_eq!(unit.owner.as_deref(), Some("wallet-a"));
    }
}

#[test]
fn reject_releases_units_for_a_later_build() {
    let fx = fixture();
    let built = fx
        .engine
        .build("abc", "wallet-a", PACK_TYPE, native())
        .unwrap();
    let reserved = fx
        .sessions
        .get(&built.session_id)
        .unwrap()
        .unwrap()
        .unit_ids;

    let handoff = fx.engine.reject(&built.session_id, "wallet-a").unwrap();
    assert_eq!(handoff.outcome, SessionState::Rejected);

    for unit_id in &reserved {
        let unit = fx.inventory.get_unit(unit_id).unwrap().unwrap();
        assert_eq!(unit.status, UnitStatus::Available);
        assert_eq!(unit.owner, None);
    }

    // The same wallet can immediately build again with a fresh seed and
    // reclaim from the released pool.
    fx.engine
        .build("def", "wallet-a", PACK_TYPE, native())
        .unwrap();
}

#[test]
fn terminal_states_refuse_further_transitions() {
    let fx = fixture();
    let built = fx
        .engine
        .build("abc", "wallet-a", PACK_TYPE, native())
        .unwrap();
    fx.engine.accept(&built.session_id, "wallet-a").unwrap();

    let err = fx.engine.accept(&built.session_id, "wallet-a").unwrap_err();
    assert_eq!(err.code(), "invalid_state");
    let err = fx.engine.reject(&built.session_id, "wallet-a").unwrap_err();
    assert_eq!(err.code(), "invalid_state");
}

#[test]
fn ownership_and_existence_guards() {
    let fx = fixture();
    let built = fx
        .engine
        .build("abc", "wallet-a", PACK_TYPE, native())
        .unwrap();

    let err = fx.engine.accept(&built.session_id, "wallet-b").unwrap_err();
    assert_eq!(err.code(), "wallet_mismatch");

    let err = fx.engine.accept("no-such-session", "wallet-a").unwrap_err();
    assert_eq!(err.code(), "session_not_found");

    let err = fx.engine.admin_settle("no-such-session").unwrap_err();
    assert_eq!(err.code(), "session_not_found");
}

/// Plant an already-lapsed pending session holding real reservations.
fn plant_expired_session(fx: &common::Fixture, wallet: &str) -> PackSession {
    let unit_ids = fx
        .inventory
        .reserve(
            &[packvault::ReserveRequest {
                template_id: 1,
                slot_index: 0,
            }],
            wallet,
        )
        .unwrap();

    let now = chrono::Utc::now().timestamp();
    let mut session = PackSession {
        session_id: "expired-session".to_string(),
        wallet: wallet.to_string(),
        pack_type: PACK_TYPE.to_string(),
        currency: Currency::Native,
        rarities: vec![Rarity::Common],
        unit_ids,
        commitment: fx.engine.commitment().to_string(),
        nonce: "0123456789abcdef".to_string(),
        proof: "ab".repeat(32),
        state: SessionState::Pending,
        created_at: now - 7_200,
        expires_at: now - 3_600,
        composition_hash: Vec::new(),
    };
    session.composition_hash = session.compute_hash();
    fx.sessions.insert_pending(session.clone(), now).unwrap();
    session
}

#[test]
fn lapsed_pending_sessions_are_inert_before_any_sweep() {
    let fx = fixture();
    let planted = plant_expired_session(&fx, "wallet-a");

    let err = fx
        .engine
        .accept(&planted.session_id, "wallet-a")
        .unwrap_err();
    assert_eq!(err.code(), "session_expired");
    let err = fx
        .engine
        .reject(&planted.session_id, "wallet-a")
        .unwrap_err();
    assert_eq!(err.code(), "session_expired");

    // The lapsed session no longer counts against the wallet either.
    fx.engine
        .build("abc", "wallet-a", PACK_TYPE, native())
        .unwrap();
}

#[test]
fn sweep_closes_lapsed_sessions_and_releases_their_units() {
    let fx = fixture();
    let planted = plant_expired_session(&fx, "wallet-a");
    let before = fx.inventory.count_available(1).unwrap();

    assert_eq!(fx.engine.sweep_expired().unwrap(), 1);

    let session = fx.sessions.get(&planted.session_id).unwrap().unwrap();
    assert_eq!(session.state, SessionState::Expired);
    assert_eq!(fx.inventory.count_available(1).unwrap(), before + 1);

    // Nothing left to sweep.
    assert_eq!(fx.engine.sweep_expired().unwrap(), 0);
}

#[test]
fn admin_settle_overrides_any_state_and_releases_reservations() {
    let fx = fixture();
    let built = fx
        .engine
        .build("abc", "wallet-a", PACK_TYPE, native())
        .unwrap();
    let reserved = fx
        .sessions
        .get(&built.session_id)
        .unwrap()
        .unwrap()
        .unit_ids;

    let settled = fx.engine.admin_settle(&built.session_id).unwrap();
    assert_eq!(settled.state, SessionState::Settled);
    for unit_id in &reserved {
        let unit = fx.inventory.get_unit(unit_id).unwrap().unwrap();
        assert_eq!(unit.status, UnitStatus::Available);
    }

    // The escape hatch also closes sessions a user already resolved, without
    // touching their owned units.
    let built = fx
        .engine
        .build("def", "wallet-b", PACK_TYPE, native())
        .unwrap();
    fx.engine.accept(&built.session_id, "wallet-b").unwrap();
    let settled = fx.engine.admin_settle(&built.session_id).unwrap();
    assert_eq!(settled.state, SessionState::Settled);
    let unit = fx
        .inventory
        .get_unit(&settled.unit_ids[0])
        .unwrap()
        .unwrap();
    assert_eq!(unit.status, UnitStatus::UserOwned);
}

#[test]
fn missing_rarity_fails_the_build_at_the_rare_slot() {
    // Catalog with every rarity except DoubleRare.
    let templates: Vec<_> = full_catalog(3)
        .into_iter()
        .filter(|t| t.rarity != Rarity::DoubleRare)
        .collect();
    let fx = fixture_with(templates, 10);

    // Hunt for a seed whose rare-or-better slot draws DoubleRare; the rarity
    // stream is catalog-independent, so the sparse catalog previews it too.
    let seed = (0..400)
        .map(|i| format!("seed-{i}"))
        .find(|seed| {
            let preview = fx.engine.preview(seed, "wallet-a", PACK_TYPE).unwrap();
            preview.lineup[9].rarity == Rarity::DoubleRare
        })
        .expect("a DoubleRare draw within 400 seeds");

    let err = fx
        .engine
        .build(&seed, "wallet-a", PACK_TYPE, native())
        .unwrap_err();
    match err {
        packvault::PackVaultError::OutOfStock {
            template_id,
            slot_index,
        } => {
            assert_eq!(template_id, None);
            assert_eq!(slot_index, 9);
        }
        other => panic!("unexpected error: {other}"),
    }

    // Nothing was reserved and no session persisted.
    for t in full_catalog(3) {
        if t.rarity != Rarity::DoubleRare {
            assert_eq!(fx.inventory.count_available(t.template_id).unwrap(), 10);
        }
    }
}
