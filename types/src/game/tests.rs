use super::*;
use commonware_codec::Encode;
use commonware_codec::ReadExt;
use commonware_cryptography::{
    ed25519::PrivateKey, sha256::Sha256, Hasher, PrivateKeyExt, Signer,
};
use rand::{rngs::StdRng, SeedableRng};

fn test_digest(tag: u8) -> commonware_cryptography::sha256::Digest {
    Sha256::hash(&[tag])
}

#[test]
fn test_player_roundtrip() {
    let mut player = Player::new("TestPlayer".to_string(), STARTING_BALANCE);
    player.withdraw_balance = 250;
    player.active_session = Some(7);
    player.last_faucet_ms = 1_000_000;

    let encoded = player.encode();
    let decoded = Player::read(&mut &encoded[..]).unwrap();
    assert_eq!(player, decoded);
}

#[test]
fn test_session_status_roundtrip() {
    for status in [
        SessionStatus::Running,
        SessionStatus::CashedOut {
            multiplier_bp: 23_500,
            payout: 470,
        },
        SessionStatus::Crashed,
    ] {
        let encoded = status.encode();
        let decoded = SessionStatus::read(&mut &encoded[..]).unwrap();
        assert_eq!(status, decoded);
    }
}

#[test]
fn test_session_roundtrip() {
    let mut rng = StdRng::seed_from_u64(1);
    let player = PrivateKey::from_rng(&mut rng).public_key();
    let session = WagerSession {
        id: 42,
        player,
        bet: 100,
        crash_point_bp: 31_337,
        salt: test_digest(1),
        commitment: test_digest(2),
        started_at_ms: 1_700_000_000_000,
        status: SessionStatus::Running,
    };

    let encoded = session.encode();
    let decoded = WagerSession::read(&mut &encoded[..]).unwrap();
    assert_eq!(session, decoded);
    assert!(decoded.status.is_running());
}

#[test]
fn test_history_cap_and_order() {
    let mut history = RoundHistory::default();
    for i in 0..(MAX_HISTORY_ENTRIES as u64 + 10) {
        history.push(HistoryEntry {
            session_id: i,
            bet: 10,
            crash_point_bp: 20_000,
            cashout_bp: None,
            payout: 0,
            resolved_at_ms: i,
        });
    }

    // Capped, newest first
    assert_eq!(history.entries.len(), MAX_HISTORY_ENTRIES);
    assert_eq!(history.entries[0].session_id, MAX_HISTORY_ENTRIES as u64 + 9);
    assert_eq!(history.recent(10).len(), 10);
    assert_eq!(history.recent(10)[9].session_id, MAX_HISTORY_ENTRIES as u64);

    let encoded = history.encode();
    let decoded = RoundHistory::read(&mut &encoded[..]).unwrap();
    assert_eq!(history, decoded);
}

#[test]
fn test_history_recent_beyond_len() {
    let mut history = RoundHistory::default();
    history.push(HistoryEntry {
        session_id: 1,
        bet: 5,
        crash_point_bp: 15_000,
        cashout_bp: Some(12_000),
        payout: 6,
        resolved_at_ms: 100,
    });
    assert_eq!(history.recent(50).len(), 1);
}

#[test]
fn test_withdrawals_cap_and_order() {
    let mut withdrawals = PendingWithdrawals::default();
    for i in 0..(MAX_PENDING_WITHDRAWALS as u64 + 5) {
        withdrawals.push(WithdrawalIntent {
            amount: i + 1,
            requested_at_ms: i,
        });
    }

    // Capped, newest first
    assert_eq!(withdrawals.intents.len(), MAX_PENDING_WITHDRAWALS);
    assert_eq!(
        withdrawals.intents[0].amount,
        MAX_PENDING_WITHDRAWALS as u64 + 5
    );

    let encoded = withdrawals.encode();
    let decoded = PendingWithdrawals::read(&mut &encoded[..]).unwrap();
    assert_eq!(withdrawals, decoded);
}
