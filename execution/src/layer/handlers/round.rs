use super::super::*;
use crate::round::{commitment, crash_point_bp, multiplier_at_bp, RoundRng};
use liftoff_types::game::{self, RoundHistory, SessionStatus, WagerSession, BASIS_POINTS};

impl<'a, S: State> Layer<'a, S> {
    // === Round Handler Methods ===

    pub(in crate::layer) async fn handle_start(
        &mut self,
        public: &PublicKey,
        bet: u64,
    ) -> Vec<Event> {
        let player = match self.load_player(public).await {
            Some(player) => player,
            None => {
                return vec![Event::GameError {
                    player: public.clone(),
                    session_id: None,
                    error_code: game::ERROR_PLAYER_NOT_FOUND,
                    message: "Player not found".to_string(),
                }]
            }
        };

        if bet < self.config.min_bet {
            return vec![Event::GameError {
                player: public.clone(),
                session_id: None,
                error_code: game::ERROR_INVALID_BET,
                message: format!("Bet must be at least {}", self.config.min_bet),
            }];
        }

        // A stale active session (crash time already passed) is settled
        // here rather than blocking the new round.
        let mut events = Vec::new();
        if let Some(active_id) = player.active_session {
            match self.get(&Key::Session(active_id)).await {
                Some(Value::Session(active)) if active.status.is_running() => {
                    let elapsed = self.now_ms.saturating_sub(active.started_at_ms);
                    if multiplier_at_bp(elapsed) < active.crash_point_bp {
                        return vec![Event::GameError {
                            player: public.clone(),
                            session_id: Some(active_id),
                            error_code: game::ERROR_SESSION_ALREADY_ACTIVE,
                            message: "Another session is already active".to_string(),
                        }];
                    }
                    events.extend(self.settle(active, None).await);
                }
                _ => {
                    // Stale pointer to a session that is already settled
                    let mut player = player.clone();
                    player.active_session = None;
                    self.insert(Key::Player(public.clone()), Value::Player(player));
                }
            }
        }

        // Reload after any settlement above
        let mut player = match self.load_player(public).await {
            Some(player) => player,
            None => return events,
        };

        if player.balance < bet {
            events.push(Event::GameError {
                player: public.clone(),
                session_id: None,
                error_code: game::ERROR_INSUFFICIENT_BALANCE,
                message: format!("Insufficient balance: have {}, need {}", player.balance, bet),
            });
            return events;
        }

        let session_id = self.next_session_id().await;

        // The outcome is fixed now, before the round starts ticking:
        // draw the crash point and salt, publish only the commitment.
        let mut rng = RoundRng::new(&self.entropy, session_id);
        let crash_bp = crash_point_bp(&mut rng);
        let salt = rng.salt();
        let committed = commitment(session_id, crash_bp, &salt);

        player.balance -= bet;
        player.active_session = Some(session_id);
        self.insert(Key::Player(public.clone()), Value::Player(player));

        let session = WagerSession {
            id: session_id,
            player: public.clone(),
            bet,
            crash_point_bp: crash_bp,
            salt,
            commitment: committed,
            started_at_ms: self.now_ms,
            status: SessionStatus::Running,
        };
        self.insert(Key::Session(session_id), Value::Session(session));

        events.push(Event::RoundStarted {
            session_id,
            player: public.clone(),
            bet,
            started_at_ms: self.now_ms,
            commitment: committed,
        });
        events
    }

    pub(in crate::layer) async fn handle_cash_out(
        &mut self,
        public: &PublicKey,
        session_id: u64,
    ) -> Vec<Event> {
        let session = match self.get(&Key::Session(session_id)).await {
            Some(Value::Session(session)) => session,
            _ => {
                return vec![Event::GameError {
                    player: public.clone(),
                    session_id: Some(session_id),
                    error_code: game::ERROR_SESSION_NOT_FOUND,
                    message: "Session not found".to_string(),
                }]
            }
        };

        if &session.player != public {
            return vec![Event::GameError {
                player: public.clone(),
                session_id: Some(session_id),
                error_code: game::ERROR_SESSION_NOT_OWNED,
                message: "Session belongs to another player".to_string(),
            }];
        }

        if !session.status.is_running() {
            return vec![Event::GameError {
                player: public.clone(),
                session_id: Some(session_id),
                error_code: game::ERROR_ALREADY_RESOLVED,
                message: "Session already resolved".to_string(),
            }];
        }

        // The multiplier is computed from elapsed time alone; a cash-out
        // that arrives after the crash point settles as a loss.
        let elapsed = self.now_ms.saturating_sub(session.started_at_ms);
        let multiplier_bp = multiplier_at_bp(elapsed);
        if multiplier_bp >= session.crash_point_bp {
            return self.settle(session, None).await;
        }

        self.settle(session, Some(multiplier_bp)).await
    }

    pub(in crate::layer) async fn handle_resolve(
        &mut self,
        public: &PublicKey,
        session_id: u64,
    ) -> Vec<Event> {
        let session = match self.get(&Key::Session(session_id)).await {
            Some(Value::Session(session)) => session,
            _ => {
                return vec![Event::GameError {
                    player: public.clone(),
                    session_id: Some(session_id),
                    error_code: game::ERROR_SESSION_NOT_FOUND,
                    message: "Session not found".to_string(),
                }]
            }
        };

        if !session.status.is_running() {
            return vec![Event::GameError {
                player: public.clone(),
                session_id: Some(session_id),
                error_code: game::ERROR_ALREADY_RESOLVED,
                message: "Session already resolved".to_string(),
            }];
        }

        // Nothing to do while the round is still live
        self.settle_if_crashed(session_id).await
    }

    /// Settle `session_id` as crashed if it is running and its crash time
    /// has passed. Returns the settlement events, or an empty vec if the
    /// round is still live (or already settled).
    pub(in crate::layer) async fn settle_if_crashed(&mut self, session_id: u64) -> Vec<Event> {
        let session = match self.get(&Key::Session(session_id)).await {
            Some(Value::Session(session)) if session.status.is_running() => session,
            _ => return Vec::new(),
        };

        let elapsed = self.now_ms.saturating_sub(session.started_at_ms);
        if multiplier_at_bp(elapsed) < session.crash_point_bp {
            return Vec::new();
        }

        self.settle(session, None).await
    }

    async fn next_session_id(&mut self) -> u64 {
        let next = match self.get(&Key::SessionSeq).await {
            Some(Value::SessionSeq(next)) => next,
            _ => 0,
        };
        self.insert(Key::SessionSeq, Value::SessionSeq(next + 1));
        next
    }

    /// Settle a running session exactly once. Callers must have verified
    /// the session status is Running; `cashout_bp` is Some for a cash-out
    /// and None for a crash.
    async fn settle(&mut self, mut session: WagerSession, cashout_bp: Option<u64>) -> Vec<Event> {
        let payout = match cashout_bp {
            Some(multiplier_bp) => {
                ((session.bet as u128 * multiplier_bp as u128) / BASIS_POINTS as u128) as u64
            }
            None => 0,
        };

        session.status = match cashout_bp {
            Some(multiplier_bp) => SessionStatus::CashedOut {
                multiplier_bp,
                payout,
            },
            None => SessionStatus::Crashed,
        };
        self.insert(Key::Session(session.id), Value::Session(session.clone()));

        let mut balance = 0;
        if let Some(mut player) = self.load_player(&session.player).await {
            player.balance = player.balance.saturating_add(payout);
            if player.active_session == Some(session.id) {
                player.active_session = None;
            }
            balance = player.balance;
            self.insert(Key::Player(session.player.clone()), Value::Player(player));
        }

        let mut history = match self.get(&Key::History(session.player.clone())).await {
            Some(Value::History(history)) => history,
            _ => RoundHistory::default(),
        };
        history.push(HistoryEntry {
            session_id: session.id,
            bet: session.bet,
            crash_point_bp: session.crash_point_bp,
            cashout_bp,
            payout,
            resolved_at_ms: self.now_ms,
        });
        self.insert(Key::History(session.player.clone()), Value::History(history));

        vec![Event::RoundResolved {
            session_id: session.id,
            player: session.player.clone(),
            won: cashout_bp.is_some(),
            multiplier_bp: cashout_bp.unwrap_or(session.crash_point_bp),
            crash_point_bp: session.crash_point_bp,
            salt: session.salt,
            payout,
            balance,
        }]
    }
}
