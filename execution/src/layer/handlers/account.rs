use super::super::*;
use liftoff_types::game;

impl<'a, S: State> Layer<'a, S> {
    // === Wallet Handler Methods ===

    pub(in crate::layer) async fn handle_register(
        &mut self,
        public: &PublicKey,
        name: &str,
    ) -> Vec<Event> {
        // Check if player already exists
        if self.get(&Key::Player(public.clone())).await.is_some() {
            return vec![Event::GameError {
                player: public.clone(),
                session_id: None,
                error_code: game::ERROR_PLAYER_ALREADY_REGISTERED,
                message: "Player already registered".to_string(),
            }];
        }

        let player = Player::new(name.to_string(), self.config.starting_balance);
        self.insert(Key::Player(public.clone()), Value::Player(player.clone()));

        vec![Event::PlayerRegistered {
            player: public.clone(),
            name: name.to_string(),
            balance: player.balance,
        }]
    }

    pub(in crate::layer) async fn handle_deposit(&mut self, public: &PublicKey) -> Vec<Event> {
        let mut player = match self.load_player(public).await {
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

        // Faucet rate limiting (dev/testing)
        let since_last = self.now_ms.saturating_sub(player.last_faucet_ms);
        if player.last_faucet_ms != 0 && since_last < self.config.faucet_interval_ms {
            return vec![Event::GameError {
                player: public.clone(),
                session_id: None,
                error_code: game::ERROR_RATE_LIMITED,
                message: "Faucet already claimed, try again later".to_string(),
            }];
        }

        let amount = self.config.faucet_amount;
        player.balance = player.balance.saturating_add(amount);
        player.last_faucet_ms = self.now_ms;

        self.insert(Key::Player(public.clone()), Value::Player(player.clone()));

        vec![Event::Deposited {
            player: public.clone(),
            amount,
            balance: player.balance,
        }]
    }

    pub(in crate::layer) async fn handle_withdraw(
        &mut self,
        public: &PublicKey,
        amount: u64,
    ) -> Vec<Event> {
        let mut player = match self.load_player(public).await {
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

        if amount == 0 || amount > player.withdraw_balance {
            return vec![Event::GameError {
                player: public.clone(),
                session_id: None,
                error_code: game::ERROR_INVALID_WITHDRAW,
                message: format!(
                    "Invalid withdrawal: have {}, requested {}",
                    player.withdraw_balance, amount
                ),
            }];
        }

        player.withdraw_balance -= amount;

        // Payment delivery happens off-system; the intent is recorded here
        // so an operator can pick it up.
        let mut withdrawals = match self.get(&Key::Withdrawals(public.clone())).await {
            Some(Value::Withdrawals(withdrawals)) => withdrawals,
            _ => game::PendingWithdrawals::default(),
        };
        withdrawals.push(game::WithdrawalIntent {
            amount,
            requested_at_ms: self.now_ms,
        });

        self.insert(Key::Withdrawals(public.clone()), Value::Withdrawals(withdrawals));
        self.insert(Key::Player(public.clone()), Value::Player(player.clone()));

        vec![Event::Withdrawn {
            player: public.clone(),
            amount,
            balance: player.balance,
            withdraw_balance: player.withdraw_balance,
        }]
    }
}
