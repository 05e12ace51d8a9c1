use commonware_cryptography::ed25519::PublicKey;
use liftoff_types::{
    api::BalanceView,
    execution::{Event, Instruction, Key, Output, Transaction, Value},
    game::{EngineConfig, HistoryEntry, Player},
};
use std::collections::BTreeMap;
use tracing::debug;

use crate::state::{load_account, validate_and_increment_nonce, PrepareError, State, Status};

mod handlers;

pub struct Layer<'a, S: State> {
    state: &'a S,
    pending: BTreeMap<Key, Status>,

    config: EngineConfig,
    now_ms: u64,
    entropy: [u8; 32],
}

impl<'a, S: State> Layer<'a, S> {
    pub fn new(state: &'a S, config: EngineConfig, now_ms: u64, entropy: [u8; 32]) -> Self {
        Self {
            state,
            pending: BTreeMap::new(),

            config,
            now_ms,
            entropy,
        }
    }

    fn insert(&mut self, key: Key, value: Value) {
        self.pending.insert(key, Status::Update(value));
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    async fn prepare(&mut self, transaction: &Transaction) -> Result<(), PrepareError> {
        let mut account = load_account(self, &transaction.public).await;
        validate_and_increment_nonce(&mut account, transaction.nonce)?;
        self.insert(
            Key::Account(transaction.public.clone()),
            Value::Account(account),
        );

        Ok(())
    }

    async fn apply(&mut self, transaction: &Transaction) -> Vec<Event> {
        match &transaction.instruction {
            Instruction::Register { name } => {
                self.handle_register(&transaction.public, name).await
            }
            Instruction::Deposit => self.handle_deposit(&transaction.public).await,
            Instruction::Withdraw { amount } => {
                self.handle_withdraw(&transaction.public, *amount).await
            }
            Instruction::Start { bet } => self.handle_start(&transaction.public, *bet).await,
            Instruction::CashOut { session_id } => {
                self.handle_cash_out(&transaction.public, *session_id).await
            }
            Instruction::Resolve { session_id } => {
                self.handle_resolve(&transaction.public, *session_id).await
            }
        }
    }

    async fn load_player(&self, public: &PublicKey) -> Option<Player> {
        match self.get(&Key::Player(public.clone())).await {
            Some(Value::Player(player)) => Some(player),
            _ => None,
        }
    }

    /// Query a player's funds, settling their active session first if its
    /// crash time has already passed.
    pub async fn read_balance(&mut self, public: &PublicKey) -> Option<BalanceView> {
        let player = self.load_player(public).await?;
        if let Some(session_id) = player.active_session {
            self.settle_if_crashed(session_id).await;
        }

        let player = self.load_player(public).await?;
        Some(BalanceView {
            balance: player.balance,
            withdraw_balance: player.withdraw_balance,
            active_session: player.active_session,
        })
    }

    /// Query a player's round history, most recent first. Settles the
    /// active session first so a just-crashed round is included.
    pub async fn read_history(&mut self, public: &PublicKey, limit: usize) -> Vec<HistoryEntry> {
        if let Some(player) = self.load_player(public).await {
            if let Some(session_id) = player.active_session {
                self.settle_if_crashed(session_id).await;
            }
        }

        match self.get(&Key::History(public.clone())).await {
            Some(Value::History(history)) => history.recent(limit).to_vec(),
            _ => Vec::new(),
        }
    }

    pub async fn execute(&mut self, transactions: Vec<Transaction>) -> Vec<Output> {
        let mut outputs = Vec::new();

        for tx in transactions {
            if let Err(err) = self.prepare(&tx).await {
                debug!(?err, "skipping transaction");
                continue;
            }
            outputs.extend(self.apply(&tx).await.into_iter().map(Output::Event));
            outputs.push(Output::Transaction(tx));
        }

        outputs
    }

    pub fn commit(self) -> Vec<(Key, Status)> {
        self.pending.into_iter().collect()
    }
}

impl<'a, S: State> State for Layer<'a, S> {
    async fn get(&self, key: &Key) -> Option<Value> {
        match self.pending.get(key) {
            Some(Status::Update(value)) => Some(value.clone()),
            Some(Status::Delete) => None,
            None => self.state.get(key).await,
        }
    }

    async fn insert(&mut self, key: Key, value: Value) {
        self.pending.insert(key, Status::Update(value));
    }

    async fn delete(&mut self, key: &Key) {
        self.pending.insert(key.clone(), Status::Delete);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{create_account_keypair, create_entropy, test_config};
    use commonware_runtime::deterministic::Runner;
    use commonware_runtime::Runner as _;

    struct MockState {
        data: std::collections::HashMap<Key, Value>,
    }

    impl MockState {
        fn new() -> Self {
            Self {
                data: std::collections::HashMap::new(),
            }
        }
    }

    impl State for MockState {
        async fn get(&self, key: &Key) -> Option<Value> {
            self.data.get(key).cloned()
        }

        async fn insert(&mut self, key: Key, value: Value) {
            self.data.insert(key, value);
        }

        async fn delete(&mut self, key: &Key) {
            self.data.remove(key);
        }
    }

    #[test]
    fn test_nonce_validation() {
        let executor = Runner::default();
        executor.start(|_| async move {
            let state = MockState::new();
            let mut layer = Layer::new(&state, test_config(), 0, create_entropy(1));

            let (signer, _) = create_account_keypair(1);

            // Wrong nonce should fail
            let tx = Transaction::sign(
                &signer,
                1,
                Instruction::Register {
                    name: "test".to_string(),
                },
            );
            assert!(layer.prepare(&tx).await.is_err());

            // Correct nonce should succeed
            let tx = Transaction::sign(
                &signer,
                0,
                Instruction::Register {
                    name: "test".to_string(),
                },
            );
            assert!(layer.prepare(&tx).await.is_ok());

            let _ = layer.commit();
        });
    }

    #[test]
    fn test_register() {
        let executor = Runner::default();
        executor.start(|_| async move {
            let state = MockState::new();
            let config = test_config();
            let starting = config.starting_balance;
            let mut layer = Layer::new(&state, config, 0, create_entropy(1));

            let (signer, public) = create_account_keypair(1);

            // Register player
            let tx = Transaction::sign(
                &signer,
                0,
                Instruction::Register {
                    name: "Alice".to_string(),
                },
            );
            assert!(layer.prepare(&tx).await.is_ok());
            let events = layer.apply(&tx).await;

            assert_eq!(events.len(), 1);
            if let Event::PlayerRegistered {
                player,
                name,
                balance,
            } = &events[0]
            {
                assert_eq!(player, &public);
                assert_eq!(name, "Alice");
                assert_eq!(*balance, starting);
            } else {
                panic!("Expected PlayerRegistered event");
            }

            // Verify player was created
            if let Some(Value::Player(player)) = layer.get(&Key::Player(public)).await {
                assert_eq!(player.name, "Alice");
                assert_eq!(player.balance, starting);
                assert_eq!(player.active_session, None);
            } else {
                panic!("Player not found");
            }

            let _ = layer.commit();
        });
    }

    #[test]
    fn test_execute_skips_stale_nonce() {
        let executor = Runner::default();
        executor.start(|_| async move {
            let state = MockState::new();
            let mut layer = Layer::new(&state, test_config(), 0, create_entropy(2));

            let (signer, public) = create_account_keypair(2);

            let register = Transaction::sign(
                &signer,
                0,
                Instruction::Register {
                    name: "Bob".to_string(),
                },
            );
            // Replays the same nonce, so it must be dropped
            let replay = Transaction::sign(&signer, 0, Instruction::Deposit);

            let outputs = layer.execute(vec![register, replay]).await;
            assert_eq!(crate::state::nonce(&layer, &public).await, 1);

            // One event and one transaction echo, nothing from the replay
            assert_eq!(outputs.len(), 2);
            assert!(matches!(
                outputs[0],
                Output::Event(Event::PlayerRegistered { .. })
            ));
            assert!(matches!(outputs[1], Output::Transaction(_)));
        });
    }
}
