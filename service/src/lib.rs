use axum::{
    body::Bytes,
    extract::{Path, Query, State as AxumState},
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use commonware_codec::{DecodeExt, Encode};
use commonware_cryptography::ed25519::PublicKey;
use commonware_utils::from_hex;
use liftoff_execution::{nonce, Layer, Memory, State};
use liftoff_types::{
    api::{BalanceView, Submission},
    execution::{Output, Transaction},
    game::{EngineConfig, HistoryEntry, MAX_HISTORY_ENTRIES},
};
use rand::{rngs::OsRng, RngCore};
use serde::Deserialize;
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

pub struct Service {
    config: EngineConfig,
    state: Mutex<Memory>,
}

impl Service {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: Mutex::new(Memory::default()),
        }
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }

    fn entropy() -> [u8; 32] {
        let mut entropy = [0u8; 32];
        OsRng.fill_bytes(&mut entropy);
        entropy
    }

    /// Execute a batch of signed transactions against current state and
    /// return the resulting outputs. Signatures must already be verified.
    pub async fn submit(&self, transactions: Vec<Transaction>) -> Vec<Output> {
        debug!(count = transactions.len(), "executing submission");
        let mut state = self.state.lock().await;
        let mut layer = Layer::new(
            &*state,
            self.config.clone(),
            Self::now_ms(),
            Self::entropy(),
        );
        let outputs = layer.execute(transactions).await;
        let changes = layer.commit();
        state.apply(changes).await;
        outputs
    }

    pub async fn balance(&self, public: &PublicKey) -> Option<BalanceView> {
        let mut state = self.state.lock().await;
        let mut layer = Layer::new(
            &*state,
            self.config.clone(),
            Self::now_ms(),
            Self::entropy(),
        );
        let view = layer.read_balance(public).await;
        // Persist any settlement the query triggered
        let changes = layer.commit();
        state.apply(changes).await;
        view
    }

    pub async fn history(&self, public: &PublicKey, limit: usize) -> Vec<HistoryEntry> {
        let mut state = self.state.lock().await;
        let mut layer = Layer::new(
            &*state,
            self.config.clone(),
            Self::now_ms(),
            Self::entropy(),
        );
        let entries = layer.read_history(public, limit).await;
        let changes = layer.commit();
        state.apply(changes).await;
        entries
    }

    pub async fn nonce(&self, public: &PublicKey) -> u64 {
        let state = self.state.lock().await;
        nonce(&*state, public).await
    }
}

pub struct Api {
    service: Arc<Service>,
}

impl Api {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }

    pub fn router(&self) -> Router {
        // Configure CORS
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]);

        Router::new()
            .route("/submit", post(submit))
            .route("/balance/:key", get(query_balance))
            .route("/history/:key", get(query_history))
            .route("/nonce/:key", get(query_nonce))
            .layer(cors)
            .with_state(self.service.clone())
    }
}

#[derive(Deserialize)]
struct HistoryParams {
    limit: Option<usize>,
}

fn parse_public_key(raw: &str) -> Option<PublicKey> {
    let bytes = from_hex(raw)?;
    PublicKey::decode(&mut bytes.as_slice()).ok()
}

async fn submit(AxumState(service): AxumState<Arc<Service>>, body: Bytes) -> impl IntoResponse {
    let submission = match Submission::decode(&mut body.as_ref()) {
        Ok(submission) => submission,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    match submission {
        Submission::Transactions(txs) => {
            if !txs.iter().all(Transaction::verify) {
                return StatusCode::BAD_REQUEST.into_response();
            }
            let outputs = service.submit(txs).await;
            (StatusCode::OK, outputs.encode().to_vec()).into_response()
        }
    }
}

async fn query_balance(
    AxumState(service): AxumState<Arc<Service>>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    let public = match parse_public_key(&key) {
        Some(public) => public,
        None => return StatusCode::BAD_REQUEST.into_response(),
    };
    match service.balance(&public).await {
        Some(view) => (StatusCode::OK, view.encode().to_vec()).into_response(),
        None => (StatusCode::NOT_FOUND, vec![]).into_response(),
    }
}

async fn query_history(
    AxumState(service): AxumState<Arc<Service>>,
    Path(key): Path<String>,
    Query(params): Query<HistoryParams>,
) -> impl IntoResponse {
    let public = match parse_public_key(&key) {
        Some(public) => public,
        None => return StatusCode::BAD_REQUEST.into_response(),
    };
    let limit = params.limit.unwrap_or(MAX_HISTORY_ENTRIES);
    let entries = service.history(&public, limit).await;
    (StatusCode::OK, entries.encode().to_vec()).into_response()
}

async fn query_nonce(
    AxumState(service): AxumState<Arc<Service>>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    let public = match parse_public_key(&key) {
        Some(public) => public,
        None => return StatusCode::BAD_REQUEST.into_response(),
    };
    let nonce = service.nonce(&public).await;
    (StatusCode::OK, nonce.encode().to_vec()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftoff_execution::mocks::create_account_keypair;
    use liftoff_types::execution::{Event, Instruction};

    #[tokio::test]
    async fn test_register_and_query_balance() {
        let service = Service::new(EngineConfig::default());
        let (signer, public) = create_account_keypair(1);

        let tx = Transaction::sign(
            &signer,
            0,
            Instruction::Register {
                name: "Alice".to_string(),
            },
        );
        let outputs = service.submit(vec![tx]).await;
        assert!(matches!(
            outputs[0],
            Output::Event(Event::PlayerRegistered { .. })
        ));

        let view = service.balance(&public).await.expect("player not found");
        assert_eq!(view.balance, EngineConfig::default().starting_balance);
        assert_eq!(view.withdraw_balance, 0);
        assert_eq!(view.active_session, None);

        assert_eq!(service.nonce(&public).await, 1);
    }

    #[tokio::test]
    async fn test_unknown_player_queries() {
        let service = Service::new(EngineConfig::default());
        let (_, public) = create_account_keypair(2);

        assert!(service.balance(&public).await.is_none());
        assert!(service.history(&public, 10).await.is_empty());
        assert_eq!(service.nonce(&public).await, 0);
    }

    #[tokio::test]
    async fn test_start_reserves_bet() {
        let service = Service::new(EngineConfig::default());
        let (signer, public) = create_account_keypair(3);

        let register = Transaction::sign(
            &signer,
            0,
            Instruction::Register {
                name: "Bob".to_string(),
            },
        );
        let start = Transaction::sign(&signer, 1, Instruction::Start { bet: 100 });
        let outputs = service.submit(vec![register, start]).await;

        let started = outputs.iter().any(|output| {
            matches!(output, Output::Event(Event::RoundStarted { bet, .. }) if *bet == 100)
        });
        assert!(started, "round did not start: {outputs:?}");

        let view = service.balance(&public).await.expect("player not found");
        assert_eq!(
            view.balance,
            EngineConfig::default().starting_balance - 100
        );
        assert!(view.active_session.is_some());
    }

    #[tokio::test]
    async fn test_stale_nonce_rejected() {
        let service = Service::new(EngineConfig::default());
        let (signer, public) = create_account_keypair(4);

        let register = Transaction::sign(
            &signer,
            0,
            Instruction::Register {
                name: "Carol".to_string(),
            },
        );
        let _ = service.submit(vec![register.clone()]).await;

        // Replaying the same transaction produces no outputs
        let outputs = service.submit(vec![register]).await;
        assert!(outputs.is_empty());
        assert_eq!(service.nonce(&public).await, 1);
    }
}
