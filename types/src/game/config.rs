use super::{FAUCET_AMOUNT, FAUCET_INTERVAL_MS, MIN_BET, STARTING_BALANCE};

/// Tunable engine parameters.
///
/// Passed to the executor at construction so tests and deployments can
/// run with different economics without touching the handlers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub min_bet: u64,
    pub starting_balance: u64,
    pub faucet_amount: u64,
    pub faucet_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_bet: MIN_BET,
            starting_balance: STARTING_BALANCE,
            faucet_amount: FAUCET_AMOUNT,
            faucet_interval_ms: FAUCET_INTERVAL_MS,
        }
    }
}
