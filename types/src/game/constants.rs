/// Fixed-point scale for multipliers: 10_000 basis points = 1.00x.
pub const BASIS_POINTS: u64 = 10_000;

/// Lowest possible crash point (1.00x, instant bust).
pub const MIN_CRASH_BP: u64 = 10_000;

/// Multiplier ceiling (15.00x). The curve and the outcome generator
/// both clamp to this value.
pub const MAX_MULTIPLIER_BP: u64 = 150_000;

/// Maximum name length for player registration
pub const MAX_NAME_LENGTH: usize = 32;

/// Smallest accepted wager
pub const MIN_BET: u64 = 1;

/// Balance granted on registration
pub const STARTING_BALANCE: u64 = 1_000;

/// Faucet deposit amount
pub const FAUCET_AMOUNT: u64 = 1_000;

/// Faucet rate limit (one claim per day)
pub const FAUCET_INTERVAL_MS: u64 = 86_400_000;

/// Per-player round history retention
pub const MAX_HISTORY_ENTRIES: usize = 100;

/// Per-player pending withdrawal retention
pub const MAX_PENDING_WITHDRAWALS: usize = 100;

/// Error codes for GameError events
pub const ERROR_PLAYER_ALREADY_REGISTERED: u8 = 1;
pub const ERROR_PLAYER_NOT_FOUND: u8 = 2;
pub const ERROR_INSUFFICIENT_BALANCE: u8 = 3;
pub const ERROR_INVALID_BET: u8 = 4;
pub const ERROR_SESSION_ALREADY_ACTIVE: u8 = 5;
pub const ERROR_SESSION_NOT_FOUND: u8 = 6;
pub const ERROR_SESSION_NOT_OWNED: u8 = 7;
pub const ERROR_ALREADY_RESOLVED: u8 = 8;
pub const ERROR_RATE_LIMITED: u8 = 9;
pub const ERROR_INVALID_WITHDRAW: u8 = 10;
