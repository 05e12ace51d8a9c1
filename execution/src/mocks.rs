use commonware_cryptography::{
    ed25519::{PrivateKey, PublicKey},
    PrivateKeyExt, Signer,
};
use liftoff_types::game::EngineConfig;
use rand::{rngs::StdRng, RngCore, SeedableRng};

/// Creates an account keypair for Ed25519 signatures used by players
pub fn create_account_keypair(seed: u64) -> (PrivateKey, PublicKey) {
    let mut rng = StdRng::seed_from_u64(seed);
    let private = PrivateKey::from_rng(&mut rng);
    let public = private.public_key();
    (private, public)
}

/// Creates deterministic round entropy for testing
pub fn create_entropy(seed: u64) -> [u8; 32] {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut entropy = [0u8; 32];
    rng.fill_bytes(&mut entropy);
    entropy
}

/// Engine configuration used across tests
pub fn test_config() -> EngineConfig {
    EngineConfig::default()
}
