use crate::game::{self, read_string, string_encode_size, write_string};
use bytes::{Buf, BufMut};
use commonware_codec::{Encode, EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use commonware_cryptography::{
    ed25519::{self, PublicKey},
    sha256::{Digest, Sha256},
    Digestible, Hasher, Signer, Verifier,
};
use commonware_utils::union;

pub const NAMESPACE: &[u8] = b"_LIFTOFF";
pub const TRANSACTION_SUFFIX: &[u8] = b"_TX";

#[inline]
pub fn transaction_namespace(namespace: &[u8]) -> Vec<u8> {
    union(namespace, TRANSACTION_SUFFIX)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub nonce: u64,
    pub instruction: Instruction,

    pub public: ed25519::PublicKey,
    pub signature: ed25519::Signature,
}

impl Transaction {
    fn payload(nonce: &u64, instruction: &Instruction) -> Vec<u8> {
        let mut payload = Vec::new();
        nonce.write(&mut payload);
        instruction.write(&mut payload);

        payload
    }

    pub fn sign(private: &ed25519::PrivateKey, nonce: u64, instruction: Instruction) -> Self {
        let signature = private.sign(
            Some(&transaction_namespace(NAMESPACE)),
            &Self::payload(&nonce, &instruction),
        );

        Self {
            nonce,
            instruction,
            public: private.public_key(),
            signature,
        }
    }

    pub fn verify(&self) -> bool {
        self.public.verify(
            Some(&transaction_namespace(NAMESPACE)),
            &Self::payload(&self.nonce, &self.instruction),
            &self.signature,
        )
    }
}

impl Write for Transaction {
    fn write(&self, writer: &mut impl BufMut) {
        self.nonce.write(writer);
        self.instruction.write(writer);
        self.public.write(writer);
        self.signature.write(writer);
    }
}

impl Read for Transaction {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let nonce = u64::read(reader)?;
        let instruction = Instruction::read(reader)?;
        let public = ed25519::PublicKey::read(reader)?;
        let signature = ed25519::Signature::read(reader)?;

        Ok(Self {
            nonce,
            instruction,
            public,
            signature,
        })
    }
}

impl EncodeSize for Transaction {
    fn encode_size(&self) -> usize {
        self.nonce.encode_size()
            + self.instruction.encode_size()
            + self.public.encode_size()
            + self.signature.encode_size()
    }
}

impl Digestible for Transaction {
    type Digest = Digest;

    fn digest(&self) -> Digest {
        let mut hasher = Sha256::new();
        hasher.update(self.nonce.to_be_bytes().as_ref());
        hasher.update(self.instruction.encode().as_ref());
        hasher.update(self.public.as_ref());
        // We don't include the signature as part of the digest (any valid
        // signature will be valid for the transaction)
        hasher.finalize()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Register a new player with a name.
    /// Binary: [0] [nameLen:u32 BE] [nameBytes...]
    Register { name: String },

    /// Claim the faucet deposit (rate limited).
    /// Binary: [1]
    Deposit,

    /// Debit the withdrawable pool and record a pending payout intent.
    /// Binary: [2] [amount:u64 BE]
    Withdraw { amount: u64 },

    /// Start a round. The session id is assigned by the executor and
    /// returned in the RoundStarted event.
    /// Binary: [3] [bet:u64 BE]
    Start { bet: u64 },

    /// Cash out of a running round at the current multiplier.
    /// Binary: [4] [sessionId:u64 BE]
    CashOut { session_id: u64 },

    /// Force settlement of a round whose crash time has passed.
    /// Binary: [5] [sessionId:u64 BE]
    Resolve { session_id: u64 },
}

impl Write for Instruction {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Register { name } => {
                0u8.write(writer);
                write_string(name, writer);
            }
            Self::Deposit => 1u8.write(writer),
            Self::Withdraw { amount } => {
                2u8.write(writer);
                amount.write(writer);
            }
            Self::Start { bet } => {
                3u8.write(writer);
                bet.write(writer);
            }
            Self::CashOut { session_id } => {
                4u8.write(writer);
                session_id.write(writer);
            }
            Self::Resolve { session_id } => {
                5u8.write(writer);
                session_id.write(writer);
            }
        }
    }
}

impl Read for Instruction {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let instruction = match reader.get_u8() {
            0 => Self::Register {
                name: read_string(reader, game::MAX_NAME_LENGTH)?,
            },
            1 => Self::Deposit,
            2 => Self::Withdraw {
                amount: u64::read(reader)?,
            },
            3 => Self::Start {
                bet: u64::read(reader)?,
            },
            4 => Self::CashOut {
                session_id: u64::read(reader)?,
            },
            5 => Self::Resolve {
                session_id: u64::read(reader)?,
            },

            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(instruction)
    }
}

impl EncodeSize for Instruction {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Register { name } => string_encode_size(name),
                Self::Deposit => 0,
                Self::Withdraw { .. }
                | Self::Start { .. }
                | Self::CashOut { .. }
                | Self::Resolve { .. } => u64::SIZE,
            }
    }
}

/// Minimal account structure for transaction nonce tracking.
/// Used for replay protection across all transaction types.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct Account {
    pub nonce: u64,
}

impl Write for Account {
    fn write(&self, writer: &mut impl BufMut) {
        self.nonce.write(writer);
    }
}

impl Read for Account {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            nonce: u64::read(reader)?,
        })
    }
}

impl EncodeSize for Account {
    fn encode_size(&self) -> usize {
        self.nonce.encode_size()
    }
}

#[derive(Hash, Eq, PartialEq, Ord, PartialOrd, Clone, Debug)]
pub enum Key {
    /// Account for nonce tracking (tag 0)
    Account(PublicKey),

    // Game keys (tags 1-5)
    Player(PublicKey),
    Session(u64),
    History(PublicKey),
    /// Global counter for server-assigned session ids
    SessionSeq,
    Withdrawals(PublicKey),
}

impl Write for Key {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Account(pk) => {
                0u8.write(writer);
                pk.write(writer);
            }
            Self::Player(pk) => {
                1u8.write(writer);
                pk.write(writer);
            }
            Self::Session(id) => {
                2u8.write(writer);
                id.write(writer);
            }
            Self::History(pk) => {
                3u8.write(writer);
                pk.write(writer);
            }
            Self::SessionSeq => 4u8.write(writer),
            Self::Withdrawals(pk) => {
                5u8.write(writer);
                pk.write(writer);
            }
        }
    }
}

impl Read for Key {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let key = match reader.get_u8() {
            0 => Self::Account(PublicKey::read(reader)?),
            1 => Self::Player(PublicKey::read(reader)?),
            2 => Self::Session(u64::read(reader)?),
            3 => Self::History(PublicKey::read(reader)?),
            4 => Self::SessionSeq,
            5 => Self::Withdrawals(PublicKey::read(reader)?),

            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(key)
    }
}

impl EncodeSize for Key {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Account(_) | Self::Player(_) | Self::History(_) | Self::Withdrawals(_) => {
                    PublicKey::SIZE
                }
                Self::Session(_) => u64::SIZE,
                Self::SessionSeq => 0,
            }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
#[allow(clippy::large_enum_variant)]
pub enum Value {
    /// Account for nonce tracking (tag 0)
    Account(Account),

    // Game values (tags 1-5)
    Player(game::Player),
    Session(game::WagerSession),
    History(game::RoundHistory),
    SessionSeq(u64),
    Withdrawals(game::PendingWithdrawals),
}

impl Write for Value {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Account(account) => {
                0u8.write(writer);
                account.write(writer);
            }
            Self::Player(player) => {
                1u8.write(writer);
                player.write(writer);
            }
            Self::Session(session) => {
                2u8.write(writer);
                session.write(writer);
            }
            Self::History(history) => {
                3u8.write(writer);
                history.write(writer);
            }
            Self::SessionSeq(next) => {
                4u8.write(writer);
                next.write(writer);
            }
            Self::Withdrawals(withdrawals) => {
                5u8.write(writer);
                withdrawals.write(writer);
            }
        }
    }
}

impl Read for Value {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = match reader.get_u8() {
            0 => Self::Account(Account::read(reader)?),
            1 => Self::Player(game::Player::read(reader)?),
            2 => Self::Session(game::WagerSession::read(reader)?),
            3 => Self::History(game::RoundHistory::read(reader)?),
            4 => Self::SessionSeq(u64::read(reader)?),
            5 => Self::Withdrawals(game::PendingWithdrawals::read(reader)?),

            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(value)
    }
}

impl EncodeSize for Value {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Account(account) => account.encode_size(),
                Self::Player(player) => player.encode_size(),
                Self::Session(session) => session.encode_size(),
                Self::History(history) => history.encode_size(),
                Self::SessionSeq(next) => next.encode_size(),
                Self::Withdrawals(withdrawals) => withdrawals.encode_size(),
            }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // Wallet events (tags 0-2)
    PlayerRegistered {
        player: PublicKey,
        name: String,
        balance: u64,
    },
    Deposited {
        player: PublicKey,
        amount: u64,
        balance: u64,
    },
    Withdrawn {
        player: PublicKey,
        amount: u64,
        balance: u64,
        withdraw_balance: u64,
    },

    // Round events (tags 3-4)
    RoundStarted {
        session_id: u64,
        player: PublicKey,
        bet: u64,
        started_at_ms: u64,
        /// sha256(session_id || crash_point_bp || salt); verifiable
        /// once RoundResolved reveals the preimage.
        commitment: Digest,
    },
    RoundResolved {
        session_id: u64,
        player: PublicKey,
        won: bool,
        multiplier_bp: u64,
        crash_point_bp: u64,
        salt: Digest,
        payout: u64,
        balance: u64,
    },

    // Error event (tag 9)
    GameError {
        player: PublicKey,
        session_id: Option<u64>,
        error_code: u8,
        message: String,
    },
}

/// Maximum length of a GameError message
const MAX_ERROR_MESSAGE_LENGTH: usize = 256;

impl Write for Event {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::PlayerRegistered {
                player,
                name,
                balance,
            } => {
                0u8.write(writer);
                player.write(writer);
                write_string(name, writer);
                balance.write(writer);
            }
            Self::Deposited {
                player,
                amount,
                balance,
            } => {
                1u8.write(writer);
                player.write(writer);
                amount.write(writer);
                balance.write(writer);
            }
            Self::Withdrawn {
                player,
                amount,
                balance,
                withdraw_balance,
            } => {
                2u8.write(writer);
                player.write(writer);
                amount.write(writer);
                balance.write(writer);
                withdraw_balance.write(writer);
            }
            Self::RoundStarted {
                session_id,
                player,
                bet,
                started_at_ms,
                commitment,
            } => {
                3u8.write(writer);
                session_id.write(writer);
                player.write(writer);
                bet.write(writer);
                started_at_ms.write(writer);
                commitment.write(writer);
            }
            Self::RoundResolved {
                session_id,
                player,
                won,
                multiplier_bp,
                crash_point_bp,
                salt,
                payout,
                balance,
            } => {
                4u8.write(writer);
                session_id.write(writer);
                player.write(writer);
                won.write(writer);
                multiplier_bp.write(writer);
                crash_point_bp.write(writer);
                salt.write(writer);
                payout.write(writer);
                balance.write(writer);
            }
            Self::GameError {
                player,
                session_id,
                error_code,
                message,
            } => {
                9u8.write(writer);
                player.write(writer);
                session_id.write(writer);
                error_code.write(writer);
                write_string(message, writer);
            }
        }
    }
}

impl Read for Event {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let event = match reader.get_u8() {
            0 => Self::PlayerRegistered {
                player: PublicKey::read(reader)?,
                name: read_string(reader, game::MAX_NAME_LENGTH)?,
                balance: u64::read(reader)?,
            },
            1 => Self::Deposited {
                player: PublicKey::read(reader)?,
                amount: u64::read(reader)?,
                balance: u64::read(reader)?,
            },
            2 => Self::Withdrawn {
                player: PublicKey::read(reader)?,
                amount: u64::read(reader)?,
                balance: u64::read(reader)?,
                withdraw_balance: u64::read(reader)?,
            },
            3 => Self::RoundStarted {
                session_id: u64::read(reader)?,
                player: PublicKey::read(reader)?,
                bet: u64::read(reader)?,
                started_at_ms: u64::read(reader)?,
                commitment: Digest::read(reader)?,
            },
            4 => Self::RoundResolved {
                session_id: u64::read(reader)?,
                player: PublicKey::read(reader)?,
                won: bool::read(reader)?,
                multiplier_bp: u64::read(reader)?,
                crash_point_bp: u64::read(reader)?,
                salt: Digest::read(reader)?,
                payout: u64::read(reader)?,
                balance: u64::read(reader)?,
            },
            9 => Self::GameError {
                player: PublicKey::read(reader)?,
                session_id: Option::<u64>::read(reader)?,
                error_code: u8::read(reader)?,
                message: read_string(reader, MAX_ERROR_MESSAGE_LENGTH)?,
            },

            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(event)
    }
}

impl EncodeSize for Event {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::PlayerRegistered {
                    player,
                    name,
                    balance,
                } => player.encode_size() + string_encode_size(name) + balance.encode_size(),
                Self::Deposited {
                    player,
                    amount,
                    balance,
                } => player.encode_size() + amount.encode_size() + balance.encode_size(),
                Self::Withdrawn {
                    player,
                    amount,
                    balance,
                    withdraw_balance,
                } => {
                    player.encode_size()
                        + amount.encode_size()
                        + balance.encode_size()
                        + withdraw_balance.encode_size()
                }
                Self::RoundStarted {
                    session_id,
                    player,
                    bet,
                    started_at_ms,
                    commitment,
                } => {
                    session_id.encode_size()
                        + player.encode_size()
                        + bet.encode_size()
                        + started_at_ms.encode_size()
                        + commitment.encode_size()
                }
                Self::RoundResolved {
                    session_id,
                    player,
                    won,
                    multiplier_bp,
                    crash_point_bp,
                    salt,
                    payout,
                    balance,
                } => {
                    session_id.encode_size()
                        + player.encode_size()
                        + won.encode_size()
                        + multiplier_bp.encode_size()
                        + crash_point_bp.encode_size()
                        + salt.encode_size()
                        + payout.encode_size()
                        + balance.encode_size()
                }
                Self::GameError {
                    player,
                    session_id,
                    error_code,
                    message,
                } => {
                    player.encode_size()
                        + session_id.encode_size()
                        + error_code.encode_size()
                        + string_encode_size(message)
                }
            }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Event(Event),
    Transaction(Transaction),
}

impl Write for Output {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Event(event) => {
                0u8.write(writer);
                event.write(writer);
            }
            Self::Transaction(transaction) => {
                1u8.write(writer);
                transaction.write(writer);
            }
        }
    }
}

impl Read for Output {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        match kind {
            0 => Ok(Self::Event(Event::read(reader)?)),
            1 => Ok(Self::Transaction(Transaction::read(reader)?)),
            _ => Err(Error::InvalidEnum(kind)),
        }
    }
}

impl EncodeSize for Output {
    fn encode_size(&self) -> usize {
        1 + match self {
            Self::Event(event) => event.encode_size(),
            Self::Transaction(transaction) => transaction.encode_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonware_cryptography::{ed25519::PrivateKey, PrivateKeyExt};
    use rand::{rngs::StdRng, SeedableRng};

    fn keypair(seed: u64) -> (PrivateKey, PublicKey) {
        let mut rng = StdRng::seed_from_u64(seed);
        let private = PrivateKey::from_rng(&mut rng);
        let public = private.public_key();
        (private, public)
    }

    #[test]
    fn test_transaction_sign_verify() {
        let (private, public) = keypair(1);
        let tx = Transaction::sign(&private, 0, Instruction::Start { bet: 100 });
        assert_eq!(tx.public, public);
        assert!(tx.verify());

        // Tampering with the nonce breaks the signature
        let mut bad = tx.clone();
        bad.nonce = 1;
        assert!(!bad.verify());
    }

    #[test]
    fn test_transaction_roundtrip() {
        let (private, _) = keypair(2);
        let tx = Transaction::sign(
            &private,
            3,
            Instruction::Register {
                name: "Alice".to_string(),
            },
        );
        let encoded = tx.encode();
        let decoded = Transaction::read(&mut &encoded[..]).unwrap();
        assert_eq!(tx, decoded);
        assert!(decoded.verify());
    }

    #[test]
    fn test_instruction_roundtrip() {
        for instruction in [
            Instruction::Register {
                name: "Bob".to_string(),
            },
            Instruction::Deposit,
            Instruction::Withdraw { amount: 500 },
            Instruction::Start { bet: 25 },
            Instruction::CashOut { session_id: 9 },
            Instruction::Resolve { session_id: 9 },
        ] {
            let encoded = instruction.encode();
            assert_eq!(encoded.len(), instruction.encode_size());
            let decoded = Instruction::read(&mut &encoded[..]).unwrap();
            assert_eq!(instruction, decoded);
        }
    }

    #[test]
    fn test_instruction_rejects_long_name() {
        let name = "x".repeat(game::MAX_NAME_LENGTH + 1);
        let encoded = Instruction::Register { name }.encode();
        assert!(Instruction::read(&mut &encoded[..]).is_err());
    }

    #[test]
    fn test_key_value_roundtrip() {
        let (_, public) = keypair(3);
        for key in [
            Key::Account(public.clone()),
            Key::Player(public.clone()),
            Key::Session(5),
            Key::History(public.clone()),
            Key::SessionSeq,
            Key::Withdrawals(public.clone()),
        ] {
            let encoded = key.encode();
            let decoded = Key::read(&mut &encoded[..]).unwrap();
            assert_eq!(key, decoded);
        }

        let value = Value::SessionSeq(17);
        let encoded = value.encode();
        assert_eq!(Value::read(&mut &encoded[..]).unwrap(), value);

        let mut withdrawals = game::PendingWithdrawals::default();
        withdrawals.push(game::WithdrawalIntent {
            amount: 250,
            requested_at_ms: 1_000,
        });
        let value = Value::Withdrawals(withdrawals);
        let encoded = value.encode();
        assert_eq!(encoded.len(), value.encode_size());
        assert_eq!(Value::read(&mut &encoded[..]).unwrap(), value);
    }

    #[test]
    fn test_event_roundtrip() {
        let (_, public) = keypair(4);
        let event = Event::GameError {
            player: public,
            session_id: Some(11),
            error_code: game::ERROR_ALREADY_RESOLVED,
            message: "Session already resolved".to_string(),
        };
        let encoded = event.encode();
        assert_eq!(encoded.len(), event.encode_size());
        let decoded = Event::read(&mut &encoded[..]).unwrap();
        assert_eq!(event, decoded);
    }
}
