use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};

use super::{read_string, string_encode_size, write_string, MAX_NAME_LENGTH};

/// Player wallet and registry state.
///
/// `balance` is the in-play pool wagers are taken from and payouts are
/// credited to. `withdraw_balance` is the pool staged for withdrawal;
/// it is never touched by rounds.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Player {
    pub name: String,
    pub balance: u64,
    pub withdraw_balance: u64,
    /// At most one running session per player.
    pub active_session: Option<u64>,
    pub last_faucet_ms: u64,
}

impl Player {
    pub fn new(name: String, starting_balance: u64) -> Self {
        Self {
            name,
            balance: starting_balance,
            withdraw_balance: 0,
            active_session: None,
            // Allow an immediate first faucet claim
            last_faucet_ms: 0,
        }
    }
}

impl Write for Player {
    fn write(&self, writer: &mut impl BufMut) {
        write_string(&self.name, writer);
        self.balance.write(writer);
        self.withdraw_balance.write(writer);
        self.active_session.write(writer);
        self.last_faucet_ms.write(writer);
    }
}

impl Read for Player {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            name: read_string(reader, MAX_NAME_LENGTH)?,
            balance: u64::read(reader)?,
            withdraw_balance: u64::read(reader)?,
            active_session: Option::<u64>::read(reader)?,
            last_faucet_ms: u64::read(reader)?,
        })
    }
}

impl EncodeSize for Player {
    fn encode_size(&self) -> usize {
        string_encode_size(&self.name)
            + self.balance.encode_size()
            + self.withdraw_balance.encode_size()
            + self.active_session.encode_size()
            + self.last_faucet_ms.encode_size()
    }
}
