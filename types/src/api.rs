use crate::execution::Transaction;
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, ReadRangeExt, Write};

/// Maximum number of transactions that can be submitted in a single submission
pub const MAX_SUBMISSION_TRANSACTIONS: usize = 128;

#[derive(Clone, Debug)]
#[allow(clippy::large_enum_variant)]
pub enum Submission {
    Transactions(Vec<Transaction>),
}

impl Write for Submission {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Submission::Transactions(txs) => {
                0u8.write(writer);
                txs.write(writer);
            }
        }
    }
}

impl Read for Submission {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        match kind {
            0 => Ok(Submission::Transactions(Vec::read_range(
                reader,
                1..=MAX_SUBMISSION_TRANSACTIONS,
            )?)),
            _ => Err(Error::InvalidEnum(kind)),
        }
    }
}

impl EncodeSize for Submission {
    fn encode_size(&self) -> usize {
        1 + match self {
            Submission::Transactions(txs) => txs.encode_size(),
        }
    }
}

/// Snapshot of a player's funds returned by the balance query.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BalanceView {
    pub balance: u64,
    pub withdraw_balance: u64,
    pub active_session: Option<u64>,
}

impl Write for BalanceView {
    fn write(&self, writer: &mut impl BufMut) {
        self.balance.write(writer);
        self.withdraw_balance.write(writer);
        self.active_session.write(writer);
    }
}

impl Read for BalanceView {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let balance = u64::read(reader)?;
        let withdraw_balance = u64::read(reader)?;
        let active_session = Option::<u64>::read(reader)?;
        Ok(Self {
            balance,
            withdraw_balance,
            active_session,
        })
    }
}

impl EncodeSize for BalanceView {
    fn encode_size(&self) -> usize {
        self.balance.encode_size()
            + self.withdraw_balance.encode_size()
            + self.active_session.encode_size()
    }
}
