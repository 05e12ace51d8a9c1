use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, ReadRangeExt, Write};

use super::MAX_PENDING_WITHDRAWALS;

/// A withdrawal request awaiting external payment delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WithdrawalIntent {
    pub amount: u64,
    pub requested_at_ms: u64,
}

impl Write for WithdrawalIntent {
    fn write(&self, writer: &mut impl BufMut) {
        self.amount.write(writer);
        self.requested_at_ms.write(writer);
    }
}

impl Read for WithdrawalIntent {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            amount: u64::read(reader)?,
            requested_at_ms: u64::read(reader)?,
        })
    }
}

impl EncodeSize for WithdrawalIntent {
    fn encode_size(&self) -> usize {
        self.amount.encode_size() + self.requested_at_ms.encode_size()
    }
}

/// Per-player withdrawal intents, newest first.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PendingWithdrawals {
    pub intents: Vec<WithdrawalIntent>,
}

impl PendingWithdrawals {
    /// Prepend an intent, evicting the oldest past the cap.
    pub fn push(&mut self, intent: WithdrawalIntent) {
        self.intents.insert(0, intent);
        self.intents.truncate(MAX_PENDING_WITHDRAWALS);
    }
}

impl Write for PendingWithdrawals {
    fn write(&self, writer: &mut impl BufMut) {
        self.intents.write(writer);
    }
}

impl Read for PendingWithdrawals {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            intents: Vec::<WithdrawalIntent>::read_range(reader, 0..=MAX_PENDING_WITHDRAWALS)?,
        })
    }
}

impl EncodeSize for PendingWithdrawals {
    fn encode_size(&self) -> usize {
        self.intents.encode_size()
    }
}
