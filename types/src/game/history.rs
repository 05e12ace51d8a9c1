use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, ReadRangeExt, Write};

use super::MAX_HISTORY_ENTRIES;

/// A settled round as recorded in a player's history.
///
/// `cashout_bp` is `None` for crashed rounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub session_id: u64,
    pub bet: u64,
    pub crash_point_bp: u64,
    pub cashout_bp: Option<u64>,
    pub payout: u64,
    pub resolved_at_ms: u64,
}

impl Write for HistoryEntry {
    fn write(&self, writer: &mut impl BufMut) {
        self.session_id.write(writer);
        self.bet.write(writer);
        self.crash_point_bp.write(writer);
        self.cashout_bp.write(writer);
        self.payout.write(writer);
        self.resolved_at_ms.write(writer);
    }
}

impl Read for HistoryEntry {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            session_id: u64::read(reader)?,
            bet: u64::read(reader)?,
            crash_point_bp: u64::read(reader)?,
            cashout_bp: Option::<u64>::read(reader)?,
            payout: u64::read(reader)?,
            resolved_at_ms: u64::read(reader)?,
        })
    }
}

impl EncodeSize for HistoryEntry {
    fn encode_size(&self) -> usize {
        self.session_id.encode_size()
            + self.bet.encode_size()
            + self.crash_point_bp.encode_size()
            + self.cashout_bp.encode_size()
            + self.payout.encode_size()
            + self.resolved_at_ms.encode_size()
    }
}

/// Per-player history of settled rounds, newest first.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct RoundHistory {
    pub entries: Vec<HistoryEntry>,
}

impl RoundHistory {
    /// Prepend a settled round, evicting the oldest past the cap.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_HISTORY_ENTRIES);
    }

    /// Newest `limit` entries.
    pub fn recent(&self, limit: usize) -> &[HistoryEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }
}

impl Write for RoundHistory {
    fn write(&self, writer: &mut impl BufMut) {
        self.entries.write(writer);
    }
}

impl Read for RoundHistory {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            entries: Vec::<HistoryEntry>::read_range(reader, 0..=MAX_HISTORY_ENTRIES)?,
        })
    }
}

impl EncodeSize for RoundHistory {
    fn encode_size(&self) -> usize {
        self.entries.encode_size()
    }
}
