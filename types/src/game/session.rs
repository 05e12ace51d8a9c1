use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use commonware_cryptography::{ed25519::PublicKey, sha256::Digest};

/// Terminal-or-running state of a wager session.
///
/// The only legal transitions are `Running -> CashedOut` and
/// `Running -> Crashed`. Settlement handlers must check for `Running`
/// before writing either terminal state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    CashedOut { multiplier_bp: u64, payout: u64 },
    Crashed,
}

impl SessionStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl Write for SessionStatus {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Running => 0u8.write(writer),
            Self::CashedOut {
                multiplier_bp,
                payout,
            } => {
                1u8.write(writer);
                multiplier_bp.write(writer);
                payout.write(writer);
            }
            Self::Crashed => 2u8.write(writer),
        }
    }
}

impl Read for SessionStatus {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let status = match reader.get_u8() {
            0 => Self::Running,
            1 => Self::CashedOut {
                multiplier_bp: u64::read(reader)?,
                payout: u64::read(reader)?,
            },
            2 => Self::Crashed,
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(status)
    }
}

impl EncodeSize for SessionStatus {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Running | Self::Crashed => 0,
                Self::CashedOut {
                    multiplier_bp,
                    payout,
                } => multiplier_bp.encode_size() + payout.encode_size(),
            }
    }
}

/// One wager round.
///
/// `crash_point_bp` and `salt` are secrets until the round resolves;
/// only `commitment = sha256(id || crash_point_bp || salt)` is ever
/// surfaced while the session is running.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WagerSession {
    pub id: u64,
    pub player: PublicKey,
    pub bet: u64,
    pub crash_point_bp: u64,
    pub salt: Digest,
    pub commitment: Digest,
    pub started_at_ms: u64,
    pub status: SessionStatus,
}

impl Write for WagerSession {
    fn write(&self, writer: &mut impl BufMut) {
        self.id.write(writer);
        self.player.write(writer);
        self.bet.write(writer);
        self.crash_point_bp.write(writer);
        self.salt.write(writer);
        self.commitment.write(writer);
        self.started_at_ms.write(writer);
        self.status.write(writer);
    }
}

impl Read for WagerSession {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            id: u64::read(reader)?,
            player: PublicKey::read(reader)?,
            bet: u64::read(reader)?,
            crash_point_bp: u64::read(reader)?,
            salt: Digest::read(reader)?,
            commitment: Digest::read(reader)?,
            started_at_ms: u64::read(reader)?,
            status: SessionStatus::read(reader)?,
        })
    }
}

impl EncodeSize for WagerSession {
    fn encode_size(&self) -> usize {
        self.id.encode_size()
            + self.player.encode_size()
            + self.bet.encode_size()
            + self.crash_point_bp.encode_size()
            + self.salt.encode_size()
            + self.commitment.encode_size()
            + self.started_at_ms.encode_size()
            + self.status.encode_size()
    }
}
