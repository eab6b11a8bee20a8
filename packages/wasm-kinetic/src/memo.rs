//! Kin binary memos.
//!
//! A Kin memo is 32 bytes, packed little-end first:
//!
//! ```text
//! magic (2 bits) | version (3 bits) | transaction type (5 bits) |
//! app index (16 bits) | foreign key (230 bits)
//! ```
//!
//! On chain the memo is base64 text carried by the Memo v1 program, which is
//! how the relay attributes transactions to an app.

use crate::error::KineticError;
use base64::Engine;
use serde::{Deserialize, Serialize};

const MAGIC_BYTE: u8 = 0x1;
const MEMO_LEN: usize = 32;

pub const MEMO_VERSION: u8 = 1;
pub const MAX_VERSION: u8 = 7;
pub const MAX_FOREIGN_KEY_LEN: usize = 29;

/// Kin transaction type recorded in the memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    None = 0,
    Earn = 1,
    Spend = 2,
    P2P = 3,
}

impl TransactionType {
    pub fn value(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KinBinaryMemo {
    bytes: [u8; MEMO_LEN],
}

impl KinBinaryMemo {
    pub fn new(
        version: u8,
        tx_type: TransactionType,
        app_index: u32,
        foreign_key: &[u8],
    ) -> Result<Self, KineticError> {
        if version > MAX_VERSION {
            return Err(KineticError::InvalidMemo(format!(
                "version {} exceeds {}",
                version, MAX_VERSION
            )));
        }
        let app_index = u16::try_from(app_index).map_err(|_| {
            KineticError::InvalidMemo(format!("app index {} does not fit in 16 bits", app_index))
        })?;
        if foreign_key.len() > MAX_FOREIGN_KEY_LEN {
            return Err(KineticError::InvalidMemo(format!(
                "foreign key is {} bytes, max {}",
                foreign_key.len(),
                MAX_FOREIGN_KEY_LEN
            )));
        }

        let t = tx_type.value();
        let mut m = [0u8; MEMO_LEN];

        m[0] = MAGIC_BYTE;
        m[0] |= version << 2;
        m[0] |= (t & 0x7) << 5;
        m[1] = (t & 0x18) >> 3;

        m[1] |= ((app_index & 0x3f) as u8) << 2;
        m[2] = ((app_index & 0x3fc0) >> 6) as u8;
        m[3] = ((app_index & 0xc000) >> 14) as u8;

        if let Some(first) = foreign_key.first() {
            m[3] |= (first & 0x3f) << 2;
            // The last two bits of a full 29-byte key do not fit and are dropped
            let end = (4 + foreign_key.len()).min(MEMO_LEN);
            for i in 4..end {
                m[i] = (foreign_key[i - 4] >> 6) & 0x3;
                if let Some(next) = foreign_key.get(i - 3) {
                    m[i] |= (next & 0x3f) << 2;
                }
            }
        }

        Ok(KinBinaryMemo { bytes: m })
    }

    /// Memo attached by Kinetic transactions: current version, no foreign key.
    pub fn for_app(tx_type: TransactionType, app_index: u32) -> Result<Self, KineticError> {
        Self::new(MEMO_VERSION, tx_type, app_index, &[])
    }

    pub fn magic(&self) -> u8 {
        self.bytes[0] & 0x3
    }

    pub fn version(&self) -> u8 {
        (self.bytes[0] >> 2) & 0x7
    }

    pub fn transaction_type_raw(&self) -> u8 {
        (self.bytes[0] >> 5) | ((self.bytes[1] & 0x3) << 3)
    }

    pub fn app_index(&self) -> u16 {
        ((self.bytes[1] >> 2) as u16)
            | ((self.bytes[2] as u16) << 6)
            | (((self.bytes[3] & 0x3) as u16) << 14)
    }

    pub fn as_bytes(&self) -> &[u8; MEMO_LEN] {
        &self.bytes
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.bytes)
    }
}

impl std::fmt::Debug for KinBinaryMemo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KinBinaryMemo")
            .field("version", &self.version())
            .field("type", &self.transaction_type_raw())
            .field("app_index", &self.app_index())
            .finish()
    }
}
