//! # Bitcoin HTLC Script
//!
//! Builds the redeem script locking Bitcoin-family funds under the same
//! SHA-256 hashlock as the EVM escrows.
//!
//! ```text
//! OP_IF
//!     OP_SHA256 <hashlock> OP_EQUALVERIFY
//!     OP_DUP OP_HASH160 <recipient_pkh>
//! OP_ELSE
//!     <timelock> OP_CHECKLOCKTIMEVERIFY|OP_CHECKSEQUENCEVERIFY OP_DROP
//!     OP_DUP OP_HASH160 <refund_pkh>
//! OP_ENDIF
//! OP_EQUALVERIFY OP_CHECKSIG
//! ```

use sha2::{Digest, Sha256};
use shared_types::Hash;

use super::execution::{BitcoinHtlcParams, LockTimeKind};

/// Script opcodes used by the HTLC template.
pub mod opcodes {
    /// Push empty vector / number zero.
    pub const OP_0: u8 = 0x00;
    /// Push number one; `OP_1 + n - 1` pushes `n` up to 16.
    pub const OP_1: u8 = 0x51;
    /// Begin conditional.
    pub const OP_IF: u8 = 0x63;
    /// Alternate branch.
    pub const OP_ELSE: u8 = 0x67;
    /// End conditional.
    pub const OP_ENDIF: u8 = 0x68;
    /// Remove top stack item.
    pub const OP_DROP: u8 = 0x75;
    /// Duplicate top stack item.
    pub const OP_DUP: u8 = 0x76;
    /// Equal then verify.
    pub const OP_EQUALVERIFY: u8 = 0x88;
    /// SHA-256 of top item.
    pub const OP_SHA256: u8 = 0xa8;
    /// RIPEMD-160(SHA-256) of top item.
    pub const OP_HASH160: u8 = 0xa9;
    /// Signature check.
    pub const OP_CHECKSIG: u8 = 0xac;
    /// BIP-65 absolute lock time.
    pub const OP_CHECKLOCKTIMEVERIFY: u8 = 0xb1;
    /// BIP-112 relative lock time.
    pub const OP_CHECKSEQUENCEVERIFY: u8 = 0xb2;
}

use opcodes::*;

/// Incremental script writer.
#[derive(Default)]
struct ScriptBuilder {
    bytes: Vec<u8>,
}

impl ScriptBuilder {
    fn op(mut self, opcode: u8) -> Self {
        self.bytes.push(opcode);
        self
    }

    /// Direct push; every push in the template is at most 75 bytes.
    fn push_slice(mut self, data: &[u8]) -> Self {
        debug_assert!(data.len() <= 75);
        self.bytes.push(data.len() as u8);
        self.bytes.extend_from_slice(data);
        self
    }

    /// Minimal script-number push.
    fn push_int(self, value: u32) -> Self {
        match value {
            0 => self.op(OP_0),
            1..=16 => self.op(OP_1 + (value as u8) - 1),
            _ => {
                let mut num = Vec::with_capacity(5);
                let mut v = value;
                while v > 0 {
                    num.push((v & 0xff) as u8);
                    v >>= 8;
                }
                // Keep the number positive.
                if num.last().is_some_and(|b| b & 0x80 != 0) {
                    num.push(0);
                }
                self.push_slice(&num)
            }
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Build the HTLC redeem script paying `recipient_pkh` on reveal.
pub fn build_htlc_script(params: &BitcoinHtlcParams, recipient_pkh: &[u8; 20]) -> Vec<u8> {
    let lock_op = match params.timelock_kind {
        LockTimeKind::Absolute => OP_CHECKLOCKTIMEVERIFY,
        LockTimeKind::Relative => OP_CHECKSEQUENCEVERIFY,
    };

    ScriptBuilder::default()
        .op(OP_IF)
        .op(OP_SHA256)
        .push_slice(&params.hashlock)
        .op(OP_EQUALVERIFY)
        .op(OP_DUP)
        .op(OP_HASH160)
        .push_slice(recipient_pkh)
        .op(OP_ELSE)
        .push_int(params.timelock)
        .op(lock_op)
        .op(OP_DROP)
        .op(OP_DUP)
        .op(OP_HASH160)
        .push_slice(&params.refund_pubkey_hash)
        .op(OP_ENDIF)
        .op(OP_EQUALVERIFY)
        .op(OP_CHECKSIG)
        .into_bytes()
}

/// P2WSH witness program: SHA-256 of the script.
pub fn witness_script_hash(script: &[u8]) -> Hash {
    Sha256::digest(script).into()
}
