//! # Address Codecs
//!
//! Chain-specific address parsing and canonicalization.
//!
//! | Family | Formats |
//! |--------|---------|
//! | Bitcoin | Base58Check P2PKH/P2SH, Bech32/Bech32m SegWit, CashAddr |
//! | Cosmos | Bech32 with chain HRP |
//! | NEAR | Named and implicit account ids |

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::bech32::{self, Variant};
use crate::domain::ChainError;

/// Parses and normalizes addresses of one chain family.
pub trait AddressCodec: Send + Sync {
    /// Parse an address, returning its kind and raw payload.
    fn decode(&self, address: &str) -> Result<DecodedAddress, ChainError>;

    /// Whether the address parses.
    fn validate(&self, address: &str) -> bool {
        self.decode(address).is_ok()
    }

    /// Canonical textual form (lowercase for case-insensitive encodings).
    fn canonicalize(&self, address: &str) -> Result<String, ChainError>;
}

/// Address kind recovered by a codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressKind {
    /// Base58Check pay-to-pubkey-hash.
    P2pkh,
    /// Base58Check pay-to-script-hash.
    P2sh,
    /// SegWit witness program.
    Segwit {
        /// Witness version (0..=16).
        version: u8,
    },
    /// Bitcoin Cash CashAddr.
    CashAddr {
        /// Script hash rather than pubkey hash.
        script: bool,
    },
    /// Cosmos SDK bech32 account or contract.
    CosmosAccount,
    /// NEAR human readable account.
    NearNamed,
    /// NEAR 64-hex implicit account.
    NearImplicit,
}

/// A parsed address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedAddress {
    /// Detected kind.
    pub kind: AddressKind,
    /// Hash, witness program or account bytes.
    pub payload: Vec<u8>,
}

impl DecodedAddress {
    /// The 20-byte pubkey hash, for kinds that pay to one.
    pub fn pubkey_hash(&self) -> Option<[u8; 20]> {
        let pays_to_key = matches!(
            self.kind,
            AddressKind::P2pkh | AddressKind::Segwit { version: 0 } | AddressKind::CashAddr { script: false }
        );
        if !pays_to_key || self.payload.len() != 20 {
            return None;
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(&self.payload);
        Some(out)
    }
}

fn invalid(msg: impl Into<String>) -> ChainError {
    ChainError::InvalidAddress(msg.into())
}

// =============================================================================
// BITCOIN FAMILY
// =============================================================================

/// UTXO networks sharing Bitcoin's address scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitcoinNetwork {
    /// Bitcoin mainnet.
    Mainnet,
    /// Bitcoin testnet.
    Testnet,
    /// Dogecoin mainnet.
    Dogecoin,
    /// Litecoin mainnet.
    Litecoin,
    /// Bitcoin Cash mainnet.
    BitcoinCash,
}

impl BitcoinNetwork {
    /// SegWit human readable part, if the network has SegWit.
    pub fn bech32_hrp(&self) -> Option<&'static str> {
        match self {
            Self::Mainnet => Some("bc"),
            Self::Testnet => Some("tb"),
            Self::Litecoin => Some("ltc"),
            Self::Dogecoin | Self::BitcoinCash => None,
        }
    }

    /// CashAddr prefix, if the network uses CashAddr.
    pub fn cashaddr_prefix(&self) -> Option<&'static str> {
        match self {
            Self::BitcoinCash => Some("bitcoincash"),
            _ => None,
        }
    }

    /// Base58Check version bytes for P2PKH.
    pub fn p2pkh_versions(&self) -> &'static [u8] {
        match self {
            Self::Mainnet | Self::BitcoinCash => &[0x00],
            Self::Testnet => &[0x6f],
            Self::Dogecoin => &[0x1e],
            Self::Litecoin => &[0x30],
        }
    }

    /// Base58Check version bytes for P2SH.
    pub fn p2sh_versions(&self) -> &'static [u8] {
        match self {
            Self::Mainnet | Self::BitcoinCash => &[0x05],
            Self::Testnet => &[0xc4],
            Self::Dogecoin => &[0x16],
            Self::Litecoin => &[0x32, 0x05],
        }
    }

    /// Leading characters a Base58 address may start with.
    pub fn base58_leading(&self) -> &'static [char] {
        match self {
            Self::Mainnet | Self::BitcoinCash => &['1', '3'],
            Self::Testnet => &['m', 'n', '2'],
            Self::Dogecoin => &['D', 'A', '9'],
            Self::Litecoin => &['L', 'M', '3'],
        }
    }
}

/// Bitcoin-family address codec.
#[derive(Clone, Debug)]
pub struct BitcoinAddressCodec {
    network: BitcoinNetwork,
}

impl BitcoinAddressCodec {
    /// Codec for `network`.
    pub fn new(network: BitcoinNetwork) -> Self {
        Self { network }
    }

    /// The configured network.
    pub fn network(&self) -> BitcoinNetwork {
        self.network
    }

    fn decode_segwit(&self, address: &str, hrp: &str) -> Result<DecodedAddress, ChainError> {
        if !(14..=74).contains(&address.len()) {
            return Err(invalid("segwit address length out of range"));
        }
        let decoded = bech32::decode(address)?;
        if decoded.hrp != hrp {
            return Err(invalid(format!("expected hrp {hrp}, got {}", decoded.hrp)));
        }
        let (version, rest) = decoded
            .data
            .split_first()
            .ok_or_else(|| invalid("empty witness program"))?;
        if *version > 16 {
            return Err(invalid("witness version above 16"));
        }
        let program = bech32::convert_bits(rest, 5, 8, false)
            .ok_or_else(|| invalid("witness program padding"))?;
        if !(2..=40).contains(&program.len()) {
            return Err(invalid("witness program length out of range"));
        }
        match (*version, decoded.variant) {
            (0, Variant::Bech32) if program.len() == 20 || program.len() == 32 => {}
            (0, Variant::Bech32) => return Err(invalid("v0 program must be 20 or 32 bytes")),
            (0, Variant::Bech32m) => return Err(invalid("v0 program must use bech32")),
            (_, Variant::Bech32) => return Err(invalid("v1+ program must use bech32m")),
            (_, Variant::Bech32m) => {}
        }
        Ok(DecodedAddress {
            kind: AddressKind::Segwit { version: *version },
            payload: program,
        })
    }

    fn decode_cashaddr(&self, address: &str, prefix: &str) -> Result<DecodedAddress, ChainError> {
        let lowered = address.to_ascii_lowercase();
        let payload = lowered
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(|| invalid("cashaddr prefix missing"))?;
        if payload.len() != 42 {
            return Err(invalid("cashaddr payload must be 42 characters"));
        }
        if !payload.starts_with('q') && !payload.starts_with('p') {
            return Err(invalid("cashaddr payload must start with q or p"));
        }
        let data = bech32::cashaddr_decode(prefix, payload)?;
        let bytes = bech32::convert_bits(&data, 5, 8, false)
            .ok_or_else(|| invalid("cashaddr padding"))?;
        let (version, hash) = bytes
            .split_first()
            .ok_or_else(|| invalid("cashaddr payload empty"))?;
        if version & 0x07 != 0 || hash.len() != 20 {
            return Err(invalid("cashaddr hash must be 160 bits"));
        }
        let script = match version >> 3 {
            0 => false,
            1 => true,
            other => return Err(invalid(format!("cashaddr type {other} unsupported"))),
        };
        Ok(DecodedAddress {
            kind: AddressKind::CashAddr { script },
            payload: hash.to_vec(),
        })
    }

    fn decode_base58(&self, address: &str) -> Result<DecodedAddress, ChainError> {
        if !(26..=35).contains(&address.len()) {
            return Err(invalid("base58 address length out of range"));
        }
        let first = address.chars().next().unwrap_or_default();
        if !self.network.base58_leading().contains(&first) {
            return Err(invalid(format!("unexpected prefix '{first}'")));
        }
        let bytes = bs58::decode(address)
            .into_vec()
            .map_err(|e| invalid(format!("base58: {e}")))?;
        if bytes.len() != 25 {
            return Err(invalid("base58 payload must decode to 25 bytes"));
        }
        let check = Sha256::digest(Sha256::digest(&bytes[..21]));
        if check[..4] != bytes[21..] {
            return Err(invalid("base58 checksum mismatch"));
        }
        let version = bytes[0];
        let kind = if self.network.p2pkh_versions().contains(&version) {
            AddressKind::P2pkh
        } else if self.network.p2sh_versions().contains(&version) {
            AddressKind::P2sh
        } else {
            return Err(invalid(format!("version byte {version:#04x} not valid on network")));
        };
        Ok(DecodedAddress {
            kind,
            payload: bytes[1..21].to_vec(),
        })
    }
}

impl AddressCodec for BitcoinAddressCodec {
    fn decode(&self, address: &str) -> Result<DecodedAddress, ChainError> {
        if address.is_empty() || address.chars().any(char::is_whitespace) {
            return Err(invalid("empty or whitespace in address"));
        }
        let lowered = address.to_ascii_lowercase();
        if let Some(hrp) = self.network.bech32_hrp() {
            if lowered.starts_with(&format!("{hrp}1")) {
                return self.decode_segwit(address, hrp);
            }
        }
        if let Some(prefix) = self.network.cashaddr_prefix() {
            if lowered.starts_with(&format!("{prefix}:")) {
                return self.decode_cashaddr(address, prefix);
            }
        }
        self.decode_base58(address)
    }

    fn canonicalize(&self, address: &str) -> Result<String, ChainError> {
        match self.decode(address)?.kind {
            AddressKind::Segwit { .. } | AddressKind::CashAddr { .. } => {
                Ok(address.to_ascii_lowercase())
            }
            _ => Ok(address.to_string()),
        }
    }
}

// =============================================================================
// COSMOS
// =============================================================================

/// Cosmos SDK bech32 codec bound to one HRP.
#[derive(Clone, Debug)]
pub struct CosmosAddressCodec {
    hrp: String,
}

impl CosmosAddressCodec {
    /// Codec for addresses prefixed with `hrp`.
    pub fn new(hrp: impl Into<String>) -> Self {
        Self {
            hrp: hrp.into().to_ascii_lowercase(),
        }
    }

    /// Expected human readable part.
    pub fn hrp(&self) -> &str {
        &self.hrp
    }

    /// Render raw account bytes as an address of this chain.
    pub fn encode(&self, payload: &[u8]) -> Result<String, ChainError> {
        bech32::encode_bytes(&self.hrp, payload)
    }
}

impl AddressCodec for CosmosAddressCodec {
    fn decode(&self, address: &str) -> Result<DecodedAddress, ChainError> {
        let decoded = bech32::decode(address)?;
        if decoded.hrp != self.hrp {
            return Err(invalid(format!(
                "malformed prefix: expected {}, got {}",
                self.hrp, decoded.hrp
            )));
        }
        if decoded.variant != Variant::Bech32 {
            return Err(invalid("cosmos addresses use bech32"));
        }
        let payload = bech32::convert_bits(&decoded.data, 5, 8, false)
            .ok_or_else(|| invalid("bech32 padding"))?;
        if !(20..=32).contains(&payload.len()) {
            return Err(invalid(format!("payload length {} out of range", payload.len())));
        }
        Ok(DecodedAddress {
            kind: AddressKind::CosmosAccount,
            payload,
        })
    }

    fn canonicalize(&self, address: &str) -> Result<String, ChainError> {
        self.decode(address)?;
        Ok(address.to_ascii_lowercase())
    }
}

// =============================================================================
// NEAR
// =============================================================================

/// Minimum NEAR account id length.
pub const NEAR_MIN_ACCOUNT_LEN: usize = 2;
/// Maximum NEAR account id length.
pub const NEAR_MAX_ACCOUNT_LEN: usize = 64;

/// NEAR account id codec.
#[derive(Clone, Debug, Default)]
pub struct NearAccountCodec;

impl NearAccountCodec {
    /// Check the account-id grammar: lowercase alphanumeric runs joined by
    /// single `.`, `-` or `_` separators.
    pub fn is_valid_account_id(account_id: &str) -> bool {
        let len = account_id.len();
        if !(NEAR_MIN_ACCOUNT_LEN..=NEAR_MAX_ACCOUNT_LEN).contains(&len) {
            return false;
        }
        let mut prev_separator = true; // no leading separator
        for c in account_id.chars() {
            match c {
                'a'..='z' | '0'..='9' => prev_separator = false,
                '.' | '-' | '_' => {
                    if prev_separator {
                        return false;
                    }
                    prev_separator = true;
                }
                _ => return false,
            }
        }
        !prev_separator
    }
}

impl AddressCodec for NearAccountCodec {
    fn decode(&self, address: &str) -> Result<DecodedAddress, ChainError> {
        if !Self::is_valid_account_id(address) {
            return Err(invalid(format!("invalid NEAR account id '{address}'")));
        }
        let implicit = address.len() == 64 && address.bytes().all(|b| b.is_ascii_hexdigit());
        Ok(DecodedAddress {
            kind: if implicit {
                AddressKind::NearImplicit
            } else {
                AddressKind::NearNamed
            },
            payload: address.as_bytes().to_vec(),
        })
    }

    fn canonicalize(&self, address: &str) -> Result<String, ChainError> {
        self.decode(address)?;
        Ok(address.to_string())
    }
}
