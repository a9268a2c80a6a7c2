//! # Bech32 / Bech32m / CashAddr checksums
//!
//! Checksummed base32 encodings used by SegWit, Cosmos SDK and Bitcoin Cash
//! addresses.

use crate::domain::ChainError;

/// Base32 alphabet shared by Bech32 and CashAddr.
pub const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

const GENERATOR: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];
const BECH32_CONST: u32 = 1;
const BECH32M_CONST: u32 = 0x2bc8_30a3;
const MAX_LENGTH: usize = 90;
const CHECKSUM_LENGTH: usize = 6;

/// Checksum constant family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// BIP-173.
    Bech32,
    /// BIP-350.
    Bech32m,
}

impl Variant {
    fn constant(self) -> u32 {
        match self {
            Self::Bech32 => BECH32_CONST,
            Self::Bech32m => BECH32M_CONST,
        }
    }
}

/// A decoded Bech32 string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    /// Lowercased human readable part.
    pub hrp: String,
    /// 5-bit data groups without checksum.
    pub data: Vec<u8>,
    /// Which checksum constant matched.
    pub variant: Variant,
}

fn polymod(values: &[u8]) -> u32 {
    let mut chk: u32 = 1;
    for v in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(*v);
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(hrp.len() * 2 + 1);
    out.extend(hrp.iter().map(|c| c >> 5));
    out.push(0);
    out.extend(hrp.iter().map(|c| c & 31));
    out
}

fn charset_index(c: u8) -> Option<u8> {
    CHARSET.iter().position(|x| *x == c).map(|i| i as u8)
}

fn invalid(msg: impl Into<String>) -> ChainError {
    ChainError::InvalidAddress(msg.into())
}

/// Decode and checksum-verify a Bech32 or Bech32m string.
pub fn decode(input: &str) -> Result<Decoded, ChainError> {
    if input.len() < 8 || input.len() > MAX_LENGTH {
        return Err(invalid(format!("bech32 length {} out of range", input.len())));
    }
    let has_lower = input.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = input.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(invalid("bech32 string has mixed case"));
    }
    let lowered = input.to_ascii_lowercase();
    let bytes = lowered.as_bytes();

    let sep = lowered
        .rfind('1')
        .ok_or_else(|| invalid("bech32 separator missing"))?;
    if sep == 0 || sep + CHECKSUM_LENGTH + 1 > bytes.len() {
        return Err(invalid("bech32 separator misplaced"));
    }

    let hrp = &bytes[..sep];
    if hrp.iter().any(|c| !(33..=126).contains(c)) {
        return Err(invalid("bech32 hrp has invalid characters"));
    }

    let data = bytes[sep + 1..]
        .iter()
        .map(|c| charset_index(*c))
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| invalid("bech32 data has invalid characters"))?;

    let mut values = hrp_expand(hrp);
    values.extend_from_slice(&data);
    let variant = match polymod(&values) {
        BECH32_CONST => Variant::Bech32,
        BECH32M_CONST => Variant::Bech32m,
        _ => return Err(invalid("bech32 checksum mismatch")),
    };

    Ok(Decoded {
        hrp: String::from_utf8_lossy(hrp).into_owned(),
        data: data[..data.len() - CHECKSUM_LENGTH].to_vec(),
        variant,
    })
}

/// Encode 5-bit `data` under `hrp`.
pub fn encode(hrp: &str, data: &[u8], variant: Variant) -> Result<String, ChainError> {
    if data.iter().any(|d| *d > 31) {
        return Err(ChainError::Encoding("bech32 data is not 5-bit".into()));
    }
    let hrp = hrp.to_ascii_lowercase();
    let mut values = hrp_expand(hrp.as_bytes());
    values.extend_from_slice(data);
    values.extend_from_slice(&[0u8; CHECKSUM_LENGTH]);
    let pm = polymod(&values) ^ variant.constant();

    let mut out = String::with_capacity(hrp.len() + 1 + data.len() + CHECKSUM_LENGTH);
    out.push_str(&hrp);
    out.push('1');
    for d in data {
        out.push(char::from(CHARSET[usize::from(*d)]));
    }
    for i in 0..CHECKSUM_LENGTH {
        let idx = (pm >> (5 * (5 - i))) & 31;
        out.push(char::from(CHARSET[idx as usize]));
    }
    Ok(out)
}

/// Regroup bits, e.g. 8-bit bytes to 5-bit groups.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Option<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max_v: u32 = (1 << to) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
    for value in data {
        let v = u32::from(*value);
        if v >> from != 0 {
            return None;
        }
        acc = (acc << from) | v;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max_v) as u8);
        }
    }
    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max_v) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max_v) != 0 {
        return None;
    }
    Some(out)
}

/// Encode raw bytes as a Bech32 address.
pub fn encode_bytes(hrp: &str, payload: &[u8]) -> Result<String, ChainError> {
    let data = convert_bits(payload, 8, 5, true)
        .ok_or_else(|| ChainError::Encoding("bit conversion failed".into()))?;
    encode(hrp, &data, Variant::Bech32)
}

// =============================================================================
// CashAddr (Bitcoin Cash)
// =============================================================================

fn cashaddr_polymod(values: &[u8]) -> u64 {
    let mut c: u64 = 1;
    for d in values {
        let c0 = (c >> 35) as u8;
        c = ((c & 0x07_ffff_ffff) << 5) ^ u64::from(*d);
        if c0 & 0x01 != 0 {
            c ^= 0x98_f2bc_8e61;
        }
        if c0 & 0x02 != 0 {
            c ^= 0x79_b76d_99e2;
        }
        if c0 & 0x04 != 0 {
            c ^= 0xf3_3e5f_b3c4;
        }
        if c0 & 0x08 != 0 {
            c ^= 0xae_2eab_e2a8;
        }
        if c0 & 0x10 != 0 {
            c ^= 0x1e_4f43_e470;
        }
    }
    c ^ 1
}

fn cashaddr_prefix_values(prefix: &str) -> Vec<u8> {
    let mut values: Vec<u8> = prefix.bytes().map(|b| b & 0x1f).collect();
    values.push(0);
    values
}

/// Verify a CashAddr payload (the part after `prefix:`), returning its
/// 5-bit data groups without the 8-group checksum.
pub fn cashaddr_decode(prefix: &str, payload: &str) -> Result<Vec<u8>, ChainError> {
    if payload.len() <= 8 {
        return Err(invalid("cashaddr payload too short"));
    }
    let data = payload
        .bytes()
        .map(|c| charset_index(c.to_ascii_lowercase()))
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| invalid("cashaddr payload has invalid characters"))?;

    let mut values = cashaddr_prefix_values(prefix);
    values.extend_from_slice(&data);
    if cashaddr_polymod(&values) != 0 {
        return Err(invalid("cashaddr checksum mismatch"));
    }
    Ok(data[..data.len() - 8].to_vec())
}

/// Encode 5-bit data as a CashAddr payload with checksum (no prefix).
pub fn cashaddr_encode(prefix: &str, data: &[u8]) -> Result<String, ChainError> {
    if data.iter().any(|d| *d > 31) {
        return Err(ChainError::Encoding("cashaddr data is not 5-bit".into()));
    }
    let mut values = cashaddr_prefix_values(prefix);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0u8; 8]);
    let pm = cashaddr_polymod(&values);

    let mut out = String::with_capacity(data.len() + 8);
    for d in data {
        out.push(char::from(CHARSET[usize::from(*d)]));
    }
    for i in 0..8 {
        let idx = (pm >> (5 * (7 - i))) & 31;
        out.push(char::from(CHARSET[idx as usize]));
    }
    Ok(out)
}
