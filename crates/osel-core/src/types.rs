use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::OselError;

/// Length of an Ethereum account address in bytes.
pub const ADDRESS_LENGTH: usize = 20;

/// Recipient address of an orchestrator, used as the stake/price/score key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EthAddress([u8; ADDRESS_LENGTH]);

impl EthAddress {
    /// Zero value used for sessions that carry no routing metadata.
    pub const ZERO: Self = Self([0u8; ADDRESS_LENGTH]);

    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Build an address from raw recipient bytes.
    ///
    /// Input longer than 20 bytes keeps its trailing 20 bytes; shorter input
    /// is right-aligned and left-padded with zeros.
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut out = [0u8; ADDRESS_LENGTH];
        if bytes.len() >= ADDRESS_LENGTH {
            out.copy_from_slice(&bytes[bytes.len() - ADDRESS_LENGTH..]);
        } else {
            out[ADDRESS_LENGTH - bytes.len()..].copy_from_slice(bytes);
        }
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LENGTH]
    }

    /// Best-effort conversion of a hex string that never fails.
    ///
    /// Decoding stops at the first byte pair that is not valid hex and the
    /// bytes decoded so far are used, so `"foo"` (padded to `"0foo"`) yields
    /// `0x…0f`. Input with no valid leading pair yields the zero address.
    pub fn from_hex_lenient(s: &str) -> Self {
        let digits = strip_hex_prefix(s);
        let padded = pad_to_even(digits);
        let bytes: Vec<u8> = padded
            .as_bytes()
            .chunks_exact(2)
            .map_while(|pair| {
                let hi = (pair[0] as char).to_digit(16)?;
                let lo = (pair[1] as char).to_digit(16)?;
                u8::try_from((hi << 4) | lo).ok()
            })
            .collect();
        Self::from_slice(&bytes)
    }
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

fn pad_to_even(digits: &str) -> String {
    if digits.len() % 2 == 1 {
        format!("0{digits}")
    } else {
        digits.to_string()
    }
}

impl FromStr for EthAddress {
    type Err = OselError;

    /// Parse a hex address. The `0x` prefix is optional and odd-length
    /// input is left-padded with a zero nibble.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let padded = pad_to_even(strip_hex_prefix(s.trim()));
        let bytes = hex::decode(&padded).map_err(|_| OselError::InvalidAddress(s.to_string()))?;
        Ok(Self::from_slice(&bytes))
    }
}

impl std::fmt::Display for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for EthAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EthAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Price attached by an orchestrator: `price_per_unit` wei per
/// `pixels_per_unit` pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceInfo {
    pub price_per_unit: i64,
    pub pixels_per_unit: i64,
}

impl PriceInfo {
    /// Rational price, or `None` when the denominator is not positive.
    pub fn to_rat(&self) -> Option<PriceRat> {
        PriceRat::new(self.price_per_unit, self.pixels_per_unit).ok()
    }
}

/// Exact rational price. Always stored with a positive denominator.
#[derive(Clone, Copy, Debug)]
pub struct PriceRat {
    num: i64,
    den: i64,
}

impl PriceRat {
    pub fn new(num: i64, den: i64) -> Result<Self, OselError> {
        if den <= 0 {
            return Err(OselError::InvalidPrice { num, den });
        }
        Ok(Self { num, den })
    }

}

impl PartialEq for PriceRat {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PriceRat {}

impl PartialOrd for PriceRat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriceRat {
    fn cmp(&self, other: &Self) -> Ordering {
        // Denominators are positive, so cross multiplication preserves order.
        let lhs = i128::from(self.num) * i128::from(other.den);
        let rhs = i128::from(other.num) * i128::from(self.den);
        lhs.cmp(&rhs)
    }
}

impl std::fmt::Display for PriceRat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}
