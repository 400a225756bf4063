//! Stake lookup address carried by every session.
//!
//! The address is derived from the recipient field of the worker's payment
//! ticket parameters and is only ever used as a key into the stake oracle.

use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::AddressParseError;

/// Length in bytes of a stake address.
pub const ADDRESS_LEN: usize = 20;

/// Fixed-length worker address used to look up stake.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StakeAddress([u8; ADDRESS_LEN]);

impl StakeAddress {
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Derive an address from raw ticket recipient bytes.
    ///
    /// Input longer than [`ADDRESS_LEN`] keeps only its trailing bytes; shorter
    /// input is left-padded with zeros. Never fails.
    pub fn from_recipient_bytes(bytes: &[u8]) -> Self {
        let mut out = [0u8; ADDRESS_LEN];
        let tail = &bytes[bytes.len().saturating_sub(ADDRESS_LEN)..];
        out[ADDRESS_LEN - tail.len()..].copy_from_slice(tail);
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl fmt::Display for StakeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", HEXLOWER.encode(&self.0))
    }
}

impl fmt::Debug for StakeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StakeAddress({self})")
    }
}

impl FromStr for StakeAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != ADDRESS_LEN * 2 {
            return Err(AddressParseError::InvalidLength {
                input: s.to_string(),
                digits: digits.len(),
            });
        }
        let decoded = HEXLOWER_PERMISSIVE
            .decode(digits.as_bytes())
            .map_err(|_| AddressParseError::InvalidHex(s.to_string()))?;
        let mut out = [0u8; ADDRESS_LEN];
        out.copy_from_slice(&decoded);
        Ok(Self(out))
    }
}

impl From<[u8; ADDRESS_LEN]> for StakeAddress {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for StakeAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StakeAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
