//! Strong type definitions for the PAWA ledger.
//!
//! Account identifiers are newtypes so an address can never be confused
//! with an amount or a hash at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of an account identifier in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account identifier.
///
/// The all-zero value is the null address: it represents "no account",
/// appears as the source of genesis and the destination of burns, and can
/// never receive tokens through a transfer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// The reserved null address.
    pub const NULL: Self = Self([0u8; ADDRESS_LEN]);

    /// Create a new address from raw bytes.
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Whether this is the null address.
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    /// Derive a deterministic address from a label.
    ///
    /// Derived from the first 20 bytes of Blake3("pawa-address-v0:" || label).
    pub fn derive(label: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"pawa-address-v0:");
        hasher.update(label.as_bytes());
        let hash = hasher.finalize();
        let mut arr = [0u8; ADDRESS_LEN];
        arr.copy_from_slice(&hash.as_bytes()[..ADDRESS_LEN]);
        Self(arr)
    }

    /// Generate a random non-null address.
    pub fn random() -> Self {
        loop {
            let candidate = Self(rand::random());
            if !candidate.is_null() {
                return candidate;
            }
        }
    }

    /// Convert to a `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from a hex string, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits)?;
        if bytes.len() != ADDRESS_LEN {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; ADDRESS_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", &self.to_hex()[..10])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Address {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; ADDRESS_LEN] = slice.try_into()?;
        Ok(Self(arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_hex_roundtrip() {
        let addr = Address::from_bytes([0x42; 20]);
        let hex = addr.to_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 42);
        assert_eq!(Address::from_hex(&hex).unwrap(), addr);
        assert_eq!(Address::from_hex(&hex[2..]).unwrap(), addr);
    }

    #[test]
    fn test_address_rejects_wrong_length() {
        assert!(Address::from_hex("0x1234").is_err());
        assert!(Address::from_hex(&"ab".repeat(32)).is_err());
    }

    #[test]
    fn test_null_address() {
        assert!(Address::NULL.is_null());
        assert!(Address::default().is_null());
        assert_eq!(
            Address::NULL.to_string(),
            "0x0000000000000000000000000000000000000000"
        );
        assert!(!Address::from_bytes([1; 20]).is_null());
    }

    #[test]
    fn test_address_derivation() {
        let a1 = Address::derive("owner");
        let a2 = Address::derive("owner");
        let b = Address::derive("addr1");
        assert_eq!(a1, a2);
        assert_ne!(a1, b);
        assert!(!a1.is_null());
    }

    #[test]
    fn test_random_address_not_null() {
        for _ in 0..16 {
            assert!(!Address::random().is_null());
        }
    }

    #[test]
    fn test_address_debug() {
        let debug = format!("{:?}", Address::from_bytes([0xcd; 20]));
        assert_eq!(debug, "Address(0xcdcdcdcd)");
    }

    #[test]
    fn test_address_parse() {
        let addr: Address = "0xabababababababababababababababababababab".parse().unwrap();
        assert_eq!(addr, Address::from_bytes([0xab; 20]));
    }

    #[test]
    fn test_address_serde_json() {
        let addr = Address::derive("serde");
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(serde_json::from_str::<Address>(&json).unwrap(), addr);
        assert!(serde_json::from_str::<Address>("[1, 2, 3]").is_err());
    }
}
