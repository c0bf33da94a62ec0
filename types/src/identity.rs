//! Participant identity: an opaque, fixed-size account handle.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// A 20-byte participant identity.
///
/// The core only ever compares identities for equality. The hex rendering
/// (`0x` + 40 lowercase digits) is what configuration files and reports use,
/// and it is also the serde representation.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity([u8; Identity::LEN]);

impl Identity {
    /// Length of an identity in bytes.
    pub const LEN: usize = 20;

    pub const ZERO: Self = Self([0u8; Self::LEN]);

    pub fn new(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// An identity with every byte set to `seed`. Used for fixtures.
    pub fn from_seed(seed: u8) -> Self {
        Self([seed; Self::LEN])
    }

    /// Parse a hex-encoded identity, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let raw = hex::decode(digits)
            .map_err(|e| TypesError::InvalidIdentity(format!("{s}: {e}")))?;
        let bytes: [u8; Self::LEN] = raw.try_into().map_err(|raw: Vec<u8>| {
            TypesError::InvalidIdentity(format!(
                "{s}: expected {} bytes, got {}",
                Self::LEN,
                raw.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity(0x{}..)", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Identity {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_prefixed_lowercase_hex() {
        let id = Identity::from_seed(0xab);
        assert_eq!(id.to_string(), format!("0x{}", "ab".repeat(20)));
    }

    #[test]
    fn parses_with_and_without_prefix() {
        let plain = "11".repeat(20);
        let a: Identity = plain.parse().unwrap();
        let b: Identity = format!("0x{plain}").parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a, Identity::from_seed(0x11));
    }

    #[test]
    fn rejects_wrong_length() {
        let err = Identity::from_hex("0xdeadbeef").unwrap_err();
        assert!(matches!(err, TypesError::InvalidIdentity(_)));
    }

    #[test]
    fn rejects_non_hex() {
        assert!(Identity::from_hex(&"zz".repeat(20)).is_err());
    }

    #[test]
    fn serde_uses_hex_string() {
        let id = Identity::from_seed(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "07".repeat(20)));
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
