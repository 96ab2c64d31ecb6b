use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RoomCodeError;

pub const ROOM_CODE_LEN: usize = 6;
pub const ROOM_CODE_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Short, human-typeable room identifier. Always stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(pub(super) String);

impl RoomCode {
    /// Parse a code typed by a user. Case-insensitive, surrounding
    /// whitespace ignored.
    pub fn parse(value: &str) -> Result<Self, RoomCodeError> {
        let normalized = value.trim().to_ascii_uppercase();
        let found = normalized.chars().count();
        if found != ROOM_CODE_LEN {
            return Err(RoomCodeError::InvalidLength {
                expected: ROOM_CODE_LEN,
                found,
            });
        }
        for (index, ch) in normalized.chars().enumerate() {
            if !ROOM_CODE_ALPHABET.contains(ch) {
                return Err(RoomCodeError::InvalidCharacter { ch, index });
            }
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for RoomCode {
    type Err = RoomCodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for RoomCode {
    type Error = RoomCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        let code = RoomCode::parse("abc123").unwrap();
        assert_eq!(code.as_str(), "ABC123");
        assert_eq!(code, " AbC123 ".parse().unwrap());
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert_eq!(
            RoomCode::parse("ABC12"),
            Err(RoomCodeError::InvalidLength {
                expected: 6,
                found: 5
            })
        );
    }

    #[test]
    fn test_parse_rejects_symbols() {
        assert_eq!(
            RoomCode::parse("AB-123"),
            Err(RoomCodeError::InvalidCharacter { ch: '-', index: 2 })
        );
    }

    #[test]
    fn test_serde_as_plain_string() {
        let code = RoomCode::parse("XYZ789").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"XYZ789\"");
        let back: RoomCode = serde_json::from_str("\"xyz789\"").unwrap();
        assert_eq!(back, code);
        assert!(serde_json::from_str::<RoomCode>("\"nope\"").is_err());
    }
}
