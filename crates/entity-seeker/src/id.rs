//! Record identifiers.
//!
//! A record is addressed by a [`RecordId`]: the [`RecordTypeId`] of its type
//! plus a [`LocalId`] unique within that type. The textual form is
//! `<type>-<local>`, e.g. `"3-42"`.

use std::fmt;
use std::str::FromStr;

use crate::error::SeekerError;

/// Identifier of a record within its type.
pub type LocalId = u64;

/// Opaque identifier of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RecordTypeId(pub u32);

impl RecordTypeId {
    /// Returns the raw numeric value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for RecordTypeId {
    fn from(id: u32) -> Self {
        RecordTypeId(id)
    }
}

impl fmt::Display for RecordTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Composite key of a stored record.
///
/// Two ids are equal iff both the type and the local id are equal. Ids order
/// by type first, then by local id.
///
/// # Example
///
/// ```
/// use entity_seeker::{RecordId, RecordTypeId};
///
/// let id: RecordId = "3-42".parse().unwrap();
/// assert_eq!(id, RecordId::new(RecordTypeId(3), 42));
/// assert_eq!(id.to_string(), "3-42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId {
    type_id: RecordTypeId,
    local_id: LocalId,
}

impl RecordId {
    /// Creates a record id.
    pub fn new(type_id: RecordTypeId, local_id: LocalId) -> Self {
        RecordId { type_id, local_id }
    }

    /// Returns the type component.
    pub fn type_id(&self) -> RecordTypeId {
        self.type_id
    }

    /// Returns the local component.
    pub fn local_id(&self) -> LocalId {
        self.local_id
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.type_id, self.local_id)
    }
}

impl FromStr for RecordId {
    type Err = SeekerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SeekerError::InvalidRecordId(s.to_string());

        let (type_part, local_part) = s.split_once('-').ok_or_else(invalid)?;
        if !is_digits(type_part) || !is_digits(local_part) {
            return Err(invalid());
        }

        let type_id = type_part.parse::<u32>().map_err(|_| invalid())?;
        let local_id = local_part.parse::<LocalId>().map_err(|_| invalid())?;
        Ok(RecordId::new(RecordTypeId(type_id), local_id))
    }
}

/// Returns `true` for a non-empty run of ASCII digits.
///
/// `str::parse` also accepts a leading `+`, which ids never carry.
pub(crate) fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_equality() {
        let a = RecordId::new(RecordTypeId(0), 1);
        assert_eq!(a, RecordId::new(RecordTypeId(0), 1));
        assert_ne!(a, RecordId::new(RecordTypeId(1), 1));
        assert_ne!(a, RecordId::new(RecordTypeId(0), 2));
    }

    #[test]
    fn record_id_ordering() {
        let a = RecordId::new(RecordTypeId(0), 9);
        let b = RecordId::new(RecordTypeId(1), 0);
        let c = RecordId::new(RecordTypeId(1), 5);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn record_id_display_and_parse() {
        let id = RecordId::new(RecordTypeId(7), 123);
        assert_eq!(id.to_string(), "7-123");
        assert_eq!("7-123".parse::<RecordId>(), Ok(id));
    }

    #[test]
    fn record_id_parse_rejects_garbage() {
        for text in ["", "7", "7-", "-1", "7-x", "+7-1", "7-+1", "7--1", "7-1-2", " 7-1"] {
            assert_eq!(
                text.parse::<RecordId>(),
                Err(SeekerError::InvalidRecordId(text.to_string())),
                "{text:?} should not parse"
            );
        }
    }

    #[test]
    fn record_id_parse_rejects_overflow() {
        assert!("4294967296-1".parse::<RecordId>().is_err());
        assert!("1-18446744073709551616".parse::<RecordId>().is_err());
    }

    #[test]
    fn digits_only() {
        assert!(is_digits("0"));
        assert!(is_digits("0123"));
        assert!(!is_digits(""));
        assert!(!is_digits("+1"));
        assert!(!is_digits("1x"));
        assert!(!is_digits(" 1"));
    }
}
