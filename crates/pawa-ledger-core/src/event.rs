//! Ledger events and the append-only audit log entry.
//!
//! Every successful write emits exactly one event. Events are chained into
//! the audit log: each [`LoggedEvent`] carries the id of its predecessor,
//! so the log can be verified offline.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::canonical::compute_event_id;
use crate::types::Address;
use crate::units::Amount;

/// A ledger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Tokens moved. `from` is null for genesis, `to` is null for burns.
    Transfer {
        from: Address,
        to: Address,
        value: Amount,
    },
    /// An allowance was set (replacing any previous value).
    Approval {
        owner: Address,
        spender: Address,
        value: Amount,
    },
}

impl Event {
    pub fn transfer(from: Address, to: Address, value: Amount) -> Self {
        Self::Transfer { from, to, value }
    }

    pub fn approval(owner: Address, spender: Address, value: Amount) -> Self {
        Self::Approval {
            owner,
            spender,
            value,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::Transfer { .. } => EventKind::Transfer,
            Self::Approval { .. } => EventKind::Approval,
        }
    }

    /// The amount carried by the event.
    pub fn value(&self) -> Amount {
        match self {
            Self::Transfer { value, .. } | Self::Approval { value, .. } => *value,
        }
    }

    /// A transfer from the null address (only genesis produces these).
    pub fn is_mint(&self) -> bool {
        matches!(self, Self::Transfer { from, .. } if from.is_null())
    }

    /// A transfer to the null address.
    pub fn is_burn(&self) -> bool {
        matches!(self, Self::Transfer { to, .. } if to.is_null())
    }
}

/// Discriminator for event encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventKind {
    Transfer = 0x01,
    Approval = 0x02,
}

impl EventKind {
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Transfer),
            0x02 => Some(Self::Approval),
            _ => None,
        }
    }
}

/// A 32-byte audit log entry identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub [u8; 32]);

impl EventId {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for EventId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// An event as recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Position in the log, 1-indexed. Genesis is seq 1.
    pub seq: u64,
    /// Id of the preceding entry; `None` only for seq 1.
    pub prev: Option<EventId>,
    /// Content address of this entry.
    pub id: EventId,
    pub event: Event,
}

impl LoggedEvent {
    /// Chain `event` after `prev` at position `seq`, computing its id.
    pub fn new(seq: u64, prev: Option<EventId>, event: Event) -> Self {
        let id = compute_event_id(seq, prev.as_ref(), &event);
        Self {
            seq,
            prev,
            id,
            event,
        }
    }

    /// The entry that follows this one.
    pub fn next(&self, event: Event) -> Self {
        Self::new(self.seq + 1, Some(self.id), event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::whole;

    #[test]
    fn test_event_classification() {
        let owner = Address::derive("owner");
        let mint = Event::transfer(Address::NULL, owner, whole(1));
        let burn = Event::transfer(owner, Address::NULL, whole(1));
        let approval = Event::approval(owner, Address::derive("spender"), whole(5));

        assert!(mint.is_mint() && !mint.is_burn());
        assert!(burn.is_burn() && !burn.is_mint());
        assert!(!approval.is_mint() && !approval.is_burn());
        assert_eq!(approval.kind(), EventKind::Approval);
        assert_eq!(approval.value(), whole(5));
    }

    #[test]
    fn test_event_kind_codes() {
        assert_eq!(EventKind::from_u8(EventKind::Transfer.to_u8()), Some(EventKind::Transfer));
        assert_eq!(EventKind::from_u8(EventKind::Approval.to_u8()), Some(EventKind::Approval));
        assert_eq!(EventKind::from_u8(0x7f), None);
    }

    #[test]
    fn test_logged_event_chain() {
        let owner = Address::derive("owner");
        let first = LoggedEvent::new(1, None, Event::transfer(Address::NULL, owner, whole(10)));
        let second = first.next(Event::approval(owner, Address::derive("a"), whole(1)));

        assert_eq!(second.seq, 2);
        assert_eq!(second.prev, Some(first.id));
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_event_id_display() {
        let id = EventId::from_bytes([0xab; 32]);
        assert_eq!(format!("{}", id), "abababababababab");
        assert_eq!(EventId::from_hex(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn test_logged_event_serde_json() {
        let owner = Address::derive("owner");
        let genesis = LoggedEvent::new(1, None, Event::transfer(Address::NULL, owner, whole(21)));
        let approval = genesis.next(Event::approval(owner, Address::derive("s"), Amount::MAX));

        for entry in [genesis, approval] {
            let json = serde_json::to_string(&entry).unwrap();
            let decoded: LoggedEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded, entry);
            let recomputed = compute_event_id(decoded.seq, decoded.prev.as_ref(), &decoded.event);
            assert_eq!(decoded.id, recomputed);
        }
    }
}
