//! Canonical CBOR encoding for audit log entries.
//!
//! Deterministic encoding rules:
//! - Map keys are small integers, sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - Amounts are 32-byte big-endian byte strings, never floats
//!
//! The same entry always produces identical bytes, and thus an identical
//! [`EventId`], on every platform.

use ciborium::value::{Integer, Value};

use crate::error::CoreError;
use crate::event::{Event, EventId, EventKind};
use crate::types::{Address, ADDRESS_LEN};
use crate::units::Amount;

/// Domain separator prepended before hashing canonical bytes into an id.
pub const EVENT_ID_DOMAIN: &[u8] = b"pawa-event-v0:";

/// Entry field keys (integer keys for compact encoding).
mod keys {
    pub const SEQ: u64 = 0;
    pub const PREV: u64 = 1;
    pub const KIND: u64 = 2;
    /// `from` for transfers, `owner` for approvals.
    pub const SOURCE: u64 = 3;
    /// `to` for transfers, `spender` for approvals.
    pub const TARGET: u64 = 4;
    pub const VALUE: u64 = 5;
}

/// Encode a log entry to canonical CBOR bytes.
pub fn canonical_event_bytes(seq: u64, prev: Option<&EventId>, event: &Event) -> Vec<u8> {
    let value = entry_to_cbor_value(seq, prev, event);
    let mut buf = Vec::new();
    encode_value_to(&mut buf, &value);
    buf
}

/// Compute the id of a log entry: Blake3(EVENT_ID_DOMAIN || canonical bytes).
pub fn compute_event_id(seq: u64, prev: Option<&EventId>, event: &Event) -> EventId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(EVENT_ID_DOMAIN);
    hasher.update(&canonical_event_bytes(seq, prev, event));
    EventId(*hasher.finalize().as_bytes())
}

fn entry_to_cbor_value(seq: u64, prev: Option<&EventId>, event: &Event) -> Value {
    let (source, target, amount) = match event {
        Event::Transfer { from, to, value } => (from, to, value),
        Event::Approval {
            owner,
            spender,
            value,
        } => (owner, spender, value),
    };

    let prev_value = match prev {
        Some(id) => Value::Bytes(id.0.to_vec()),
        None => Value::Null,
    };

    Value::Map(vec![
        (int(keys::SEQ), int(seq)),
        (int(keys::PREV), prev_value),
        (int(keys::KIND), int(event.kind().to_u8().into())),
        (int(keys::SOURCE), Value::Bytes(source.0.to_vec())),
        (int(keys::TARGET), Value::Bytes(target.0.to_vec())),
        (
            int(keys::VALUE),
            Value::Bytes(amount.to_be_bytes::<32>().to_vec()),
        ),
    ])
}

fn int(n: u64) -> Value {
    Value::Integer(Integer::from(n))
}

/// Recursively encode a CBOR value.
///
/// Only the value shapes produced by [`entry_to_cbor_value`] are emitted.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => {
            // Entries only contain non-negative integers.
            let n = i128::from(*i);
            encode_uint(buf, 0, n as u64);
        }
        Value::Bytes(b) => {
            encode_uint(buf, 2, b.len() as u64);
            buf.extend_from_slice(b);
        }
        Value::Map(entries) => {
            encode_map_canonical(buf, entries);
        }
        Value::Null => {
            buf.push(0xf6);
        }
        _ => unreachable!("log entries only contain integers, bytes, maps and null"),
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a map (major type 5) with keys sorted by encoded bytes.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) {
    let mut pairs: Vec<(Vec<u8>, &Value)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::new();
            encode_value_to(&mut key_buf, k);
            (key_buf, v)
        })
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, pairs.len() as u64);
    for (key_bytes, value) in pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}

/// Decode a log entry from canonical bytes.
///
/// Returns `(seq, prev, event)`. The id is not part of the encoding; callers
/// recompute it with [`compute_event_id`].
pub fn decode_event(bytes: &[u8]) -> Result<(u64, Option<EventId>, Event), CoreError> {
    let value: Value =
        ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))?;

    let map = match &value {
        Value::Map(m) => m,
        _ => return Err(CoreError::MalformedEvent("expected map".into())),
    };

    let get = |key: u64| lookup(map, key);

    let get_uint = |key: u64, field: &str| -> Result<u64, CoreError> {
        match get(key) {
            Some(Value::Integer(i)) => u64::try_from(i128::from(*i))
                .map_err(|_| CoreError::MalformedEvent(format!("{field} out of range"))),
            _ => Err(CoreError::MalformedEvent(format!("missing {field}"))),
        }
    };

    let get_address = |key: u64, field: &str| -> Result<Address, CoreError> {
        match get(key) {
            Some(Value::Bytes(b)) if b.len() == ADDRESS_LEN => Address::try_from(b.as_slice())
                .map_err(|_| CoreError::MalformedEvent(format!("invalid {field}"))),
            _ => Err(CoreError::MalformedEvent(format!("invalid {field}"))),
        }
    };

    let seq = get_uint(keys::SEQ, "seq")?;

    let prev = match get(keys::PREV) {
        Some(Value::Null) => None,
        Some(Value::Bytes(b)) if b.len() == 32 => {
            let mut arr = [0u8; 32];
            arr.copy_from_slice(b);
            Some(EventId(arr))
        }
        _ => return Err(CoreError::MalformedEvent("invalid prev".into())),
    };

    let kind_code = get_uint(keys::KIND, "kind")?;
    let kind = u8::try_from(kind_code)
        .ok()
        .and_then(EventKind::from_u8)
        .ok_or(CoreError::UnknownKind(kind_code))?;

    let source = get_address(keys::SOURCE, "source")?;
    let target = get_address(keys::TARGET, "target")?;

    let value = match get(keys::VALUE) {
        Some(Value::Bytes(b)) if b.len() == 32 => Amount::try_from_be_slice(b)
            .ok_or_else(|| CoreError::MalformedEvent("invalid value".into()))?,
        _ => return Err(CoreError::MalformedEvent("invalid value".into())),
    };

    let event = match kind {
        EventKind::Transfer => Event::transfer(source, target, value),
        EventKind::Approval => Event::approval(source, target, value),
    };

    Ok((seq, prev, event))
}

/// Find a map value by integer key.
fn lookup(map: &[(Value, Value)], key: u64) -> Option<&Value> {
    map.iter()
        .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == key as i128))
        .map(|(_, v)| v)
}
