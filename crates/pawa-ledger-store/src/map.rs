//! A map from keys to amounts with a defined zero for absent keys.

use std::collections::BTreeMap;

use pawa_ledger_core::Amount;

/// Key-value container for balances and allowances.
///
/// Absent keys read as [`Amount::ZERO`]. Storing zero removes the key, so
/// the map only ever holds non-zero amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountMap<K: Ord> {
    entries: BTreeMap<K, Amount>,
}

impl<K: Ord> Default for AmountMap<K> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone> AmountMap<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount stored for `key`, or zero.
    pub fn get(&self, key: &K) -> Amount {
        self.entries.get(key).copied().unwrap_or(Amount::ZERO)
    }

    /// Write or re-write the amount for `key`. Zero removes the entry.
    pub fn set(&mut self, key: K, amount: Amount) {
        if amount.is_zero() {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, amount);
        }
    }

    /// Whether a non-zero amount is stored for `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of non-zero entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate non-zero entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Amount)> {
        self.entries.iter()
    }

    /// Sum of all amounts, or `None` on 256-bit overflow.
    pub fn sum(&self) -> Option<Amount> {
        self.entries
            .values()
            .try_fold(Amount::ZERO, |acc, v| acc.checked_add(*v))
    }

    /// Copy out as a plain map.
    pub fn to_btree(&self) -> BTreeMap<K, Amount> {
        self.entries.clone()
    }
}

impl<K: Ord + Clone> FromIterator<(K, Amount)> for AmountMap<K> {
    fn from_iter<T: IntoIterator<Item = (K, Amount)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, amount) in iter {
            map.set(key, amount);
        }
        map
    }
}
