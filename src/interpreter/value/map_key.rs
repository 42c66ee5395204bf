use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
};

use ordered_float::OrderedFloat;

use crate::interpreter::value::core::Value;

/// The hashable form of a value used as a map key.
///
/// Derived once, when an entry is stored. A string key is snapshotted, so
/// mutating the string afterwards does not move the entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MapKey {
    /// `nil`
    Nil,
    /// A boolean such as `true`.
    Bool(bool),
    /// A number such as `3.5`.
    Number(OrderedFloat<f64>),
    /// The contents of a string instance.
    Str(String),
    /// Any other object, by address.
    Identity(usize),
}

impl From<&Value> for MapKey {
    fn from(v: &Value) -> Self {
        match v {
            Value::Nil => Self::Nil,
            Value::Bool(b) => Self::Bool(*b),
            // `0.0` and `-0.0` compare equal, so they must share a key
            Value::Number(n) => Self::Number(OrderedFloat(*n + 0.0)),
            other => other.as_str().map_or_else(|| Self::Identity(other.identity().unwrap_or(0)),
                                                Self::Str),
        }
    }
}

impl Hash for MapKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Nil => state.write_u8(0),
            Self::Bool(b) => {
                state.write_u8(1);
                b.hash(state);
            },
            Self::Number(n) => {
                state.write_u8(2);
                n.hash(state);
            },
            Self::Str(s) => {
                state.write_u8(3);
                s.hash(state);
            },
            Self::Identity(id) => {
                state.write_u8(4);
                id.hash(state);
            },
        }
    }
}

/// Insertion-ordered storage behind map instances.
///
/// Entries keep the original key value, so `keys()` hands back the same
/// objects that were stored.
#[derive(Clone, Debug, Default)]
pub struct MapTable {
    entries: Vec<(Value, Value)>,
    index:   HashMap<MapKey, usize>,
}

impl MapTable {
    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<Value> {
        self.index
            .get(&MapKey::from(key))
            .map(|&i| self.entries[i].1.clone())
    }

    /// Returns `true` if `key` has an entry.
    #[must_use]
    pub fn contains(&self, key: &Value) -> bool {
        self.index.contains_key(&MapKey::from(key))
    }

    /// Inserts or replaces the entry for `key`. A replaced entry keeps its
    /// position.
    ///
    /// # Example
    /// ```
    /// use kestrel::interpreter::value::{core::Value, map_key::MapTable};
    ///
    /// let mut table = MapTable::default();
    /// table.insert(Value::Number(1.0), Value::Bool(true));
    /// table.insert(Value::Number(2.0), Value::Nil);
    /// table.insert(Value::Number(1.0), Value::Bool(false));
    ///
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.get(&Value::Number(1.0)), Some(Value::Bool(false)));
    /// assert_eq!(table.keys(), vec![Value::Number(1.0), Value::Number(2.0)]);
    /// ```
    pub fn insert(&mut self, key: Value, value: Value) {
        let hashed = MapKey::from(&key);
        if let Some(&i) = self.index.get(&hashed) {
            self.entries[i].1 = value;
        } else {
            self.index.insert(hashed, self.entries.len());
            self.entries.push((key, value));
        }
    }

    /// Removes the entry for `key` and returns its value.
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        let i = self.index.remove(&MapKey::from(key))?;
        let (_, value) = self.entries.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(value)
    }

    /// Keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<Value> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Values in insertion order.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        self.entries.iter().map(|(_, v)| v.clone()).collect()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.entries.clone()
    }
}
