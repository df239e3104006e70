use serde::{Serialize, Serializer};

/// Values that carry their own lookup key.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// An insertion-ordered map of [`Keyed`] values.
///
/// Re-inserting a key replaces the stored value in place, so an entry keeps the
/// position of its first declaration. Serializes as a JSON object in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V> {
    entries: Vec<V>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V: Keyed> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value`, returning the value it replaced if the key was taken.
    pub fn upsert(&mut self, value: V) -> Option<V> {
        match self.position(value.key()) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx], value)),
            None => {
                self.entries.push(value);
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|entry| entry.key() == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.iter_mut().find(|entry| entry.key() == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Keyed::key)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key() == key)
    }
}

impl<V> OrderedMap<V> {
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, V> IntoIterator for &'a OrderedMap<V> {
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<V: Keyed> FromIterator<V> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut map = Self::new();
        for value in iter {
            map.upsert(value);
        }
        map
    }
}

impl<V: Keyed + Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|entry| (entry.key(), entry)))
    }
}
