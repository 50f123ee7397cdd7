//! Insertion-ordered string-keyed maps
//!
//! Mapping documents and aggregated containers are read by people and by
//! plotting scripts that expect classes in centrality order (`C0-5`, `C5-10`,
//! `C10-20`, ...), not lexicographic order. [`KeyedMap`] keeps entries in
//! insertion order and serializes as a JSON object in that order; on input the
//! document order is preserved.

use std::{collections::HashMap, fmt, marker::PhantomData};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

/// A map from `String` keys to values that remembers insertion order.
///
/// Entries live in a `Vec`; a hash index from key to position keeps inserts
/// and lookups constant-time for per-event tables of any size.
///
/// ```
/// use centrality_data::keyed::KeyedMap;
///
/// let mut map = KeyedMap::new();
/// map.insert("C0-5", 1);
/// map.insert("C5-10", 2);
/// map.insert("C10-20", 3);
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["C0-5", "C5-10", "C10-20"]);
/// assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"C0-5":1,"C5-10":2,"C10-20":3}"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for KeyedMap<V> {
    fn default() -> Self {
        Self {
            entries: vec![],
            index: HashMap::new(),
        }
    }
}

impl<V> KeyedMap<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing (in place) any previous value for the key.
    pub fn insert<K>(&mut self, key: K, value: V) -> Option<V>
    where
        K: Into<String>,
    {
        let key = key.into();
        if let Some(&position) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[position].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    #[must_use]
    pub fn first(&self) -> Option<(&str, &V)> {
        self.entries.first().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for KeyedMap<V>
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V> IntoIterator for KeyedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

type EntryRef<'a, V> = fn(&'a (String, V)) -> (&'a str, &'a V);

fn entry_ref<V>((key, value): &(String, V)) -> (&str, &V) {
    (key.as_str(), value)
}

impl<'a, V> IntoIterator for &'a KeyedMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = std::iter::Map<std::slice::Iter<'a, (String, V)>, EntryRef<'a, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().map(entry_ref as EntryRef<'a, V>)
    }
}

impl<V> Serialize for KeyedMap<V>
where
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, V> Deserialize<'de> for KeyedMap<V>
where
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KeyedMapVisitor<V>(PhantomData<V>);

        impl<'de, V> Visitor<'de> for KeyedMapVisitor<V>
        where
            V: Deserialize<'de>,
        {
            type Value = KeyedMap<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map with string keys")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = KeyedMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(KeyedMapVisitor(PhantomData))
    }
}
