//! Serde support: maps serialize as maps and sets as sequences, both in key
//! order. Deserializing re-inserts every entry, so later duplicates win.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::index::IndexType;
use crate::map::OrderedMap;
use crate::set::OrderedSet;
use crate::TreeConfig;

impl<K, V, C, Ix> Serialize for OrderedMap<K, V, C, Ix>
where
    K: Serialize,
    V: Serialize,
    Ix: IndexType,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self)
    }
}

impl<'de, K, V> Deserialize<'de> for OrderedMap<K, V>
where
    K: Ord + Deserialize<'de>,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor {
            phantom: PhantomData,
        })
    }
}

struct OrderedMapVisitor<K, V> {
    phantom: PhantomData<(K, V)>,
}

impl<'de, K, V> Visitor<'de> for OrderedMapVisitor<K, V>
where
    K: Ord + Deserialize<'de>,
    V: Deserialize<'de>,
{
    type Value = OrderedMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let config = TreeConfig::new().capacity(access.size_hint().unwrap_or(0));
        let mut map = OrderedMap::with_config(config);
        while let Some((k, v)) = access.next_entry()? {
            let _ignore = map.insert(k, v);
        }
        Ok(map)
    }
}

impl<K, C, Ix> Serialize for OrderedSet<K, C, Ix>
where
    K: Serialize,
    Ix: IndexType,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self)
    }
}

impl<'de, K> Deserialize<'de> for OrderedSet<K>
where
    K: Ord + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(OrderedSetVisitor {
            phantom: PhantomData,
        })
    }
}

struct OrderedSetVisitor<K> {
    phantom: PhantomData<K>,
}

impl<'de, K> Visitor<'de> for OrderedSetVisitor<K>
where
    K: Ord + Deserialize<'de>,
{
    type Value = OrderedSet<K>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let config = TreeConfig::new().capacity(access.size_hint().unwrap_or(0));
        let mut set = OrderedSet::with_config(config);
        while let Some(k) = access.next_element()? {
            let _ignore = set.insert(k);
        }
        Ok(set)
    }
}
