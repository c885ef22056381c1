//! Insertion-ordered, string-keyed collections of attributes.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::attribute::{AttrMut, AttrRef, Attribute, Element, Keyed, MapAttribute};
use crate::error::{Error, Result};
use crate::types::{Kind, ValueKind};
use crate::value::{Primitive, Value};

/// String-keyed elements kept in first-insertion order.
///
/// Re-appending an existing key replaces its element in place.
#[derive(Clone)]
pub struct Map<T: Element> {
    key: Cow<'static, str>,
    entries: Vec<(String, T)>,
}

pub type TextMap = Map<Value<String>>;
pub type Int32Map = Map<Value<i32>>;
pub type DoubleMap = Map<Value<f64>>;

impl<T: Element> Map<T> {
    pub fn new() -> Self {
        Self {
            key: Cow::Borrowed(""),
            entries: Vec::new(),
        }
    }

    pub fn from_pairs<K: Into<String>>(pairs: impl IntoIterator<Item = (K, T)>) -> Self {
        let mut map = Self::new();
        for (key, value) in pairs {
            map.append(key, value);
        }
        map
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Insert or replace the element under `key`.
    pub fn append(&mut self, key: impl Into<String>, value: T) {
        let key = key.into();
        match self.position(&key) {
            Some(index) => self.entries[index].1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// A default element under `key`, reset in place if the key exists.
    pub fn append_new(&mut self, key: impl Into<String>) -> &mut T {
        let key = key.into();
        let index = match self.position(&key) {
            Some(index) => {
                self.entries[index].1 = T::default();
                index
            }
            None => {
                self.entries.push((key, T::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn try_get(&self, key: &str) -> Result<&T> {
        self.get(key).ok_or_else(|| Error::MissingKey {
            key: key.to_string(),
        })
    }

    pub fn try_get_mut(&mut self, key: &str) -> Result<&mut T> {
        match self.position(key) {
            Some(index) => Ok(&mut self.entries[index].1),
            None => Err(Error::MissingKey {
                key: key.to_string(),
            }),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Remove the entry under `key`, returning its element.
    pub fn remove(&mut self, key: &str) -> Option<T> {
        self.position(key).map(|index| self.entries.remove(index).1)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut T)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }
}

impl<P: Primitive> Map<Value<P>> {
    pub fn append_value(&mut self, key: impl Into<String>, value: P) {
        self.append(key, Value::new(value));
    }

    pub fn value(&self, key: &str) -> Option<&P> {
        self.get(key).map(Value::value)
    }
}

impl<T: Element> Default for Map<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> fmt::Debug for Map<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map")
            .field("key", &self.key)
            .field("entries", &self.entries)
            .finish()
    }
}

impl<T: Element> Keyed for Map<T> {
    fn keyed(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.key = key.into();
        self
    }
}

impl<T: Element> Index<&str> for Map<T> {
    type Output = T;

    fn index(&self, key: &str) -> &T {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key '{}' not found", key),
        }
    }
}

impl<T: Element> IndexMut<&str> for Map<T> {
    fn index_mut(&mut self, key: &str) -> &mut T {
        match self.get_mut(key) {
            Some(value) => value,
            None => panic!("key '{}' not found", key),
        }
    }
}

impl<T: Element> PartialEq for Map<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<T: Element> Attribute for Map<T> {
    fn key(&self) -> &str {
        &self.key
    }

    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn type_name(&self) -> String {
        format!("Map<{}>", T::element_name())
    }

    fn has_value(&self) -> bool {
        !self.entries.is_empty()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn compare(&self, other: &dyn Attribute) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| {
                self.entries.len() == other.entries.len()
                    && self
                        .entries
                        .iter()
                        .zip(&other.entries)
                        .all(|((ka, a), (kb, b))| ka == kb && a.compare(b))
            })
    }

    fn set(&mut self, other: &dyn Attribute) {
        if let Some(other) = other.as_any().downcast_ref::<Self>() {
            self.entries = other.entries.clone();
        }
    }

    fn take(&mut self, other: &mut dyn Attribute) {
        if let Some(other) = other.as_any_mut().downcast_mut::<Self>() {
            self.entries = std::mem::take(&mut other.entries);
        }
    }

    fn view(&self) -> AttrRef<'_> {
        AttrRef::Map(self)
    }

    fn view_mut(&mut self) -> AttrMut<'_> {
        AttrMut::Map(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: Element> MapAttribute for Map<T> {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entry_at(&self, index: usize) -> Option<(&str, &dyn Attribute)> {
        self.entries
            .get(index)
            .map(|(k, v)| (k.as_str(), v as &dyn Attribute))
    }

    fn entry(&self, key: &str) -> Option<&dyn Attribute> {
        self.get(key).map(|v| v as &dyn Attribute)
    }

    fn create(&mut self, key: &str) -> &mut dyn Attribute {
        self.append_new(key)
    }

    fn element_kind(&self) -> Kind {
        T::KIND
    }

    fn value_kind(&self) -> Option<ValueKind> {
        T::VALUE_KIND
    }
}

impl<T: Element> Element for Map<T> {
    const KIND: Kind = Kind::Map;

    fn element_name() -> Cow<'static, str> {
        Cow::Owned(format!("Map<{}>", T::element_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Text;

    #[test]
    fn insertion_order() {
        let mut map = TextMap::new();
        assert_eq!(map.type_name(), "Map<String>");
        assert_eq!(map.kind(), Kind::Map);

        map.append_value("one", "1".to_string());
        map.append_value("two", "2".to_string());
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys(), vec!["one", "two"]);
        assert_eq!(map["one"], "1");

        map.append_value("one", "uno".to_string());
        assert_eq!(map.keys(), vec!["one", "two"]);
        assert_eq!(map["one"], "uno");
    }

    #[test]
    fn lookups() {
        let mut map = Int32Map::from_pairs([("a", Value::new(1)), ("b", Value::new(2))]);
        assert!(map.contains("a"));
        assert!(!map.contains("three"));
        assert_eq!(map.value("b"), Some(&2));
        assert!(matches!(
            map.try_get("three"),
            Err(Error::MissingKey { ref key }) if key == "three"
        ));
        map["b"] += 40;
        assert_eq!(map["b"], 42);
        assert_eq!(map.remove("a").map(Value::into_value), Some(1));
        assert_eq!(map.key_at(0), Some("b"));
        assert!(map.remove("a").is_none());
    }

    #[test]
    #[should_panic(expected = "not found")]
    fn missing_key_panics() {
        let map = TextMap::new();
        let _ = &map["three"];
    }

    #[test]
    fn reflective_create_resets_existing() {
        let mut map = TextMap::new();
        map.append_value("x", "old".to_string());
        map.append_value("y", "keep".to_string());
        MapAttribute::create(&mut map, "x");
        MapAttribute::create(&mut map, "z");
        assert_eq!(map.keys(), vec!["x", "y", "z"]);
        assert_eq!(map["x"], "");
        assert_eq!(
            MapAttribute::entry_at(&map, 1).map(|(k, v)| (k, v.has_value())),
            Some(("y", true))
        );
    }

    #[test]
    fn compare_respects_order() {
        let a = TextMap::from_pairs([("a", Text::from("1")), ("b", Text::from("2"))]);
        let b = TextMap::from_pairs([("b", Text::from("2")), ("a", Text::from("1"))]);
        let mut c = TextMap::new();
        c.set(&a);
        assert!(c.compare(&a));
        assert!(!b.compare(&a));
        assert!(a.has_value());
        c.clear();
        assert!(!c.has_value());
    }
}
