//! Ordered, homogeneous collections of attributes.

use std::any::Any;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::attribute::{AttrMut, AttrRef, Attribute, Element, Keyed, ListAttribute};
use crate::enumeration::{Enum, Enumerated};
use crate::error::{Error, Result};
use crate::types::{Kind, ValueKind};
use crate::value::{Primitive, Value};

/// An ordered sequence of elements of one attribute type.
///
/// Elements are keyless. Direct indexing with `[]` panics when out of
/// range; use [`List::get`] or [`List::try_get`] for checked access.
#[derive(Clone)]
pub struct List<T: Element> {
    key: Cow<'static, str>,
    items: Vec<T>,
}

pub type TextList = List<Value<String>>;
pub type Int32List = List<Value<i32>>;
pub type Int64List = List<Value<i64>>;
pub type DoubleList = List<Value<f64>>;
pub type BoolList = List<Value<bool>>;

impl<T: Element> List<T> {
    pub fn new() -> Self {
        Self {
            key: Cow::Borrowed(""),
            items: Vec::new(),
        }
    }

    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            key: Cow::Borrowed(""),
            items: items.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn try_get(&self, index: usize) -> Result<&T> {
        let len = self.items.len();
        self.items
            .get(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    pub fn try_get_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    /// Append a default element and return it for filling in.
    pub fn append_new(&mut self) -> &mut T {
        let index = self.items.len();
        self.items.push(T::default());
        &mut self.items[index]
    }

    pub fn append_all(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.extend(items);
    }

    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|i| i == item)
    }

    pub fn index_of_by(&self, pred: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items.iter().position(pred)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.index_of(item).is_some()
    }

    pub fn find(&self, item: &T) -> Option<&T> {
        self.items.iter().find(|i| *i == item)
    }

    pub fn find_by(&self, mut pred: impl FnMut(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|i| pred(i))
    }

    pub fn find_mut_by(&mut self, mut pred: impl FnMut(&T) -> bool) -> Option<&mut T> {
        self.items.iter_mut().find(|i| pred(i))
    }

    pub fn find_item(&self, item: &T) -> Option<T> {
        self.find(item).cloned()
    }

    /// Copy of the first matching element.
    pub fn find_item_by(&self, pred: impl FnMut(&T) -> bool) -> Option<T> {
        self.find_by(pred).cloned()
    }

    /// Remove every element equal to `item`. Returns whether any was removed.
    pub fn remove(&mut self, item: &T) -> bool {
        self.remove_by(|i| i == item)
    }

    pub fn remove_by(&mut self, mut pred: impl FnMut(&T) -> bool) -> bool {
        let before = self.items.len();
        self.items.retain(|i| !pred(i));
        self.items.len() != before
    }

    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        let len = self.items.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        Ok(self.items.remove(index))
    }

    pub fn sort_by(&mut self, compare: impl FnMut(&T, &T) -> Ordering) {
        self.items.sort_by(compare);
    }

    pub fn sorted_by(&self, compare: impl FnMut(&T, &T) -> Ordering) -> Self {
        let mut sorted = self.clone();
        sorted.sort_by(compare);
        sorted
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Element + PartialOrd> List<T> {
    /// Sort in place. Incomparable elements keep their relative order.
    pub fn sort(&mut self) {
        self.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    }

    pub fn sorted(&self) -> Self {
        let mut sorted = self.clone();
        sorted.sort();
        sorted
    }
}

impl<P: Primitive> List<Value<P>> {
    pub fn from_values(values: impl IntoIterator<Item = P>) -> Self {
        Self::from_items(values.into_iter().map(Value::new))
    }

    pub fn append_value(&mut self, value: P) {
        self.items.push(Value::new(value));
    }

    pub fn append_values(&mut self, values: impl IntoIterator<Item = P>) {
        self.items.extend(values.into_iter().map(Value::new));
    }

    pub fn index_of_value(&self, value: &P) -> Option<usize> {
        self.items.iter().position(|i| i.value() == value)
    }

    pub fn contains_value(&self, value: &P) -> bool {
        self.index_of_value(value).is_some()
    }

    pub fn remove_value(&mut self, value: &P) -> bool {
        self.remove_by(|i| i.value() == value)
    }

    pub fn values(&self) -> Vec<P> {
        self.items.iter().map(|i| i.value().clone()).collect()
    }
}

impl<E: Enumerated> List<Enum<E>> {
    pub fn from_values(values: impl IntoIterator<Item = E>) -> Self {
        Self::from_items(values.into_iter().map(Enum::new))
    }

    pub fn append_value(&mut self, value: E) {
        self.items.push(Enum::new(value));
    }

    pub fn append_values(&mut self, values: impl IntoIterator<Item = E>) {
        self.items.extend(values.into_iter().map(Enum::new));
    }

    pub fn values(&self) -> Vec<E> {
        self.items.iter().map(Enum::value).collect()
    }
}

impl<T: Element> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("key", &self.key)
            .field("items", &self.items)
            .finish()
    }
}

impl<T: Element> Keyed for List<T> {
    fn keyed(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.key = key.into();
        self
    }
}

impl<T: Element> Index<usize> for List<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.items.get(index) {
            Some(item) => item,
            None => panic!(
                "index {} out of range for list of length {}",
                index,
                self.items.len()
            ),
        }
    }
}

impl<T: Element> IndexMut<usize> for List<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.items.len();
        match self.items.get_mut(index) {
            Some(item) => item,
            None => panic!("index {} out of range for list of length {}", index, len),
        }
    }
}

impl<'a, T: Element> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Element> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T: Element> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Element> Attribute for List<T> {
    fn key(&self) -> &str {
        &self.key
    }

    fn kind(&self) -> Kind {
        Kind::List
    }

    fn type_name(&self) -> String {
        format!("List<{}>", T::element_name())
    }

    fn has_value(&self) -> bool {
        !self.items.is_empty()
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn compare(&self, other: &dyn Attribute) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| {
                self.items.len() == other.items.len()
                    && self
                        .items
                        .iter()
                        .zip(&other.items)
                        .all(|(a, b)| a.compare(b))
            })
    }

    fn set(&mut self, other: &dyn Attribute) {
        if let Some(other) = other.as_any().downcast_ref::<Self>() {
            self.items = other.items.clone();
        }
    }

    fn take(&mut self, other: &mut dyn Attribute) {
        if let Some(other) = other.as_any_mut().downcast_mut::<Self>() {
            self.items = std::mem::take(&mut other.items);
        }
    }

    fn view(&self) -> AttrRef<'_> {
        AttrRef::List(self)
    }

    fn view_mut(&mut self) -> AttrMut<'_> {
        AttrMut::List(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: Element> ListAttribute for List<T> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn item(&self, index: usize) -> Option<&dyn Attribute> {
        self.items.get(index).map(|i| i as &dyn Attribute)
    }

    fn create(&mut self) -> &mut dyn Attribute {
        self.append_new()
    }

    fn element_kind(&self) -> Kind {
        T::KIND
    }

    fn value_kind(&self) -> Option<ValueKind> {
        T::VALUE_KIND
    }
}

impl<T: Element> Element for List<T> {
    const KIND: Kind = Kind::List;

    fn element_name() -> Cow<'static, str> {
        Cow::Owned(format!("List<{}>", T::element_name()))
    }
}
