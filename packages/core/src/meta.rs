//! Static per-type record metadata.

/// Type name and ordered field keys of a record type.
///
/// Built once per type as a constant. A record that embeds a base record
/// lists the base's keys first, then its own.
#[derive(Debug, PartialEq, Eq)]
pub struct Meta {
    name: &'static str,
    parent: Option<&'static Meta>,
    own_keys: &'static [&'static str],
}

impl Meta {
    pub const fn new(name: &'static str, own_keys: &'static [&'static str]) -> Self {
        Self {
            name,
            parent: None,
            own_keys,
        }
    }

    pub const fn derived(
        name: &'static str,
        parent: &'static Meta,
        own_keys: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            parent: Some(parent),
            own_keys,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parent(&self) -> Option<&'static Meta> {
        self.parent
    }

    pub fn own_keys(&self) -> &'static [&'static str] {
        self.own_keys
    }

    /// All field keys, parent chain first.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys = match self.parent {
            Some(parent) => parent.keys(),
            None => Vec::new(),
        };
        keys.extend_from_slice(self.own_keys);
        keys
    }

    pub fn len(&self) -> usize {
        self.parent.map_or(0, Meta::len) + self.own_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of `key` in [`Meta::keys`].
    pub fn position(&self, key: &str) -> Option<usize> {
        self.keys().iter().position(|k| *k == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }
}
