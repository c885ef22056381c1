//! Format-independent serialize/deserialize walk.
//!
//! A [`Backend`] only knows how to build and take apart its own carrier
//! values: scalars, objects, maps and lists. [`serialize`] and
//! [`deserialize`] walk an attribute tree by kind and drive the backend, so
//! the omission of defaults, variant discrimination and depth limits behave
//! the same in every format.

use std::borrow::Cow;
use std::fmt;

use crate::attribute::{
    AttrMut, AttrRef, Attribute, EnumAttribute, ListAttribute, MapAttribute, NodeAttribute,
    VariantAttribute,
};
use crate::error::{Error, Result};
use crate::format::Format;
use crate::options::{Limits, Options};
use crate::types::{Scalar, ValueKind};

/// Locates a record field in a carrier: by key for self-describing
/// formats, by number for numbered wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef<'a> {
    pub key: &'a str,
    /// One-based declaration position.
    pub number: u32,
}

impl<'a> FieldRef<'a> {
    pub fn new(key: &'a str, position: usize) -> Self {
        Self {
            key,
            number: position as u32 + 1,
        }
    }
}

/// Carrier construction and inspection for one wire format.
pub trait Backend {
    /// Intermediate value the walk builds or reads, e.g. a JSON value.
    type Carrier: Clone + fmt::Debug;

    fn format(&self) -> Format;

    /// Whether variants are written as a wrapper object keyed by the
    /// alternative instead of being discriminated by their keys.
    fn tagged_variants(&self) -> bool {
        false
    }

    fn pack_scalar(&self, scalar: Scalar<'_>, options: Options) -> Result<Self::Carrier>;

    fn pack_enum(&self, value: &dyn EnumAttribute, options: Options) -> Result<Self::Carrier>;

    fn new_object(&self) -> Self::Carrier;

    fn insert_field(
        &self,
        object: &mut Self::Carrier,
        field: FieldRef<'_>,
        child: Self::Carrier,
    ) -> Result<()>;

    fn new_map(&self) -> Self::Carrier {
        self.new_object()
    }

    fn insert_entry(&self, map: &mut Self::Carrier, key: &str, child: Self::Carrier)
        -> Result<()>;

    fn new_list(&self) -> Self::Carrier;

    fn push_element(&self, list: &mut Self::Carrier, child: Self::Carrier) -> Result<()>;

    /// A carrier that stands for "no value". Deserializing it leaves the
    /// target unchanged.
    fn is_null(&self, carrier: &Self::Carrier) -> bool;

    /// Prepare a carrier for field lookups. Formats that decode nested
    /// objects lazily parse them here, once per object.
    fn open_object<'c>(&self, carrier: &'c Self::Carrier) -> Result<Cow<'c, Self::Carrier>> {
        Ok(Cow::Borrowed(carrier))
    }

    fn field<'c>(
        &self,
        object: &'c Self::Carrier,
        field: FieldRef<'_>,
    ) -> Result<Option<Cow<'c, Self::Carrier>>>;

    /// Keys present in an object, used to discriminate untagged variants.
    fn object_keys(&self, object: &Self::Carrier) -> Result<Vec<String>>;

    fn entries<'c>(
        &self,
        map: &'c Self::Carrier,
    ) -> Result<Vec<(Cow<'c, str>, Cow<'c, Self::Carrier>)>>;

    /// Elements of a list. `kind` is the scalar kind of leaf elements and
    /// lets binary formats unpack packed encodings.
    fn elements<'c>(
        &self,
        list: &'c Self::Carrier,
        kind: Option<ValueKind>,
    ) -> Result<Vec<Cow<'c, Self::Carrier>>>;

    /// Read a scalar of exactly `kind`. Scalars of another kind are
    /// coerced with [`Scalar::coerce`]; non-scalar carriers are an error.
    fn unpack_scalar(&self, carrier: &Self::Carrier, kind: ValueKind) -> Result<Scalar<'static>>;

    fn unpack_enum(&self, carrier: &Self::Carrier, target: &mut dyn EnumAttribute) -> Result<()>;
}

/// Build a carrier for `attr`.
///
/// Record fields still holding their default are left out unless
/// [`Options::WITH_DEFAULTS`] is set. Lists and maps are always built, so an
/// empty container at the root or inside another container is kept.
pub fn serialize<B: Backend>(
    backend: &B,
    attr: &dyn Attribute,
    options: Options,
    limits: Limits,
) -> Result<B::Carrier> {
    let mut walk = Serializer {
        backend,
        options,
        limits,
        depth: 0,
    };
    walk.attribute(attr)
}

/// Fill `attr` from `carrier`.
///
/// Fields absent from the carrier and null carriers keep their current
/// values. Lists and maps present in the carrier replace the existing
/// content.
pub fn deserialize<B: Backend>(
    backend: &B,
    carrier: &B::Carrier,
    attr: &mut dyn Attribute,
    limits: Limits,
) -> Result<()> {
    let mut walk = Deserializer {
        backend,
        limits,
        depth: 0,
    };
    walk.attribute(carrier, attr)
}

fn descend(depth: &mut usize, limits: Limits) -> Result<()> {
    if *depth >= limits.max_depth {
        return Err(Error::DepthExceeded {
            limit: limits.max_depth,
        });
    }
    *depth += 1;
    Ok(())
}

struct Serializer<'b, B: Backend> {
    backend: &'b B,
    options: Options,
    limits: Limits,
    depth: usize,
}

impl<B: Backend> Serializer<'_, B> {
    fn nested<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        descend(&mut self.depth, self.limits)?;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn attribute(&mut self, attr: &dyn Attribute) -> Result<B::Carrier> {
        match attr.view() {
            AttrRef::Value(value) => self.backend.pack_scalar(value.scalar(), self.options),
            AttrRef::Enum(value) => self.backend.pack_enum(value, self.options),
            AttrRef::Node(node) => self.nested(|s| s.node(node)),
            AttrRef::List(list) => self.nested(|s| s.list(list)),
            AttrRef::Map(map) => self.nested(|s| s.map(map)),
            AttrRef::Variant(variant) => self.nested(|s| s.variant(variant)),
        }
    }

    fn node(&mut self, node: &dyn NodeAttribute) -> Result<B::Carrier> {
        self.fields(node, self.options.contains(Options::WITH_DEFAULTS))
    }

    fn fields(&mut self, node: &dyn NodeAttribute, with_defaults: bool) -> Result<B::Carrier> {
        let mut object = self.backend.new_object();
        for (position, field) in node.fields().into_iter().enumerate() {
            if !with_defaults && !field.has_value() {
                log::trace!("{}.{} at default, skipped", node.meta().name(), field.key());
                continue;
            }
            let child = self.attribute(field)?;
            self.backend
                .insert_field(&mut object, FieldRef::new(field.key(), position), child)?;
        }
        Ok(object)
    }

    fn list(&mut self, list: &dyn ListAttribute) -> Result<B::Carrier> {
        let mut carrier = self.backend.new_list();
        for index in 0..list.len() {
            if let Some(item) = list.item(index) {
                let child = self.attribute(item)?;
                self.backend.push_element(&mut carrier, child)?;
            }
        }
        Ok(carrier)
    }

    fn map(&mut self, map: &dyn MapAttribute) -> Result<B::Carrier> {
        let mut carrier = self.backend.new_map();
        for index in 0..map.len() {
            if let Some((key, value)) = map.entry_at(index) {
                let child = self.attribute(value)?;
                self.backend.insert_entry(&mut carrier, key, child)?;
            }
        }
        Ok(carrier)
    }

    fn variant(&mut self, variant: &dyn VariantAttribute) -> Result<B::Carrier> {
        let active = variant.active();
        if !self.backend.tagged_variants() {
            // An empty untagged body would decode as the current alternative.
            let keyless = variant.has_value() && !active.has_value();
            return self.fields(active, keyless || self.options.contains(Options::WITH_DEFAULTS));
        }
        let body = self.node(active)?;
        let mut wrapper = self.backend.new_object();
        let tag = FieldRef::new(active.meta().name(), variant.index());
        self.backend.insert_field(&mut wrapper, tag, body)?;
        Ok(wrapper)
    }
}

struct Deserializer<'b, B: Backend> {
    backend: &'b B,
    limits: Limits,
    depth: usize,
}

impl<B: Backend> Deserializer<'_, B> {
    fn nested<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        descend(&mut self.depth, self.limits)?;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn attribute(&mut self, carrier: &B::Carrier, attr: &mut dyn Attribute) -> Result<()> {
        if self.backend.is_null(carrier) {
            log::trace!("null for {:?}, keeping current value", attr.key());
            return Ok(());
        }
        match attr.view_mut() {
            AttrMut::Value(mut value) => {
                let kind = value.kind();
                let scalar = self.backend.unpack_scalar(carrier, kind)?;
                if value.assign(scalar) {
                    Ok(())
                } else {
                    Err(crate::failure!("cannot store value as {}", kind))
                }
            }
            AttrMut::Enum(value) => self.backend.unpack_enum(carrier, value),
            AttrMut::Node(node) => self.nested(|d| d.node(carrier, node)),
            AttrMut::List(list) => self.nested(|d| d.list(carrier, list)),
            AttrMut::Map(map) => self.nested(|d| d.map(carrier, map)),
            AttrMut::Variant(variant) => self.nested(|d| d.variant(carrier, variant)),
        }
    }

    fn node(&mut self, carrier: &B::Carrier, node: &mut dyn NodeAttribute) -> Result<()> {
        let name = node.meta().name();
        let object = self.backend.open_object(carrier)?;
        for (position, field) in node.fields_mut().into_iter().enumerate() {
            match self
                .backend
                .field(&object, FieldRef::new(field.key(), position))?
            {
                Some(child) => self.attribute(&child, field)?,
                None => log::trace!("{}.{} absent, keeping current value", name, field.key()),
            }
        }
        Ok(())
    }

    fn list(&mut self, carrier: &B::Carrier, list: &mut dyn ListAttribute) -> Result<()> {
        let elements = self.backend.elements(carrier, list.value_kind())?;
        list.clear();
        for element in &elements {
            let item = list.create();
            self.attribute(element, item)?;
        }
        Ok(())
    }

    fn map(&mut self, carrier: &B::Carrier, map: &mut dyn MapAttribute) -> Result<()> {
        let entries = self.backend.entries(carrier)?;
        map.clear();
        for (key, value) in &entries {
            let item = map.create(key);
            self.attribute(value, item)?;
        }
        Ok(())
    }

    fn variant(&mut self, carrier: &B::Carrier, variant: &mut dyn VariantAttribute) -> Result<()> {
        let object = self.backend.open_object(carrier)?;
        if self.backend.tagged_variants() {
            for (index, meta) in variant.alternatives().iter().enumerate() {
                let tag = FieldRef::new(meta.name(), index);
                if let Some(body) = self.backend.field(&object, tag)? {
                    variant.activate(index);
                    return self.node(&body, variant.active_mut());
                }
            }
            log::trace!("no alternative of {} present", variant.type_name());
            return Ok(());
        }

        let observed = self.backend.object_keys(&object)?;
        let keys: Vec<&str> = observed.iter().map(String::as_str).collect();
        if variant.find_better(&keys) {
            self.node(&object, variant.active_mut())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumeration::Enum;
    use crate::list::List;
    use crate::map::Map;
    use crate::value::{Int32, Text};
    use crate::variant::Variant;

    /// Minimal self-describing tree for exercising the walk.
    #[derive(Debug, Clone, PartialEq)]
    enum Tree {
        Null,
        Leaf(Scalar<'static>),
        Object(Vec<(String, Tree)>),
        List(Vec<Tree>),
    }

    struct TreeBackend {
        tagged: bool,
    }

    impl Backend for TreeBackend {
        type Carrier = Tree;

        fn format(&self) -> Format {
            Format::from_static("test/tree")
        }

        fn tagged_variants(&self) -> bool {
            self.tagged
        }

        fn pack_scalar(&self, scalar: Scalar<'_>, _: Options) -> Result<Tree> {
            Ok(Tree::Leaf(scalar.into_owned()))
        }

        fn pack_enum(&self, value: &dyn EnumAttribute, _: Options) -> Result<Tree> {
            Ok(Tree::Leaf(Scalar::String(Cow::Borrowed(value.as_str()))))
        }

        fn new_object(&self) -> Tree {
            Tree::Object(Vec::new())
        }

        fn insert_field(&self, object: &mut Tree, field: FieldRef<'_>, child: Tree) -> Result<()> {
            self.insert_entry(object, field.key, child)
        }

        fn insert_entry(&self, map: &mut Tree, key: &str, child: Tree) -> Result<()> {
            match map {
                Tree::Object(entries) => {
                    entries.push((key.to_string(), child));
                    Ok(())
                }
                _ => Err(crate::failure!("not an object")),
            }
        }

        fn new_list(&self) -> Tree {
            Tree::List(Vec::new())
        }

        fn push_element(&self, list: &mut Tree, child: Tree) -> Result<()> {
            match list {
                Tree::List(items) => {
                    items.push(child);
                    Ok(())
                }
                _ => Err(crate::failure!("not a list")),
            }
        }

        fn is_null(&self, carrier: &Tree) -> bool {
            *carrier == Tree::Null
        }

        fn field<'c>(&self, object: &'c Tree, field: FieldRef<'_>) -> Result<Option<Cow<'c, Tree>>> {
            match object {
                Tree::Object(entries) => Ok(entries
                    .iter()
                    .find(|(k, _)| k == field.key)
                    .map(|(_, v)| Cow::Borrowed(v))),
                _ => Err(crate::failure!("expected object")),
            }
        }

        fn object_keys(&self, object: &Tree) -> Result<Vec<String>> {
            match object {
                Tree::Object(entries) => Ok(entries.iter().map(|(k, _)| k.clone()).collect()),
                _ => Err(crate::failure!("expected object")),
            }
        }

        fn entries<'c>(&self, map: &'c Tree) -> Result<Vec<(Cow<'c, str>, Cow<'c, Tree>)>> {
            match map {
                Tree::Object(entries) => Ok(entries
                    .iter()
                    .map(|(k, v)| (Cow::Borrowed(k.as_str()), Cow::Borrowed(v)))
                    .collect()),
                _ => Err(crate::failure!("expected object")),
            }
        }

        fn elements<'c>(&self, list: &'c Tree, _: Option<ValueKind>) -> Result<Vec<Cow<'c, Tree>>> {
            match list {
                Tree::List(items) => Ok(items.iter().map(Cow::Borrowed).collect()),
                _ => Err(crate::failure!("expected list")),
            }
        }

        fn unpack_scalar(&self, carrier: &Tree, kind: ValueKind) -> Result<Scalar<'static>> {
            match carrier {
                Tree::Leaf(scalar) => Ok(scalar.clone().coerce(kind)),
                _ => Err(crate::failure!("expected scalar")),
            }
        }

        fn unpack_enum(&self, carrier: &Tree, target: &mut dyn EnumAttribute) -> Result<()> {
            match carrier {
                Tree::Leaf(Scalar::String(name)) => {
                    target.set_from_str(name);
                    Ok(())
                }
                _ => Err(crate::failure!("expected enum name")),
            }
        }
    }

    fn leaf_text(text: &str) -> Tree {
        Tree::Leaf(Scalar::String(Cow::Owned(text.to_string())))
    }

    crate::enumeration! {
        enum Mood {
            Calm = 0,
            Cross = 1,
        }
    }

    crate::record! {
        struct Inner {
            label: Text => "label",
        }
    }

    crate::record! {
        struct Outer {
            c: Int32 => "c",
            a: Int32 => "a" = 3,
            mood: Enum<Mood> => "mood",
            inner: Inner => "inner",
            tags: List<Text> => "tags",
            scores: Map<Int32> => "scores",
        }
    }

    crate::record! {
        struct Pair {
            x: Int32 => "x",
            y: Int32 => "y",
        }
    }

    crate::record! {
        struct Single {
            x: Int32 => "x",
        }
    }

    crate::alternatives! {
        enum Shape {
            Pair(Pair),
            Single(Single),
        }
    }

    crate::record! {
        struct Holder {
            shape: Variant<Shape> => "shape",
        }
    }

    crate::record! {
        struct Nest {
            child: List<Nest> => "child",
        }
    }

    fn keys(tree: &Tree) -> Vec<&str> {
        match tree {
            Tree::Object(entries) => entries.iter().map(|(k, _)| k.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    fn backend() -> TreeBackend {
        TreeBackend { tagged: false }
    }

    #[test]
    fn defaults_are_omitted() {
        let outer = Outer::default();
        let tree = serialize(&backend(), &outer, Options::empty(), Limits::default()).unwrap();
        assert_eq!(tree, Tree::Object(Vec::new()));
    }

    #[test]
    fn with_defaults_emits_everything_in_order() {
        let outer = Outer::default();
        let tree = serialize(&backend(), &outer, Options::WITH_DEFAULTS, Limits::default()).unwrap();
        assert_eq!(keys(&tree), vec!["c", "a", "mood", "inner", "tags", "scores"]);
    }

    #[test]
    fn fields_follow_declaration_order() {
        let mut outer = Outer::default();
        outer.a.set_value(1);
        outer.c.set_value(2);
        let tree = serialize(&backend(), &outer, Options::empty(), Limits::default()).unwrap();
        assert_eq!(keys(&tree), vec!["c", "a"]);
    }

    #[test]
    fn round_trip_through_tree() {
        let mut outer = Outer::default();
        outer.c.set_value(7);
        outer.mood.set_value(Mood::Cross);
        outer.inner.label.set_value("dead parrot".into());
        outer.tags.append_value("norwegian".into());
        outer.tags.append_value("blue".into());
        outer.scores.append_value("z", 1);
        outer.scores.append_value("a", 2);

        let b = backend();
        let tree = serialize(&b, &outer, Options::empty(), Limits::default()).unwrap();
        let mut back = Outer::default();
        deserialize(&b, &tree, &mut back, Limits::default()).unwrap();
        assert_eq!(back, outer);
        assert_eq!(back.scores.keys(), vec!["z", "a"]);
    }

    #[test]
    fn absent_and_null_fields_keep_values() {
        let mut outer = Outer::default();
        outer.c.set_value(5);
        let tree = Tree::Object(vec![
            ("a".to_string(), Tree::Null),
            ("inner".to_string(), Tree::Object(vec![("label".to_string(), leaf_text("x"))])),
        ]);
        deserialize(&backend(), &tree, &mut outer, Limits::default()).unwrap();
        assert_eq!(outer.c, 5);
        assert_eq!(outer.a, 3);
        assert_eq!(outer.inner.label, "x");
    }

    #[test]
    fn text_converts_to_numbers() {
        let mut outer = Outer::default();
        let tree = Tree::Object(vec![("c".to_string(), leaf_text("42"))]);
        deserialize(&backend(), &tree, &mut outer, Limits::default()).unwrap();
        assert_eq!(outer.c, 42);

        let unparsable = Tree::Object(vec![("c".to_string(), leaf_text("parrot"))]);
        deserialize(&backend(), &unparsable, &mut outer, Limits::default()).unwrap();
        assert_eq!(outer.c, 0);

        let nested = Tree::Object(vec![("c".to_string(), Tree::List(Vec::new()))]);
        assert!(deserialize(&backend(), &nested, &mut outer, Limits::default()).is_err());
    }

    #[test]
    fn containers_are_replaced() {
        let mut outer = Outer::default();
        outer.tags.append_value("old".into());
        let tree = Tree::Object(vec![(
            "tags".to_string(),
            Tree::List(vec![leaf_text("new"), Tree::Null]),
        )]);
        deserialize(&backend(), &tree, &mut outer, Limits::default()).unwrap();
        assert_eq!(outer.tags.values(), vec!["new", ""]);
    }

    #[test]
    fn untagged_variant_is_discriminated_by_keys() {
        let mut holder = Holder::default();
        holder.shape.reset::<Single>().x.set_value(4);
        let b = backend();
        let tree = serialize(&b, &holder, Options::empty(), Limits::default()).unwrap();

        let mut back = Holder::default();
        deserialize(&b, &tree, &mut back, Limits::default()).unwrap();
        assert!(back.shape.is::<Single>());
        assert_eq!(back, holder);
    }

    #[test]
    fn untagged_alternative_at_defaults_keeps_its_keys() {
        let mut holder = Holder::default();
        holder.shape.reset::<Single>();
        let b = backend();
        let tree = serialize(&b, &holder, Options::empty(), Limits::default()).unwrap();
        let Tree::Object(fields) = &tree else {
            panic!("expected object");
        };
        assert_eq!(keys(&fields[0].1), vec!["x"]);

        let mut back = Holder::default();
        deserialize(&b, &tree, &mut back, Limits::default()).unwrap();
        assert!(back.shape.is::<Single>());

        // the first alternative at defaults has nothing to say
        let tree = serialize(&b, &Holder::default(), Options::empty(), Limits::default()).unwrap();
        assert!(keys(&tree).is_empty());
    }

    #[test]
    fn tagged_variant_uses_wrapper() {
        let mut holder = Holder::default();
        holder.shape.reset::<Single>().x.set_value(4);
        let b = TreeBackend { tagged: true };
        let tree = serialize(&b, &holder, Options::empty(), Limits::default()).unwrap();
        let Tree::Object(fields) = &tree else {
            panic!("expected object");
        };
        assert_eq!(keys(&fields[0].1), vec!["Single"]);

        let mut back = Holder::default();
        deserialize(&b, &tree, &mut back, Limits::default()).unwrap();
        assert!(back.shape.is::<Single>());
        assert_eq!(back, holder);
    }

    #[test]
    fn depth_is_bounded() {
        let mut nest = Nest::default();
        let mut cursor = &mut nest;
        for _ in 0..10 {
            cursor = cursor.child.append_new();
        }
        let limits = Limits::new(8);
        let err = serialize(&backend(), &nest, Options::empty(), limits).unwrap_err();
        assert!(matches!(err, Error::DepthExceeded { limit: 8 }));

        let tree = serialize(&backend(), &nest, Options::empty(), Limits::default()).unwrap();
        let mut back = Nest::default();
        let err = deserialize(&backend(), &tree, &mut back, limits).unwrap_err();
        assert!(matches!(err, Error::DepthExceeded { limit: 8 }));
        deserialize(&backend(), &tree, &mut back, Limits::default()).unwrap();
        assert_eq!(back, nest);
    }

    #[test]
    fn root_containers_are_kept_when_empty() {
        let list = List::<Int32>::new();
        let tree = serialize(&backend(), &list, Options::empty(), Limits::default()).unwrap();
        assert_eq!(tree, Tree::List(Vec::new()));
        assert_eq!(Outer::default().meta().name(), "Outer");
    }
}
