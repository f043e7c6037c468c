// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composite values with delegated lookup.
//!
//! A composite is a small keyed record that owns at most one *fallback*
//! reference to another composite. Looking a key up checks the composite's own
//! entries first and then defers to the fallback, recursively. Viewed from the
//! most-derived composite, a chain of fallbacks behaves like a layered map: an
//! ordered list of key/value layers whose top layer is the only one written
//! through that composite.
//!
//! # Storage
//!
//! Composites live in a [`CompositeArena`] and are addressed by
//! [`CompositeId`]. Entries are kept in insertion order in a `SmallVec`;
//! composites in a property chain typically carry a handful of keys.

use alloc::boxed::Box;
use alloc::vec::Vec;
use hashbrown::HashSet;
use smallvec::SmallVec;

use crate::error::LinkRejection;
use crate::id::CompositeId;
use crate::value::{CompositeKind, Value};

/// Default inline capacity for composite entries.
const INLINE_CAPACITY: usize = 4;

/// A single composite value.
#[derive(Clone, Debug, Default)]
pub struct Composite {
    kind: CompositeKind,
    entries: SmallVec<[(Box<str>, Value); INLINE_CAPACITY]>,
    fallback: Option<CompositeId>,
    copied_from: Option<CompositeId>,
    frozen: bool,
}

impl Composite {
    /// Returns the kind of this composite.
    #[must_use]
    #[inline]
    pub fn kind(&self) -> CompositeKind {
        self.kind
    }

    /// Returns the composite this one delegates to on a miss.
    #[must_use]
    #[inline]
    pub fn fallback(&self) -> Option<CompositeId> {
        self.fallback
    }

    /// Returns the composite this one is a shallow copy of.
    #[must_use]
    #[inline]
    pub fn copied_from(&self) -> Option<CompositeId> {
        self.copied_from
    }

    /// Returns `true` if the composite is frozen.
    #[must_use]
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Returns the value stored directly on this composite.
    #[must_use]
    pub fn get_own(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| &**k == key)
            .map(|(_, v)| v)
    }

    /// Iterates this composite's own entries in insertion order.
    pub fn own_entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (&**k, v))
    }

    /// Returns the number of own entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the composite has no own entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Arena of [`Composite`] values.
///
/// # Example
///
/// ```rust
/// use understory_property_chain::{CompositeArena, CompositeKind, Value};
///
/// let mut arena = CompositeArena::new();
/// let base = arena.alloc(CompositeKind::Object);
/// arena.insert(base, "a", 1.0);
///
/// let derived = arena.alloc(CompositeKind::Object);
/// arena.insert(derived, "b", 2.0);
/// arena.set_fallback(derived, base).unwrap();
///
/// let view = arena.layered(derived);
/// assert_eq!(view.get("a"), Some(&Value::Number(1.0)));
/// assert_eq!(view.get("b"), Some(&Value::Number(2.0)));
/// assert_eq!(view.get("c"), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CompositeArena {
    nodes: Vec<Composite>,
}

impl CompositeArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of composites ever allocated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if nothing has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocates an empty composite of the given kind.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` composites are allocated.
    pub fn alloc(&mut self, kind: CompositeKind) -> CompositeId {
        let index = u32::try_from(self.nodes.len()).expect("composite arena overflow");
        self.nodes.push(Composite {
            kind,
            ..Composite::default()
        });
        CompositeId::new(index)
    }

    /// Allocates an object composite holding `entries`.
    pub fn alloc_with<K, V, I>(&mut self, entries: I) -> CompositeId
    where
        K: Into<Box<str>>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let id = self.alloc(CompositeKind::Object);
        for (key, value) in entries {
            self.insert(id, key, value);
        }
        id
    }

    /// Returns the composite for `id`, if it exists.
    #[must_use]
    pub fn get(&self, id: CompositeId) -> Option<&Composite> {
        self.nodes.get(id.index() as usize)
    }

    /// Sets an own entry, replacing any previous value under `key`.
    ///
    /// Returns `false` (and stores nothing) if the composite is frozen or unknown.
    pub fn insert(&mut self, id: CompositeId, key: impl Into<Box<str>>, value: impl Into<Value>) -> bool {
        let Some(node) = self.nodes.get_mut(id.index() as usize) else {
            return false;
        };
        if node.frozen {
            return false;
        }
        let key = key.into();
        let value = value.into();
        if let Some(slot) = node.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            node.entries.push((key, value));
        }
        true
    }

    /// Returns the value stored directly on `id`, ignoring its fallback.
    #[must_use]
    pub fn get_own(&self, id: CompositeId, key: &str) -> Option<&Value> {
        self.get(id)?.get_own(key)
    }

    /// Returns the delegation target of `id`.
    #[must_use]
    pub fn fallback(&self, id: CompositeId) -> Option<CompositeId> {
        self.get(id)?.fallback
    }

    /// Freezes `id`: no further entries and no new delegation target.
    pub fn freeze(&mut self, id: CompositeId) {
        if let Some(node) = self.nodes.get_mut(id.index() as usize) {
            node.frozen = true;
        }
    }

    /// Returns the composite `id` was shallow-copied from.
    #[must_use]
    pub fn copied_from(&self, id: CompositeId) -> Option<CompositeId> {
        self.get(id)?.copied_from
    }

    /// Returns `true` if `id` is frozen.
    #[must_use]
    pub fn is_frozen(&self, id: CompositeId) -> bool {
        self.get(id).is_some_and(Composite::is_frozen)
    }

    /// Makes `target` the delegation target of `id`.
    ///
    /// Re-setting the current target always succeeds, frozen or not.
    ///
    /// # Errors
    ///
    /// - [`LinkRejection::Frozen`] if `id` is frozen and `target` differs from
    ///   its current fallback.
    /// - [`LinkRejection::Cycle`] if `target` is `id` or already falls back to `id`.
    /// - [`LinkRejection::Missing`] if `id` or `target` is not in the arena.
    pub fn set_fallback(&mut self, id: CompositeId, target: CompositeId) -> Result<(), LinkRejection> {
        let Some(node) = self.get(id) else {
            return Err(LinkRejection::Missing);
        };
        if self.get(target).is_none() {
            return Err(LinkRejection::Missing);
        }
        if node.fallback == Some(target) {
            return Ok(());
        }
        if node.frozen {
            return Err(LinkRejection::Frozen);
        }
        if self.layers(target).any(|layer| layer == id) {
            return Err(LinkRejection::Cycle);
        }
        self.nodes[id.index() as usize].fallback = Some(target);
        Ok(())
    }

    /// Allocates a shallow copy of `id`.
    ///
    /// The copy carries the same kind and own entries. Composite entries are
    /// copied by reference. The copy has no fallback, is not frozen, and
    /// remembers `id` as [`Composite::copied_from`].
    ///
    /// Returns `None` if `id` is unknown.
    pub fn shallow_copy(&mut self, id: CompositeId) -> Option<CompositeId> {
        let source = self.get(id)?;
        let copy = Composite {
            kind: source.kind,
            entries: source.entries.clone(),
            fallback: None,
            copied_from: Some(id),
            frozen: false,
        };
        let index = u32::try_from(self.nodes.len()).ok()?;
        self.nodes.push(copy);
        Some(CompositeId::new(index))
    }

    /// Iterates `id` followed by every composite on its fallback chain.
    ///
    /// Stops if the chain revisits a composite.
    #[must_use]
    pub fn layers(&self, id: CompositeId) -> Layers<'_> {
        Layers {
            arena: self,
            next: self.get(id).map(|_| id),
            seen: HashSet::new(),
        }
    }

    /// Returns a layered lookup view rooted at `id`.
    #[must_use]
    pub fn layered(&self, id: CompositeId) -> LayeredView<'_> {
        LayeredView { arena: self, top: id }
    }
}

/// Iterator over a composite and its fallbacks, most-derived first.
#[derive(Debug)]
pub struct Layers<'a> {
    arena: &'a CompositeArena,
    next: Option<CompositeId>,
    seen: HashSet<CompositeId>,
}

impl Iterator for Layers<'_> {
    type Item = CompositeId;

    fn next(&mut self) -> Option<CompositeId> {
        let current = self.next?;
        if !self.seen.insert(current) {
            self.next = None;
            return None;
        }
        self.next = self.arena.fallback(current);
        Some(current)
    }
}

/// Delegated lookup starting at one composite.
///
/// The view borrows the arena; it observes links made before it was created.
#[derive(Copy, Clone, Debug)]
pub struct LayeredView<'a> {
    arena: &'a CompositeArena,
    top: CompositeId,
}

impl<'a> LayeredView<'a> {
    /// Returns the top (most-derived) composite.
    #[must_use]
    #[inline]
    pub fn top(&self) -> CompositeId {
        self.top
    }

    /// Iterates the layers from the top composite down to the last fallback.
    pub fn layers(&self) -> Layers<'a> {
        self.arena.layers(self.top)
    }

    /// Looks `key` up on the top layer, then on each fallback in turn.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        let arena = self.arena;
        self.layers().find_map(|layer| arena.get_own(layer, key))
    }

    /// Returns `true` if any layer holds `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the visible keys, most-derived layer first.
    ///
    /// A key shadowed by a more-derived layer is listed once.
    #[must_use]
    pub fn keys(&self) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        for layer in self.layers() {
            let Some(node) = self.arena.get(layer) else {
                continue;
            };
            for (key, _) in node.own_entries() {
                if seen.insert(key) {
                    keys.push(key);
                }
            }
        }
        keys
    }
}
