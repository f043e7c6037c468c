// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Providers and the read-only graph seam.
//!
//! This module provides the [`ProviderGraph`] trait that chain resolution
//! reads the hierarchy through, the [`Ancestors`] walk built on top of it, and
//! [`ProviderTable`], the stock graph implementation.

use alloc::boxed::Box;
use alloc::vec::Vec;
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::id::ProviderId;
use crate::value::Value;

/// Read access to a provider hierarchy.
///
/// All property and declaration reads are *own* reads: a provider never
/// reports what it merely inherits from its parent.
pub trait ProviderGraph {
    /// Returns the provider's single parent in the inheritance chain.
    fn parent(&self, provider: ProviderId) -> Option<ProviderId>;

    /// Returns the mixins declared directly on `provider`, in declaration order.
    fn mixins(&self, provider: ProviderId) -> &[ProviderId];

    /// Returns the type-level provider that generated an instance-level provider.
    fn generator(&self, provider: ProviderId) -> Option<ProviderId>;

    /// Returns the instance-level companion of a type-level provider.
    fn prototype(&self, provider: ProviderId) -> Option<ProviderId>;

    /// Returns a property stored directly on `provider`.
    fn own_property(&self, provider: ProviderId, name: &str) -> Option<&Value>;

    /// Returns the chainable names `provider` itself declares under `list_name`.
    fn own_chain_declarations(&self, provider: ProviderId, list_name: &str) -> Option<&[Box<str>]>;
}

/// Walks a provider's ancestor chain.
///
/// Yields the starting provider first, then each parent in turn, up to and
/// including the root of the hierarchy.
///
/// # Example
///
/// ```rust
/// use understory_property_chain::{Ancestors, Provider, ProviderTable};
///
/// let mut table = ProviderTable::new();
/// let root = table.insert(Provider::root());
/// let base = table.insert(Provider::with_parent(root));
/// let derived = table.insert(Provider::with_parent(base));
///
/// let chain: Vec<_> = Ancestors::new(&table, derived).collect();
/// assert_eq!(chain, [derived, base, root]);
/// ```
#[derive(Debug)]
pub struct Ancestors<'a, G: ?Sized> {
    graph: &'a G,
    next: Option<ProviderId>,
}

impl<'a, G: ProviderGraph + ?Sized> Ancestors<'a, G> {
    /// Creates a walk starting at `start`.
    #[must_use]
    pub fn new(graph: &'a G, start: ProviderId) -> Self {
        Self {
            graph,
            next: Some(start),
        }
    }
}

impl<G: ProviderGraph + ?Sized> Iterator for Ancestors<'_, G> {
    type Item = ProviderId;

    fn next(&mut self) -> Option<ProviderId> {
        let current = self.next?;
        self.next = self.graph.parent(current);
        Some(current)
    }
}

/// A node of the hierarchy.
///
/// Instance-level providers (prototypes and instances) record the type that
/// generated them; type-level providers record their prototype. Mixins are
/// declared on type-level providers.
#[derive(Clone, Debug, Default)]
pub struct Provider {
    parent: Option<ProviderId>,
    generator: Option<ProviderId>,
    prototype: Option<ProviderId>,
    mixins: SmallVec<[ProviderId; 2]>,
    properties: HashMap<Box<str>, Value>,
    declarations: HashMap<Box<str>, Vec<Box<str>>>,
}

impl Provider {
    /// Creates a parentless provider.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a provider whose parent is `parent`.
    #[must_use]
    pub fn with_parent(parent: ProviderId) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    /// Returns the parent, if any.
    #[must_use]
    #[inline]
    pub fn parent(&self) -> Option<ProviderId> {
        self.parent
    }

    /// Returns the generating type, if any.
    #[must_use]
    #[inline]
    pub fn generator(&self) -> Option<ProviderId> {
        self.generator
    }

    /// Returns the prototype, if any.
    #[must_use]
    #[inline]
    pub fn prototype(&self) -> Option<ProviderId> {
        self.prototype
    }

    /// Returns the declared mixins.
    #[must_use]
    pub fn mixins(&self) -> &[ProviderId] {
        &self.mixins
    }

    /// Returns an own property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Returns an own chain declaration list.
    #[must_use]
    pub fn declarations(&self, list_name: &str) -> Option<&[Box<str>]> {
        self.declarations.get(list_name).map(Vec::as_slice)
    }

    /// Stores an own property, returning the previous value.
    pub fn set_property(&mut self, name: impl Into<Box<str>>, value: impl Into<Value>) -> Option<Value> {
        self.properties.insert(name.into(), value.into())
    }

    /// Removes an own property.
    pub fn remove_property(&mut self, name: &str) -> Option<Value> {
        self.properties.remove(name)
    }

    /// Replaces the chain declaration list stored under `list_name`.
    pub fn declare_chains<I, S>(&mut self, list_name: impl Into<Box<str>>, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Box<str>>,
    {
        self.declarations
            .insert(list_name.into(), names.into_iter().map(Into::into).collect());
    }

    /// Appends a mixin to the declaration list.
    pub fn push_mixin(&mut self, mixin: ProviderId) {
        self.mixins.push(mixin);
    }

    pub(crate) fn set_generator(&mut self, generator: ProviderId) {
        self.generator = Some(generator);
    }

    pub(crate) fn set_prototype(&mut self, prototype: ProviderId) {
        self.prototype = Some(prototype);
    }
}

/// Storage for providers, addressed by [`ProviderId`].
///
/// Parents must be inserted before their children, so the ancestor relation
/// can never loop.
#[derive(Clone, Debug, Default)]
pub struct ProviderTable {
    providers: Vec<Provider>,
}

impl ProviderTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a provider and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if the provider's parent is not already in the table, or if
    /// more than `u32::MAX` providers are inserted.
    pub fn insert(&mut self, provider: Provider) -> ProviderId {
        if let Some(parent) = provider.parent {
            assert!(
                (parent.index() as usize) < self.providers.len(),
                "parent {parent} is not in the table"
            );
        }
        let index = u32::try_from(self.providers.len()).expect("provider table overflow");
        self.providers.push(provider);
        ProviderId::new(index)
    }

    /// Returns the number of providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Returns the provider for `id`.
    #[must_use]
    pub fn get(&self, id: ProviderId) -> Option<&Provider> {
        self.providers.get(id.index() as usize)
    }

    /// Returns the provider for `id`, mutably.
    #[must_use]
    pub fn get_mut(&mut self, id: ProviderId) -> Option<&mut Provider> {
        self.providers.get_mut(id.index() as usize)
    }
}

impl ProviderGraph for ProviderTable {
    fn parent(&self, provider: ProviderId) -> Option<ProviderId> {
        self.get(provider)?.parent
    }

    fn mixins(&self, provider: ProviderId) -> &[ProviderId] {
        self.get(provider).map(Provider::mixins).unwrap_or_default()
    }

    fn generator(&self, provider: ProviderId) -> Option<ProviderId> {
        self.get(provider)?.generator
    }

    fn prototype(&self, provider: ProviderId) -> Option<ProviderId> {
        self.get(provider)?.prototype
    }

    fn own_property(&self, provider: ProviderId, name: &str) -> Option<&Value> {
        self.get(provider)?.property(name)
    }

    fn own_chain_declarations(&self, provider: ProviderId, list_name: &str) -> Option<&[Box<str>]> {
        self.get(provider)?.declarations(list_name)
    }
}
