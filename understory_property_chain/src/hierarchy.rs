// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A ready-made hierarchy with two sentinel roots.
//!
//! [`Hierarchy`] bundles a [`ProviderTable`] with the [`CompositeArena`] its
//! property values live in, and creates the two roots chain resolution stops
//! at: [`Hierarchy::object_root`] for instance-level providers and
//! [`Hierarchy::type_root`] for type-level ones.
//!
//! Types are modelled as pairs ([`TypeRef`]): a type-level provider and its
//! prototype, the instance-level provider every instance of the type derives
//! from.

use alloc::boxed::Box;

use crate::chainer::init_property_chains;
use crate::composite::{CompositeArena, LayeredView};
use crate::error::ChainError;
use crate::id::{CompositeId, ProviderId};
use crate::mode::ResolutionMode;
use crate::options::ChainOptions;
use crate::provider::{Ancestors, Provider, ProviderGraph, ProviderTable};
use crate::trace::LogTrace;
use crate::value::Value;

/// A type-level provider together with its prototype.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// The type-level provider (where static properties and mixins live).
    pub type_provider: ProviderId,
    /// The instance-level provider instances derive from.
    pub prototype: ProviderId,
}

/// Providers, their composite values, and the two sentinel roots.
///
/// # Example
///
/// ```rust
/// use understory_property_chain::{ChainOptions, Hierarchy, Value};
///
/// let mut h = Hierarchy::new();
/// let a = h.define_type(None);
/// let b = h.define_type(Some(a));
/// h.declare_chains(a.type_provider, "_propertyChains", ["defaults"]);
///
/// let base = h.composite([("retries", 3.0)]);
/// let derived = h.composite([("timeout", 10.0)]);
/// h.set_property(a.type_provider, "defaults", base);
/// h.set_property(b.type_provider, "defaults", derived);
///
/// h.init_static(b.type_provider, &ChainOptions::default()).unwrap();
///
/// let defaults = h.resolve(b.type_provider, "defaults").unwrap();
/// assert_eq!(defaults.get("retries"), Some(&Value::Number(3.0)));
/// ```
#[derive(Clone, Debug)]
pub struct Hierarchy {
    providers: ProviderTable,
    composites: CompositeArena,
    object_root: ProviderId,
    type_root: ProviderId,
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl Hierarchy {
    /// Creates a hierarchy holding only the two roots.
    #[must_use]
    pub fn new() -> Self {
        let mut providers = ProviderTable::new();
        let object_root = providers.insert(Provider::root());
        let type_root = providers.insert(Provider::root());
        Self {
            providers,
            composites: CompositeArena::new(),
            object_root,
            type_root,
        }
    }

    /// Returns the root of the instance-level hierarchy.
    #[must_use]
    #[inline]
    pub fn object_root(&self) -> ProviderId {
        self.object_root
    }

    /// Returns the root of the type-level hierarchy.
    #[must_use]
    #[inline]
    pub fn type_root(&self) -> ProviderId {
        self.type_root
    }

    /// Returns the instance-level resolution mode.
    #[must_use]
    pub fn instance_mode(&self) -> ResolutionMode {
        ResolutionMode::instance(self.object_root)
    }

    /// Returns the type-level resolution mode.
    #[must_use]
    pub fn static_mode(&self) -> ResolutionMode {
        ResolutionMode::type_level(self.type_root)
    }

    /// Returns the provider table.
    #[must_use]
    pub fn providers(&self) -> &ProviderTable {
        &self.providers
    }

    /// Returns the provider table, mutably.
    #[must_use]
    pub fn providers_mut(&mut self) -> &mut ProviderTable {
        &mut self.providers
    }

    /// Returns the composite arena.
    #[must_use]
    pub fn composites(&self) -> &CompositeArena {
        &self.composites
    }

    /// Returns the composite arena, mutably.
    #[must_use]
    pub fn composites_mut(&mut self) -> &mut CompositeArena {
        &mut self.composites
    }

    /// Borrows the providers for reading and the composites for writing at once.
    #[must_use]
    pub fn split_mut(&mut self) -> (&ProviderTable, &mut CompositeArena) {
        (&self.providers, &mut self.composites)
    }

    /// Adds a plain provider under `parent`.
    pub fn add_provider(&mut self, parent: ProviderId) -> ProviderId {
        self.providers.insert(Provider::with_parent(parent))
    }

    /// Defines a type deriving from `base`, or from the roots when `None`.
    pub fn define_type(&mut self, base: Option<TypeRef>) -> TypeRef {
        let (type_parent, proto_parent) = match base {
            Some(base) => (base.type_provider, base.prototype),
            None => (self.type_root, self.object_root),
        };
        let type_provider = self.providers.insert(Provider::with_parent(type_parent));
        let mut prototype = Provider::with_parent(proto_parent);
        prototype.set_generator(type_provider);
        let prototype = self.providers.insert(prototype);
        if let Some(provider) = self.providers.get_mut(type_provider) {
            provider.set_prototype(prototype);
        }
        TypeRef {
            type_provider,
            prototype,
        }
    }

    /// Creates an instance of `ty`.
    pub fn instantiate(&mut self, ty: TypeRef) -> ProviderId {
        self.add_provider(ty.prototype)
    }

    /// Appends `mixin` to `host`'s mixin declarations.
    pub fn add_mixin(&mut self, host: ProviderId, mixin: ProviderId) {
        if let Some(provider) = self.providers.get_mut(host) {
            provider.push_mixin(mixin);
        }
    }

    /// Stores an own property on `provider`, returning the previous value.
    pub fn set_property(
        &mut self,
        provider: ProviderId,
        name: impl Into<Box<str>>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.providers.get_mut(provider)?.set_property(name, value)
    }

    /// Declares chainable names on `provider` under `list_name`.
    pub fn declare_chains<I, S>(&mut self, provider: ProviderId, list_name: impl Into<Box<str>>, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Box<str>>,
    {
        if let Some(provider) = self.providers.get_mut(provider) {
            provider.declare_chains(list_name, names);
        }
    }

    /// Allocates an object composite holding `entries`.
    pub fn composite<K, V, I>(&mut self, entries: I) -> CompositeId
    where
        K: Into<Box<str>>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.composites.alloc_with(entries)
    }

    /// Reads `name` on `provider`, falling back through its ancestors.
    #[must_use]
    pub fn lookup(&self, provider: ProviderId, name: &str) -> Option<&Value> {
        Ancestors::new(&self.providers, provider)
            .find_map(|ancestor| self.providers.own_property(ancestor, name))
    }

    /// Reads `name` on `provider` and returns a layered view if it is composite.
    #[must_use]
    pub fn resolve(&self, provider: ProviderId, name: &str) -> Option<LayeredView<'_>> {
        let id = self.lookup(provider, name)?.as_composite()?;
        Some(self.composites.layered(id))
    }

    /// Initializes instance-level chains for `start`, logging diagnostics.
    ///
    /// # Errors
    ///
    /// See [`init_property_chains`].
    pub fn init_instance(&mut self, start: ProviderId, options: &ChainOptions) -> Result<(), ChainError> {
        let mode = self.instance_mode();
        init_property_chains(
            &self.providers,
            &mut self.composites,
            start,
            &mode,
            options,
            &mut LogTrace,
        )
    }

    /// Initializes type-level chains for `start`, logging diagnostics.
    ///
    /// # Errors
    ///
    /// See [`init_property_chains`].
    pub fn init_static(&mut self, start: ProviderId, options: &ChainOptions) -> Result<(), ChainError> {
        let mode = self.static_mode();
        init_property_chains(
            &self.providers,
            &mut self.composites,
            start,
            &mode,
            options,
            &mut LogTrace,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roots_are_distinct_and_parentless() {
        let h = Hierarchy::new();
        assert_ne!(h.object_root(), h.type_root());
        assert_eq!(h.providers().parent(h.object_root()), None);
        assert_eq!(h.providers().parent(h.type_root()), None);
    }

    #[test]
    fn define_type_wires_both_hierarchies() {
        let mut h = Hierarchy::new();
        let a = h.define_type(None);
        let b = h.define_type(Some(a));

        let providers = h.providers();
        assert_eq!(providers.parent(a.type_provider), Some(h.type_root()));
        assert_eq!(providers.parent(a.prototype), Some(h.object_root()));
        assert_eq!(providers.parent(b.type_provider), Some(a.type_provider));
        assert_eq!(providers.parent(b.prototype), Some(a.prototype));
        assert_eq!(providers.generator(b.prototype), Some(b.type_provider));
        assert_eq!(providers.prototype(b.type_provider), Some(b.prototype));
    }

    #[test]
    fn lookup_falls_back_through_ancestors() {
        let mut h = Hierarchy::new();
        let a = h.define_type(None);
        let b = h.define_type(Some(a));
        h.set_property(a.prototype, "x", 1.0);
        let instance = h.instantiate(b);

        assert_eq!(h.lookup(instance, "x"), Some(&Value::Number(1.0)));
        assert_eq!(h.lookup(instance, "y"), None);
        assert!(h.resolve(instance, "x").is_none());
    }
}
