// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instance and type-level resolution modes.
//!
//! The same collection, building, and linking run over two hierarchies: the
//! instance-level one (prototypes and instances) and the type-level one. A
//! [`ResolutionMode`] names the sentinel that ends ancestor walks and how
//! an ancestor's mixins are found.

use smallvec::SmallVec;

use crate::id::ProviderId;
use crate::provider::ProviderGraph;

/// Where an ancestor's mixins are declared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MixinAccess {
    /// On the ancestor's generating type; each mixin contributes its prototype.
    ViaGenerator,
    /// Directly on the ancestor.
    Direct,
}

/// Parameters distinguishing instance-level from type-level resolution.
///
/// # Example
///
/// ```rust
/// use understory_property_chain::{Hierarchy, ResolutionMode};
///
/// let hierarchy = Hierarchy::new();
/// let instance = ResolutionMode::instance(hierarchy.object_root());
/// assert!(instance.is_sentinel(hierarchy.object_root()));
/// assert!(!instance.is_sentinel(hierarchy.type_root()));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolutionMode {
    sentinel: ProviderId,
    mixin_access: MixinAccess,
}

impl ResolutionMode {
    /// Instance-level resolution stopping at `sentinel`.
    #[must_use]
    pub const fn instance(sentinel: ProviderId) -> Self {
        Self {
            sentinel,
            mixin_access: MixinAccess::ViaGenerator,
        }
    }

    /// Type-level resolution stopping at `sentinel`.
    #[must_use]
    pub const fn type_level(sentinel: ProviderId) -> Self {
        Self {
            sentinel,
            mixin_access: MixinAccess::Direct,
        }
    }

    /// Returns the provider at which ancestor walks stop.
    #[must_use]
    #[inline]
    pub const fn sentinel(&self) -> ProviderId {
        self.sentinel
    }

    /// Returns how mixins are located.
    #[must_use]
    #[inline]
    pub const fn mixin_access(&self) -> MixinAccess {
        self.mixin_access
    }

    /// Returns `true` if `provider` is where walks stop.
    #[must_use]
    #[inline]
    pub fn is_sentinel(&self, provider: ProviderId) -> bool {
        provider == self.sentinel
    }

    /// Returns the roots of the mixin walks under `ancestor`, in declaration order.
    ///
    /// In instance mode a mixin type without a prototype contributes itself.
    pub fn mixins_of<G>(&self, graph: &G, ancestor: ProviderId) -> SmallVec<[ProviderId; 4]>
    where
        G: ProviderGraph + ?Sized,
    {
        match self.mixin_access {
            MixinAccess::Direct => graph.mixins(ancestor).iter().copied().collect(),
            MixinAccess::ViaGenerator => {
                let Some(generator) = graph.generator(ancestor) else {
                    return SmallVec::new();
                };
                graph
                    .mixins(generator)
                    .iter()
                    .map(|&mixin| graph.prototype(mixin).unwrap_or(mixin))
                    .collect()
            }
        }
    }
}
