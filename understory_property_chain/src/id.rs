// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handle types.
//!
//! This module provides [`ProviderId`] for nodes of a provider hierarchy and
//! [`CompositeId`] for composite values stored in a
//! [`CompositeArena`](crate::CompositeArena).

use core::fmt;

/// A handle to a provider in a [`ProviderTable`](crate::ProviderTable).
///
/// Providers are the nodes of the inheritance/mixin hierarchy: instance-level
/// objects (prototypes and instances) and type-level objects alike.
///
/// # Example
///
/// ```rust
/// use understory_property_chain::ProviderId;
///
/// let id = ProviderId::new(7);
/// assert_eq!(id.index(), 7);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProviderId(u32);

impl ProviderId {
    /// Creates a provider ID from a raw table index.
    ///
    /// This is typically called by [`ProviderTable::insert`](crate::ProviderTable::insert)
    /// rather than directly.
    #[must_use]
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the underlying table index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ProviderId").field(&self.0).finish()
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "provider#{}", self.0)
    }
}

/// A handle to a composite value in a [`CompositeArena`](crate::CompositeArena).
///
/// Two `CompositeId`s are equal exactly when they name the same composite, so
/// identity comparisons (the "same object" checks of chain building) are
/// plain `==`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompositeId(u32);

impl CompositeId {
    /// Creates a composite ID from a raw arena index.
    #[must_use]
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the underlying arena index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompositeId").field(&self.0).finish()
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "composite#{}", self.0)
    }
}
