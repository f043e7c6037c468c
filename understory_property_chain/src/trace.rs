// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics for chain initialization.
//!
//! Chain initialization never fails on a duplicate declaration; it reports
//! one through a [`ChainTrace`] and carries on. [`LogTrace`] forwards reports
//! to the `log` facade. [`ChainRecorder`] keeps them for later inspection.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::id::ProviderId;

/// A callback sink for chain initialization.
pub trait ChainTrace {
    /// Called when `duplicate` declares a chainable name that `first` already
    /// declared. Collection walks most-derived first, so `first` is the
    /// more-derived provider and `duplicate` is `first` itself or one of its
    /// ancestors. The repeated declaration is ignored.
    fn duplicate_declaration(&mut self, name: &str, first: ProviderId, duplicate: ProviderId);

    /// Called after the chain for `name` was linked. `len` counts its values.
    fn chain_linked(&mut self, name: &str, len: usize) {
        let _ = (name, len);
    }
}

/// Forwards chain diagnostics to the `log` facade.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogTrace;

impl ChainTrace for LogTrace {
    fn duplicate_declaration(&mut self, name: &str, first: ProviderId, duplicate: ProviderId) {
        log::warn!(
            "chainable property `{name}` declared by {first} is declared again by {duplicate}; ignoring"
        );
    }

    fn chain_linked(&mut self, name: &str, len: usize) {
        log::debug!("linked property chain `{name}` across {len} values");
    }
}

/// A duplicate declaration seen during collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateDeclaration {
    /// The chainable name.
    pub name: Box<str>,
    /// The provider whose declaration was kept.
    pub first: ProviderId,
    /// The provider whose declaration was ignored.
    pub duplicate: ProviderId,
}

/// Records every report it receives.
#[derive(Clone, Debug, Default)]
pub struct ChainRecorder {
    duplicates: Vec<DuplicateDeclaration>,
    linked: Vec<(Box<str>, usize)>,
}

impl ChainRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the duplicate declarations in report order.
    #[must_use]
    pub fn duplicates(&self) -> &[DuplicateDeclaration] {
        &self.duplicates
    }

    /// Returns `(name, len)` for each linked chain in link order.
    #[must_use]
    pub fn linked(&self) -> &[(Box<str>, usize)] {
        &self.linked
    }

    /// Clears all recorded reports.
    pub fn clear(&mut self) {
        self.duplicates.clear();
        self.linked.clear();
    }
}

impl ChainTrace for ChainRecorder {
    fn duplicate_declaration(&mut self, name: &str, first: ProviderId, duplicate: ProviderId) {
        self.duplicates.push(DuplicateDeclaration {
            name: name.into(),
            first,
            duplicate,
        });
    }

    fn chain_linked(&mut self, name: &str, len: usize) {
        self.linked.push((name.into(), len));
    }
}
