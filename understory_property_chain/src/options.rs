// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Initialization options.
//!
//! This module provides [`ChainOptions`] and [`ChainOptionsBuilder`] for
//! configuring a chain initialization run.

use alloc::boxed::Box;

/// Default name of the declaration list read from each ancestor.
pub const DEFAULT_PROPERTY_CHAINS_NAME: &str = "_propertyChains";

/// Options for a chain initialization run.
///
/// # Example
///
/// ```rust
/// use understory_property_chain::{ChainOptions, ChainOptionsBuilder};
///
/// let defaults = ChainOptions::default();
/// assert!(defaults.include_mixins());
/// assert_eq!(defaults.property_chains_name(), "_propertyChains");
///
/// let options = ChainOptionsBuilder::new()
///     .include_mixins(false)
///     .property_chains_name("chained")
///     .build();
/// assert!(!options.include_mixins());
/// assert_eq!(options.property_chains_name(), "chained");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainOptions {
    include_mixins: bool,
    property_chains_name: Box<str>,
}

impl ChainOptions {
    /// Returns whether mixin contributions are part of the chains.
    #[must_use]
    #[inline]
    pub fn include_mixins(&self) -> bool {
        self.include_mixins
    }

    /// Returns the name of the declaration list read from each ancestor.
    #[must_use]
    #[inline]
    pub fn property_chains_name(&self) -> &str {
        &self.property_chains_name
    }
}

impl Default for ChainOptions {
    fn default() -> Self {
        Self {
            include_mixins: true,
            property_chains_name: DEFAULT_PROPERTY_CHAINS_NAME.into(),
        }
    }
}

/// Builder for [`ChainOptions`].
#[derive(Clone, Debug, Default)]
pub struct ChainOptionsBuilder {
    options: ChainOptions,
}

impl ChainOptionsBuilder {
    /// Creates a builder holding the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether mixins contribute to the chains.
    #[must_use]
    pub fn include_mixins(mut self, include: bool) -> Self {
        self.options.include_mixins = include;
        self
    }

    /// Sets the name of the declaration list.
    #[must_use]
    pub fn property_chains_name(mut self, name: impl Into<Box<str>>) -> Self {
        self.options.property_chains_name = name.into();
        self
    }

    /// Builds the options.
    #[must_use]
    pub fn build(self) -> ChainOptions {
        self.options
    }
}
