// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property values.
//!
//! This module provides [`Value`], the closed set of things a provider or a
//! composite can hold under a key, and [`CompositeKind`] for the two flavours
//! of composite.

use alloc::string::String;

use crate::id::CompositeId;

/// The flavour of a composite value.
///
/// Both kinds can take part in a delegation chain. The kind survives
/// [`CompositeArena::shallow_copy`](crate::CompositeArena::shallow_copy).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum CompositeKind {
    /// A plain keyed record.
    #[default]
    Object,
    /// A callable value that can also carry keyed members.
    Function,
}

/// A value stored under a key.
///
/// Primitive variants are copied around freely. [`Value::Composite`] is a
/// reference to a node in a [`CompositeArena`](crate::CompositeArena);
/// copying the `Value` copies the reference, not the node.
///
/// # Example
///
/// ```rust
/// use understory_property_chain::{CompositeId, Value};
///
/// assert!(!Value::from(3.0).is_composite());
/// assert!(Value::Composite(CompositeId::new(0)).is_composite());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// The absence of a meaningful value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    Text(String),
    /// A reference to a composite value.
    Composite(CompositeId),
}

impl Value {
    /// Returns `true` for composite (reference) values.
    #[must_use]
    #[inline]
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }

    /// Returns the composite handle, or `None` for primitives.
    #[must_use]
    #[inline]
    pub fn as_composite(&self) -> Option<CompositeId> {
        match self {
            Self::Composite(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the string contents of a [`Value::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<CompositeId> for Value {
    fn from(value: CompositeId) -> Self {
        Self::Composite(value)
    }
}
