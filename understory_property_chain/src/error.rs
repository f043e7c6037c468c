// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use alloc::boxed::Box;
use thiserror::Error;

/// Why a composite refused a new delegation target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum LinkRejection {
    /// The composite is frozen and already delegates elsewhere (or nowhere).
    #[error("the value is frozen and cannot take a new delegation target")]
    Frozen,
    /// The target already delegates, directly or transitively, to the composite.
    #[error("the delegation target already falls back to the value, which would form a cycle")]
    Cycle,
    /// The composite or its delegation target is not in the arena.
    #[error("the value or its delegation target does not exist")]
    Missing,
}

/// Error returned when property chains cannot be established.
///
/// Initialization stops at the first failing property. Chains for properties
/// linked before the failure stay linked.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ChainError {
    /// A more-derived value rejected its next less-derived value as delegation target.
    #[error("cannot link property chain `{property}`: {reason}")]
    Link {
        /// The chainable property whose chain failed.
        property: Box<str>,
        /// What the composite objected to.
        reason: LinkRejection,
    },
}

impl ChainError {
    /// Returns the name of the property whose chain could not be linked.
    #[must_use]
    pub fn property(&self) -> &str {
        match self {
            Self::Link { property, .. } => property,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn link_error_names_property() {
        let err = ChainError::Link {
            property: "styles".into(),
            reason: LinkRejection::Frozen,
        };
        assert_eq!(err.property(), "styles");
        let message = err.to_string();
        assert!(message.contains("`styles`"), "{message}");
        assert!(message.contains("frozen"), "{message}");
    }
}
