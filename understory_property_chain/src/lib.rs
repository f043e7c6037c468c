// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Property Chain: delegation chains for chainable properties.
//!
//! Providers form a hierarchy: a single-parent inheritance chain ending at a
//! sentinel root, plus mixins composed in at any level. Some properties are
//! declared *chainable*. For each chainable name this crate gathers the
//! composite value every provider owns under that name and links them into a
//! delegation chain, so that reading a key resolves like a method lookup:
//! most-derived value first, then each less-derived one in turn.
//!
//! ## Pipeline
//!
//! 1. **Collect** ([`collect_declarations`]): walk the ancestors and union
//!    their own declaration lists. A name declared twice is reported to a
//!    [`ChainTrace`] and otherwise ignored.
//! 2. **Build** ([`build_chains`]): one depth-first walk over ancestors and
//!    their mixins records, per name, an ordered list of
//!    `(provider, composite)` pairs. A revisited provider moves to its latest
//!    position. Mixin-sourced composites are shallow-copied.
//! 3. **Link** ([`link_chain`]): each value's fallback becomes the next
//!    value in its chain. A frozen value that would need a new fallback fails
//!    the run with [`ChainError::Link`].
//!
//! [`init_property_chains`] runs all three.
//!
//! ## Two Modes
//!
//! A [`ResolutionMode`] picks the sentinel root and how mixins are found:
//! instance-level providers find mixins on the type that generated them,
//! type-level providers carry their own. [`Hierarchy`] sets up both roots.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_property_chain::{ChainOptions, Hierarchy, Value};
//!
//! let mut h = Hierarchy::new();
//! let a = h.define_type(None);
//! let b = h.define_type(Some(a));
//! let c = h.define_type(Some(b));
//! h.declare_chains(a.prototype, "_propertyChains", ["x"]);
//!
//! let xa = h.composite([("a", 1.0)]);
//! let xb = h.composite([("b", 2.0)]);
//! let xc = h.composite([("c", 3.0)]);
//! h.set_property(a.prototype, "x", xa);
//! h.set_property(b.prototype, "x", xb);
//! h.set_property(c.prototype, "x", xc);
//!
//! let instance = h.instantiate(c);
//! h.init_instance(instance, &ChainOptions::default()).unwrap();
//!
//! let x = h.resolve(instance, "x").unwrap();
//! assert_eq!(x.top(), xc);
//! assert_eq!(x.get("a"), Some(&Value::Number(1.0)));
//! assert_eq!(x.get("b"), Some(&Value::Number(2.0)));
//! assert_eq!(x.get("c"), Some(&Value::Number(3.0)));
//! assert_eq!(h.composites().fallback(xc), Some(xb));
//! assert_eq!(h.composites().fallback(xb), Some(xa));
//! ```
//!
//! ## Sharing
//!
//! Linking rewrites fallbacks in place. Values reached through plain ancestry
//! are linked as they are; values reached through a mixin are copied first,
//! so unrelated hosts of one mixin never observe each other's links. A copy
//! already linked behind the same host value is reused on later runs. Copies
//! keep the [`CompositeKind`] and reference their members rather than
//! duplicating them, so function-kind members stay shared and callable.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod build;
mod chainer;
mod collect;
mod composite;
mod error;
mod hierarchy;
mod id;
mod link;
mod mode;
mod options;
mod provider;
mod trace;
mod value;

pub use build::{ChainEntry, PropertyChain, PropertyChains, build_chains};
pub use chainer::{init_property_chain, init_property_chains};
pub use collect::collect_declarations;
pub use composite::{Composite, CompositeArena, LayeredView, Layers};
pub use error::{ChainError, LinkRejection};
pub use hierarchy::{Hierarchy, TypeRef};
pub use id::{CompositeId, ProviderId};
pub use link::link_chain;
pub use mode::{MixinAccess, ResolutionMode};
pub use options::{ChainOptions, ChainOptionsBuilder, DEFAULT_PROPERTY_CHAINS_NAME};
pub use provider::{Ancestors, Provider, ProviderGraph, ProviderTable};
pub use trace::{ChainRecorder, ChainTrace, DuplicateDeclaration, LogTrace};
pub use value::{CompositeKind, Value};
