// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Initialization entry points.
//!
//! [`init_property_chains`] runs the whole pipeline once: collect the
//! chainable names declared along the ancestor chain, build every chain in a
//! single walk, then link them in collection order. [`init_property_chain`]
//! does the same for one name without consulting declarations.

use alloc::boxed::Box;

use crate::build::build_chains;
use crate::collect::collect_declarations;
use crate::composite::CompositeArena;
use crate::error::ChainError;
use crate::id::ProviderId;
use crate::link::link_chain;
use crate::mode::ResolutionMode;
use crate::options::ChainOptions;
use crate::provider::ProviderGraph;
use crate::trace::ChainTrace;

/// Collects, builds, and links every chain declared along `start`'s ancestors.
///
/// Does nothing when no ancestor declares a chainable name.
///
/// # Errors
///
/// Returns the first [`ChainError`] raised while linking. Chains linked
/// before it stay linked.
///
/// # Example
///
/// ```rust
/// use understory_property_chain::{
///     ChainOptions, ChainRecorder, Hierarchy, ResolutionMode, Value, init_property_chains,
/// };
///
/// let mut h = Hierarchy::new();
/// let base = h.define_type(None);
/// let derived = h.define_type(Some(base));
/// h.declare_chains(base.prototype, "_propertyChains", ["theme"]);
///
/// let base_theme = h.composite([("color", "red")]);
/// let derived_theme = h.composite([("size", 2.0)]);
/// h.set_property(base.prototype, "theme", base_theme);
/// h.set_property(derived.prototype, "theme", derived_theme);
///
/// let instance = h.instantiate(derived);
/// let mode = ResolutionMode::instance(h.object_root());
/// let mut trace = ChainRecorder::new();
/// let (providers, composites) = h.split_mut();
/// init_property_chains(providers, composites, instance, &mode, &ChainOptions::default(), &mut trace)
///     .unwrap();
///
/// let theme = h.resolve(instance, "theme").unwrap();
/// assert_eq!(theme.get("color"), Some(&Value::from("red")));
/// assert_eq!(theme.get("size"), Some(&Value::Number(2.0)));
/// ```
pub fn init_property_chains<G, T>(
    graph: &G,
    composites: &mut CompositeArena,
    start: ProviderId,
    mode: &ResolutionMode,
    options: &ChainOptions,
    trace: &mut T,
) -> Result<(), ChainError>
where
    G: ProviderGraph + ?Sized,
    T: ChainTrace + ?Sized,
{
    let names = collect_declarations(graph, start, mode, options.property_chains_name(), trace);
    if names.is_empty() {
        return Ok(());
    }

    let chains = build_chains(graph, composites, start, &names, mode, options.include_mixins());
    for chain in &chains {
        link_chain(composites, chain)?;
        trace.chain_linked(chain.name(), chain.len());
    }
    Ok(())
}

/// Builds and links the chain for `name` alone.
///
/// # Errors
///
/// Returns [`ChainError::Link`] if a value in the chain rejects its fallback.
pub fn init_property_chain<G, T>(
    graph: &G,
    composites: &mut CompositeArena,
    start: ProviderId,
    mode: &ResolutionMode,
    name: &str,
    include_mixins: bool,
    trace: &mut T,
) -> Result<(), ChainError>
where
    G: ProviderGraph + ?Sized,
    T: ChainTrace + ?Sized,
{
    let names: [Box<str>; 1] = [name.into()];
    let chains = build_chains(graph, composites, start, &names, mode, include_mixins);
    for chain in &chains {
        link_chain(composites, chain)?;
        trace.chain_linked(chain.name(), chain.len());
    }
    Ok(())
}
