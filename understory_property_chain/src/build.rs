// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chain building.
//!
//! One depth-first walk visits every ancestor of the starting provider and,
//! when mixins are included, every ancestor of every mixin reachable from
//! them. Each visit records, per chainable name, the composite the visited
//! provider owns under that name.
//!
//! # Ordering
//!
//! A provider appears at most once per chain. Visiting a provider again moves
//! its entry to the end, carrying the newly visited value, so the final
//! order is last-visit order. An ancestor's mixins are walked right after the
//! ancestor itself, last-declared mixin first.
//!
//! # Copy-on-compose
//!
//! Values reached through a mixin are recorded as shallow copies, so two
//! hosts composing the same mixin never share (and relink) one composite.
//! Values reached through plain ancestry are recorded as-is.
//!
//! Copies are made once the walk is over, so a mixin entry later replaced by
//! a direct revisit never allocates. If the preceding value already falls
//! back to a copy of the same mixin value, from an earlier initialization,
//! that copy is recorded again instead of a fresh one. Initializing many
//! instances of one type therefore allocates each copy once and keeps the
//! links (and any writes made through them) the first instance set up.

use alloc::boxed::Box;
use alloc::vec::Vec;
use smallvec::SmallVec;

use crate::composite::CompositeArena;
use crate::id::{CompositeId, ProviderId};
use crate::mode::ResolutionMode;
use crate::provider::{Ancestors, ProviderGraph};
use crate::value::Value;

/// One provider's contribution to a property chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChainEntry {
    /// The provider that owns the value.
    pub provider: ProviderId,
    /// The recorded value; a copy when reached through a mixin.
    pub value: CompositeId,
}

/// The ordered chain for one chainable name, most-derived first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyChain {
    name: Box<str>,
    entries: SmallVec<[ChainEntry; 4]>,
}

impl PropertyChain {
    fn new(name: Box<str>) -> Self {
        Self {
            name,
            entries: SmallVec::new(),
        }
    }

    /// Returns the chainable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the entries, most-derived first.
    #[must_use]
    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    /// Returns the providers in chain order.
    pub fn providers(&self) -> impl Iterator<Item = ProviderId> + '_ {
        self.entries.iter().map(|entry| entry.provider)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no provider contributed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

}

/// The chains built for one initialization run, in collection order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyChains {
    chains: Vec<PropertyChain>,
}

impl PropertyChains {
    /// Returns the chain for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyChain> {
        self.chains.iter().find(|chain| chain.name() == name)
    }

    /// Iterates the chains in collection order.
    pub fn iter(&self) -> core::slice::Iter<'_, PropertyChain> {
        self.chains.iter()
    }

    /// Returns the number of chains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Returns `true` if there are no chains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl<'a> IntoIterator for &'a PropertyChains {
    type Item = &'a PropertyChain;
    type IntoIter = core::slice::Iter<'a, PropertyChain>;

    fn into_iter(self) -> Self::IntoIter {
        self.chains.iter()
    }
}

/// Builds the chain for every name in `names`, starting at `start`.
///
/// Primitive and absent properties are skipped without a trace. Mixin-sourced
/// values are copied into `composites`.
pub fn build_chains<G>(
    graph: &G,
    composites: &mut CompositeArena,
    start: ProviderId,
    names: &[Box<str>],
    mode: &ResolutionMode,
    include_mixins: bool,
) -> PropertyChains
where
    G: ProviderGraph + ?Sized,
{
    let mut builder = ChainBuilder {
        graph,
        mode,
        include_mixins,
        chains: names.iter().cloned().map(PendingChain::new).collect(),
        expanding: SmallVec::new(),
    };
    builder.visit(start, false);
    PropertyChains {
        chains: builder
            .chains
            .into_iter()
            .map(|chain| chain.materialize(composites))
            .collect(),
    }
}

/// A recorded contribution whose mixin copy has not been made yet.
#[derive(Copy, Clone, Debug)]
struct Pending {
    provider: ProviderId,
    source: CompositeId,
    via_mixin: bool,
}

#[derive(Debug)]
struct PendingChain {
    name: Box<str>,
    entries: SmallVec<[Pending; 4]>,
}

impl PendingChain {
    fn new(name: Box<str>) -> Self {
        Self {
            name,
            entries: SmallVec::new(),
        }
    }

    fn record(&mut self, pending: Pending) {
        if let Some(pos) = self.entries.iter().position(|e| e.provider == pending.provider) {
            self.entries.remove(pos);
        }
        self.entries.push(pending);
    }

    fn materialize(self, composites: &mut CompositeArena) -> PropertyChain {
        let mut chain = PropertyChain::new(self.name);
        let mut previous = None;
        for pending in self.entries {
            let value = if pending.via_mixin {
                let reused = reusable_copy(composites, previous, pending.source);
                match reused.or_else(|| composites.shallow_copy(pending.source)) {
                    Some(copy) => copy,
                    None => continue,
                }
            } else {
                pending.source
            };
            chain.entries.push(ChainEntry {
                provider: pending.provider,
                value,
            });
            previous = Some(value);
        }
        chain
    }
}

/// Returns `previous`'s current fallback if it is a copy of `source`.
fn reusable_copy(
    composites: &CompositeArena,
    previous: Option<CompositeId>,
    source: CompositeId,
) -> Option<CompositeId> {
    let copy = composites.fallback(previous?)?;
    (composites.copied_from(copy) == Some(source)).then_some(copy)
}

struct ChainBuilder<'a, G: ?Sized> {
    graph: &'a G,
    mode: &'a ResolutionMode,
    include_mixins: bool,
    chains: Vec<PendingChain>,
    /// Mixin roots currently being expanded.
    expanding: SmallVec<[ProviderId; 8]>,
}

impl<G: ProviderGraph + ?Sized> ChainBuilder<'_, G> {
    fn visit(&mut self, root: ProviderId, via_mixin: bool) {
        let graph = self.graph;
        for ancestor in Ancestors::new(graph, root) {
            if self.mode.is_sentinel(ancestor) {
                break;
            }
            self.record_own(ancestor, via_mixin);

            if !self.include_mixins {
                continue;
            }
            let mixins = self.mode.mixins_of(graph, ancestor);
            for &mixin in mixins.iter().rev() {
                if self.expanding.contains(&mixin) {
                    log::debug!("mixin {mixin} is already being expanded; skipping");
                    continue;
                }
                self.expanding.push(mixin);
                self.visit(mixin, true);
                self.expanding.pop();
            }
        }
    }

    fn record_own(&mut self, provider: ProviderId, via_mixin: bool) {
        for chain in &mut self.chains {
            let Some(&Value::Composite(source)) = self.graph.own_property(provider, &chain.name)
            else {
                continue;
            };
            chain.record(Pending {
                provider,
                source,
                via_mixin,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Hierarchy;
    use alloc::vec;

    fn names(list: &[&str]) -> Vec<Box<str>> {
        list.iter().map(|&name| name.into()).collect()
    }

    #[test]
    fn records_own_composites_most_derived_first() {
        let mut h = Hierarchy::new();
        let a = h.define_type(None);
        let b = h.define_type(Some(a));
        let c = h.define_type(Some(b));
        let va = h.composite([("a", 1.0)]);
        let vc = h.composite([("c", 3.0)]);
        h.set_property(a.prototype, "x", va);
        h.set_property(b.prototype, "x", 2.0);
        h.set_property(c.prototype, "x", vc);
        let instance = h.instantiate(c);

        let mode = ResolutionMode::instance(h.object_root());
        let (providers, composites) = h.split_mut();
        let chains = build_chains(providers, composites, instance, &names(&["x"]), &mode, true);

        let chain = chains.get("x").unwrap();
        assert_eq!(
            chain.entries(),
            &[
                ChainEntry {
                    provider: c.prototype,
                    value: vc
                },
                ChainEntry {
                    provider: a.prototype,
                    value: va
                },
            ]
        );
    }

    #[test]
    fn names_without_contributions_yield_empty_chains() {
        let mut h = Hierarchy::new();
        let a = h.define_type(None);
        let mode = ResolutionMode::instance(h.object_root());
        let (providers, composites) = h.split_mut();
        let chains = build_chains(providers, composites, a.prototype, &names(&["x", "y"]), &mode, true);

        assert_eq!(chains.len(), 2);
        assert!(chains.iter().all(PropertyChain::is_empty));
    }

    #[test]
    fn mixin_values_are_copied_and_ordered_after_host() {
        let mut h = Hierarchy::new();
        let m1 = h.define_type(None);
        let m2 = h.define_type(None);
        let host = h.define_type(None);
        h.add_mixin(host.type_provider, m1.type_provider);
        h.add_mixin(host.type_provider, m2.type_provider);

        let v1 = h.composite([("m1", true)]);
        let v2 = h.composite([("m2", true)]);
        let vh = h.composite([("host", true)]);
        h.set_property(m1.prototype, "x", v1);
        h.set_property(m2.prototype, "x", v2);
        h.set_property(host.prototype, "x", vh);

        let mode = ResolutionMode::instance(h.object_root());
        let (providers, composites) = h.split_mut();
        let chains = build_chains(providers, composites, host.prototype, &names(&["x"]), &mode, true);
        let chain = chains.get("x").unwrap();

        assert_eq!(
            chain.providers().collect::<Vec<_>>(),
            vec![host.prototype, m2.prototype, m1.prototype]
        );
        assert_eq!(chain.entries()[0].value, vh);
        assert_ne!(chain.entries()[1].value, v2);
        assert_ne!(chain.entries()[2].value, v1);
        assert_eq!(
            h.composites().get_own(chain.entries()[1].value, "m2"),
            Some(&Value::Bool(true))
        );
    }

    #[test]
    fn revisits_move_to_the_end() {
        // host -> base, and host mixes in `mixin`, which also derives from base.
        let mut h = Hierarchy::new();
        let base = h.define_type(None);
        let mixin = h.define_type(Some(base));
        let host = h.define_type(Some(base));
        h.add_mixin(host.type_provider, mixin.type_provider);

        let vb = h.composite([("base", true)]);
        let vm = h.composite([("mixin", true)]);
        let vh = h.composite([("host", true)]);
        h.set_property(base.prototype, "x", vb);
        h.set_property(mixin.prototype, "x", vm);
        h.set_property(host.prototype, "x", vh);

        let before = h.composites().len();
        let mode = ResolutionMode::instance(h.object_root());
        let (providers, composites) = h.split_mut();
        let chains = build_chains(providers, composites, host.prototype, &names(&["x"]), &mode, true);
        let chain = chains.get("x").unwrap();

        // base is first visited through the mixin, then again directly.
        assert_eq!(
            chain.providers().collect::<Vec<_>>(),
            vec![host.prototype, mixin.prototype, base.prototype]
        );
        assert_eq!(chain.entries()[2].value, vb);
        // Only the mixin's own value was copied.
        assert_eq!(h.composites().len(), before + 1);
        assert_eq!(h.composites().copied_from(chain.entries()[1].value), Some(vm));
    }

    #[test]
    fn existing_mixin_copy_is_reused() {
        let mut h = Hierarchy::new();
        let mixin = h.define_type(None);
        let host = h.define_type(None);
        h.add_mixin(host.type_provider, mixin.type_provider);
        let vm = h.composite([("mixin", true)]);
        let vh = h.composite([("host", true)]);
        h.set_property(mixin.prototype, "x", vm);
        h.set_property(host.prototype, "x", vh);
        let mode = ResolutionMode::instance(h.object_root());

        let (providers, composites) = h.split_mut();
        let first = build_chains(providers, composites, host.prototype, &names(&["x"]), &mode, true);
        let copy = first.get("x").unwrap().entries()[1].value;
        // Not linked yet, so nothing to reuse.
        let unlinked = build_chains(providers, composites, host.prototype, &names(&["x"]), &mode, true);
        assert_ne!(unlinked.get("x").unwrap().entries()[1].value, copy);

        composites.set_fallback(vh, copy).unwrap();
        let before = composites.len();
        let again = build_chains(providers, composites, host.prototype, &names(&["x"]), &mode, true);
        assert_eq!(again.get("x").unwrap().entries()[1].value, copy);
        assert_eq!(composites.len(), before);
    }

    #[test]
    fn mixins_can_be_excluded() {
        let mut h = Hierarchy::new();
        let mixin = h.define_type(None);
        let host = h.define_type(None);
        h.add_mixin(host.type_provider, mixin.type_provider);
        let vm = h.composite([("mixin", true)]);
        h.set_property(mixin.prototype, "x", vm);

        let before = h.composites().len();
        let mode = ResolutionMode::instance(h.object_root());
        let (providers, composites) = h.split_mut();
        let chains = build_chains(providers, composites, host.prototype, &names(&["x"]), &mode, false);

        assert!(chains.get("x").unwrap().is_empty());
        assert_eq!(h.composites().len(), before);
    }

    #[test]
    fn cyclic_mixins_terminate() {
        let mut h = Hierarchy::new();
        let a = h.define_type(None);
        let b = h.define_type(None);
        h.add_mixin(a.type_provider, b.type_provider);
        h.add_mixin(b.type_provider, a.type_provider);
        let va = h.composite([("a", true)]);
        h.set_property(a.prototype, "x", va);

        let mode = ResolutionMode::instance(h.object_root());
        let (providers, composites) = h.split_mut();
        let chains = build_chains(providers, composites, a.prototype, &names(&["x"]), &mode, true);

        // a's own value was revisited through b's mixin of a, so the copy won.
        let chain = chains.get("x").unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.entries()[0].provider, a.prototype);
    }
}
