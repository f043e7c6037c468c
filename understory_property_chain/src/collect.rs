// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declaration collection.

use alloc::boxed::Box;
use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::id::ProviderId;
use crate::mode::ResolutionMode;
use crate::provider::{Ancestors, ProviderGraph};
use crate::trace::ChainTrace;

/// Gathers the chainable names declared along `start`'s ancestor chain.
///
/// Each ancestor's own declaration list named `list_name` is read in order,
/// most-derived ancestor first, stopping before the mode's sentinel. A name
/// that is already collected is reported to `trace` as a duplicate and
/// skipped. The result keeps first-seen order.
pub fn collect_declarations<G, T>(
    graph: &G,
    start: ProviderId,
    mode: &ResolutionMode,
    list_name: &str,
    trace: &mut T,
) -> Vec<Box<str>>
where
    G: ProviderGraph + ?Sized,
    T: ChainTrace + ?Sized,
{
    let mut names: Vec<Box<str>> = Vec::new();
    let mut declared_by: HashMap<&str, ProviderId> = HashMap::new();

    for ancestor in Ancestors::new(graph, start) {
        if mode.is_sentinel(ancestor) {
            break;
        }
        let Some(declared) = graph.own_chain_declarations(ancestor, list_name) else {
            continue;
        };
        for name in declared {
            if let Some(&first) = declared_by.get(&**name) {
                trace.duplicate_declaration(name, first, ancestor);
                continue;
            }
            declared_by.insert(&**name, ancestor);
            names.push(name.clone());
        }
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DEFAULT_PROPERTY_CHAINS_NAME;
    use crate::trace::ChainRecorder;
    use crate::Hierarchy;

    fn strs(names: &[Box<str>]) -> Vec<&str> {
        names.iter().map(|name| &**name).collect()
    }

    fn collect(h: &Hierarchy, start: ProviderId, recorder: &mut ChainRecorder) -> Vec<Box<str>> {
        collect_declarations(
            h.providers(),
            start,
            &ResolutionMode::instance(h.object_root()),
            DEFAULT_PROPERTY_CHAINS_NAME,
            recorder,
        )
    }

    #[test]
    fn unions_declarations_up_the_chain() {
        let mut h = Hierarchy::new();
        let a = h.define_type(None);
        let b = h.define_type(Some(a));
        let c = h.define_type(Some(b));
        h.declare_chains(a.prototype, DEFAULT_PROPERTY_CHAINS_NAME, ["x", "y"]);
        h.declare_chains(c.prototype, DEFAULT_PROPERTY_CHAINS_NAME, ["z"]);
        let instance = h.instantiate(c);

        let mut recorder = ChainRecorder::new();
        let names = collect(&h, instance, &mut recorder);
        assert_eq!(strs(&names), ["z", "x", "y"]);
        assert!(recorder.duplicates().is_empty());
    }

    #[test]
    fn duplicates_are_reported_once_and_skipped() {
        let mut h = Hierarchy::new();
        let a = h.define_type(None);
        let b = h.define_type(Some(a));
        h.declare_chains(a.prototype, DEFAULT_PROPERTY_CHAINS_NAME, ["x"]);
        h.declare_chains(b.prototype, DEFAULT_PROPERTY_CHAINS_NAME, ["x", "x"]);

        let mut recorder = ChainRecorder::new();
        let names = collect(&h, b.prototype, &mut recorder);
        assert_eq!(strs(&names), ["x"]);

        let dups = recorder.duplicates();
        assert_eq!(dups.len(), 2);
        assert!(dups.iter().all(|d| d.first == b.prototype));
        assert_eq!(dups[0].duplicate, b.prototype);
        assert_eq!(dups[1].duplicate, a.prototype);
    }

    #[test]
    fn declarations_on_the_sentinel_are_ignored() {
        let mut h = Hierarchy::new();
        let root = h.object_root();
        h.declare_chains(root, DEFAULT_PROPERTY_CHAINS_NAME, ["x"]);
        let a = h.define_type(None);

        let mut recorder = ChainRecorder::new();
        assert!(collect(&h, a.prototype, &mut recorder).is_empty());
    }

    #[test]
    fn custom_list_name() {
        let mut h = Hierarchy::new();
        let a = h.define_type(None);
        h.declare_chains(a.prototype, "somethingElse", ["x"]);

        let mut recorder = ChainRecorder::new();
        assert!(collect(&h, a.prototype, &mut recorder).is_empty());

        let names = collect_declarations(
            h.providers(),
            a.prototype,
            &ResolutionMode::instance(h.object_root()),
            "somethingElse",
            &mut recorder,
        );
        assert_eq!(strs(&names), ["x"]);
    }
}
