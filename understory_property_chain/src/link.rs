// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chain linking.

use crate::build::PropertyChain;
use crate::composite::CompositeArena;
use crate::error::ChainError;

/// Links each value in `chain` to the next, less-derived one.
///
/// The least-derived value keeps whatever fallback it had. Adjacent entries
/// holding the same composite are not linked to themselves.
///
/// # Errors
///
/// Returns [`ChainError::Link`] naming the chain if a value rejects its new
/// fallback. Links made before the failure are kept.
pub fn link_chain(composites: &mut CompositeArena, chain: &PropertyChain) -> Result<(), ChainError> {
    let mut previous = None;
    for entry in chain.entries() {
        if let Some(prev) = previous
            && prev != entry.value
        {
            composites
                .set_fallback(prev, entry.value)
                .map_err(|reason| ChainError::Link {
                    property: chain.name().into(),
                    reason,
                })?;
        }
        previous = Some(entry.value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_chains;
    use crate::error::LinkRejection;
    use crate::{Hierarchy, ResolutionMode, Value};
    use alloc::boxed::Box;
    use alloc::vec;
    use alloc::vec::Vec;

    fn three_levels() -> (Hierarchy, [crate::CompositeId; 3], crate::ProviderId) {
        let mut h = Hierarchy::new();
        let a = h.define_type(None);
        let b = h.define_type(Some(a));
        let c = h.define_type(Some(b));
        let va = h.composite([("a", 1.0)]);
        let vb = h.composite([("b", 2.0)]);
        let vc = h.composite([("c", 3.0)]);
        h.set_property(a.prototype, "x", va);
        h.set_property(b.prototype, "x", vb);
        h.set_property(c.prototype, "x", vc);
        (h, [va, vb, vc], c.prototype)
    }

    fn chain_for(h: &mut Hierarchy, start: crate::ProviderId) -> PropertyChain {
        let mode = ResolutionMode::instance(h.object_root());
        let names: Vec<Box<str>> = vec!["x".into()];
        let (providers, composites) = h.split_mut();
        build_chains(providers, composites, start, &names, &mode, true)
            .get("x")
            .cloned()
            .unwrap()
    }

    #[test]
    fn links_derived_to_base() {
        let (mut h, [va, vb, vc], start) = three_levels();
        let chain = chain_for(&mut h, start);
        link_chain(h.composites_mut(), &chain).unwrap();

        assert_eq!(h.composites().fallback(vc), Some(vb));
        assert_eq!(h.composites().fallback(vb), Some(va));
        assert_eq!(h.composites().fallback(va), None);

        let view = h.composites().layered(vc);
        assert_eq!(view.get("a"), Some(&Value::Number(1.0)));
        assert_eq!(view.get("b"), Some(&Value::Number(2.0)));
        assert_eq!(view.get("c"), Some(&Value::Number(3.0)));
    }

    #[test]
    fn frozen_value_fails_with_property_name() {
        let (mut h, [va, vb, vc], start) = three_levels();
        h.composites_mut().freeze(vb);
        let chain = chain_for(&mut h, start);

        let err = link_chain(h.composites_mut(), &chain).unwrap_err();
        assert_eq!(
            err,
            ChainError::Link {
                property: "x".into(),
                reason: LinkRejection::Frozen,
            }
        );
        // The link made before the failure stays.
        assert_eq!(h.composites().fallback(vc), Some(vb));
        assert_eq!(h.composites().fallback(vb), None);
        assert_eq!(h.composites().fallback(va), None);
    }

    #[test]
    fn relinking_frozen_chain_is_a_no_op() {
        let (mut h, [va, vb, vc], start) = three_levels();
        let chain = chain_for(&mut h, start);
        link_chain(h.composites_mut(), &chain).unwrap();
        for id in [va, vb, vc] {
            h.composites_mut().freeze(id);
        }
        assert_eq!(link_chain(h.composites_mut(), &chain), Ok(()));
    }

    #[test]
    fn shared_value_is_not_linked_to_itself() {
        let mut h = Hierarchy::new();
        let a = h.define_type(None);
        let b = h.define_type(Some(a));
        let shared = h.composite([("s", true)]);
        h.set_property(a.prototype, "x", shared);
        h.set_property(b.prototype, "x", shared);

        let chain = chain_for(&mut h, b.prototype);
        assert_eq!(chain.len(), 2);
        link_chain(h.composites_mut(), &chain).unwrap();
        assert_eq!(h.composites().fallback(shared), None);
    }
}
