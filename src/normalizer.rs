//! Expands caller-supplied cargo specs into individual placeable items.
//!
//! One `CargoSpec` with `quantity: n` becomes `n` identical `Item`s, each tagged
//! with a `FamilyKey` computed once from the pre-rotation dimensions.

use crate::model::{CargoSpec, FamilyKey, Item};

/// Expands a cargo manifest into one `Item` per unit, preserving input order.
pub fn expand(cargo: &[CargoSpec]) -> Vec<Item> {
    let mut items = Vec::new();
    for spec in cargo {
        let family = FamilyKey::new(&spec.name, spec.length, spec.height, spec.width);
        for _ in 0..spec.quantity {
            items.push(Item {
                name: spec.name.clone(),
                length: spec.length,
                height: spec.height,
                width: spec.width,
                weight: spec.weight,
                stack_limit: spec.stack_limit,
                allow_rotate: spec.allow_rotate,
                is_agg: false,
                agg_count: 1,
                family: family.clone(),
                orig_length: spec.length,
                orig_height: spec.height,
                orig_width: spec.width,
            });
        }
    }
    items
}
