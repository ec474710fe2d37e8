//! Folds large runs of small, identical items into composite super-blocks.
//!
//! Mirrors the reference implementation's `aggregate()`: items are grouped by
//! family, and any family whose single-unit dimensions are each less than a
//! tenth of the container's corresponding dimension, and which has more than
//! 20 units, is tiled into `fx * fz` grid cells per super-block layer.
//!
//! Grouping must preserve the order families first appear in, not whatever
//! order a hashed key iterates in — otherwise two runs over the same input
//! could emit aggregated items in different relative order and invariant I7
//! (repeat runs are bit-identical) would break under a randomized `HashMap`.

use std::collections::HashMap;

use crate::model::{Container, FamilyKey, Item};

const SMALL_FRACTION: f64 = 10.0;
const SMALL_FAMILY_MIN_COUNT: usize = 20;

/// Aggregates eligible families into super-blocks, leaving others untouched.
/// Input order among distinct families is preserved in the output.
pub fn aggregate(items: Vec<Item>, container: &Container) -> Vec<Item> {
    let mut order: Vec<FamilyKey> = Vec::new();
    let mut groups: HashMap<FamilyKey, Vec<Item>> = HashMap::new();

    for item in items {
        if !groups.contains_key(&item.family) {
            order.push(item.family.clone());
        }
        groups.entry(item.family.clone()).or_default().push(item);
    }

    let mut result = Vec::new();
    for key in order {
        let group = groups.remove(&key).expect("key was just recorded");
        result.extend(aggregate_group(group, container));
    }
    result
}

fn aggregate_group(group: Vec<Item>, container: &Container) -> Vec<Item> {
    let sample = &group[0];
    let small = sample.length < container.length / SMALL_FRACTION
        && sample.height < container.height / SMALL_FRACTION
        && sample.width < container.width / SMALL_FRACTION
        && group.len() > SMALL_FAMILY_MIN_COUNT;

    if !small {
        return group;
    }

    let fx = (container.length / sample.length).floor() as u32;
    let fz = (container.width / sample.width).floor() as u32;
    let items_per_layer = fx * fz;

    if items_per_layer <= 1 {
        return group;
    }

    let n = group.len() as u32;
    let blocks = n / items_per_layer;
    let remainder = n % items_per_layer;

    let mut result = Vec::with_capacity((blocks + remainder) as usize);
    for _ in 0..blocks {
        result.push(Item {
            name: sample.name.clone(),
            length: sample.length * fx as f64,
            height: sample.height,
            width: sample.width * fz as f64,
            weight: sample.weight * items_per_layer as f64,
            stack_limit: sample.stack_limit,
            allow_rotate: false,
            is_agg: true,
            agg_count: items_per_layer,
            family: sample.family.clone(),
            orig_length: sample.orig_length,
            orig_height: sample.orig_height,
            orig_width: sample.orig_width,
        });
    }
    let consumed = (blocks * items_per_layer) as usize;
    for mut leftover in group.into_iter().skip(consumed) {
        leftover.is_agg = false;
        leftover.agg_count = 1;
        result.push(leftover);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container() -> Container {
        Container {
            length: 1000.0,
            height: 1000.0,
            width: 1000.0,
            max_weight: 1_000_000.0,
        }
    }

    fn small_item(n: u32) -> Item {
        Item {
            name: format!("peg-{n}"),
            length: 50.0,
            height: 50.0,
            width: 50.0,
            weight: 1.0,
            stack_limit: 10,
            allow_rotate: false,
            is_agg: false,
            agg_count: 1,
            family: FamilyKey::new("peg", 50.0, 50.0, 50.0),
            orig_length: 50.0,
            orig_height: 50.0,
            orig_width: 50.0,
        }
    }

    #[test]
    fn small_numerous_family_is_aggregated() {
        let group: Vec<Item> = (0..41).map(small_item).collect();
        let out = aggregate(group, &container());
        assert!(out.iter().any(|i| i.is_agg));
        let total: u32 = out.iter().map(|i| i.agg_count).sum();
        assert_eq!(total, 41);
    }

    #[test]
    fn large_family_is_not_aggregated() {
        let big_item = Item {
            length: 900.0,
            height: 900.0,
            width: 900.0,
            family: FamilyKey::new("crate", 900.0, 900.0, 900.0),
            name: "crate".into(),
            ..small_item(0)
        };
        let group: Vec<Item> = (0..25).map(|_| big_item.clone()).collect();
        let out = aggregate(group, &container());
        assert!(out.iter().all(|i| !i.is_agg));
    }

    #[test]
    fn preserves_first_seen_family_order() {
        let mut group = Vec::new();
        for n in 0..5 {
            group.push(Item {
                name: "b".into(),
                family: FamilyKey::new("b", 900.0, 900.0, 900.0),
                ..small_item(n)
            });
        }
        for n in 0..5 {
            group.push(Item {
                name: "a".into(),
                family: FamilyKey::new("a", 900.0, 900.0, 900.0),
                ..small_item(n)
            });
        }
        let out = aggregate(group, &container());
        assert_eq!(out[0].name, "b");
        assert_eq!(out[5].name, "a");
    }
}
