//! Placement feasibility predicates: containment, non-overlap, support, and
//! same-family stacking limits.
//!
//! Each check mirrors one function from the reference packer (`can_place`,
//! `check_support`, `_below_same`, `check_stack`, `stack_layer`), kept as
//! small free functions rather than methods on a god object.

use crate::consts::{FACE, FOOTPRINT_STACK, GEOM, STACK_GAP, SUPPORT_Y_FLOOR};
use crate::model::{Container, ExtremePoint, Item, Placement};

#[inline]
fn overlap_1d(a1: f64, a2: f64, b1: f64, b2: f64) -> f64 {
    (a2.min(b2) - a1.max(b1)).max(0.0)
}

/// True if an `l x h x w` box anchored at `ep` fits entirely within the
/// container's bounds (with geometric tolerance).
pub fn fits_container(ep: ExtremePoint, l: f64, h: f64, w: f64, container: &Container) -> bool {
    ep.x + l <= container.length + GEOM
        && ep.y + h <= container.height + GEOM
        && ep.z + w <= container.width + GEOM
}

/// True if an `l x h x w` box anchored at `ep` does not overlap any already
/// placed box. Two boxes are non-overlapping if they are separated along at
/// least one of the three axes.
pub fn no_overlap(ep: ExtremePoint, l: f64, h: f64, w: f64, placed: &[Placement]) -> bool {
    placed.iter().all(|p| {
        ep.x + l <= p.x + GEOM
            || ep.x >= p.x + p.length - GEOM
            || ep.y + h <= p.y + GEOM
            || ep.y >= p.y + p.height - GEOM
            || ep.z + w <= p.z + GEOM
            || ep.z >= p.z + p.width - GEOM
    })
}

/// Combines containment and non-overlap into the one gate a candidate corner
/// must pass before support and stacking are even considered.
pub fn can_place(ep: ExtremePoint, l: f64, h: f64, w: f64, container: &Container, placed: &[Placement]) -> bool {
    fits_container(ep, l, h, w, container) && no_overlap(ep, l, h, w, placed)
}

/// True if the footprint at `(x, z)` of size `l x w` resting at height `y`
/// has at least `min_support` (a 0.0-1.0 fraction) of its area coplanar with
/// the top face of already placed boxes. Floor-level placements are always
/// supported.
pub fn support_ok(x: f64, y: f64, z: f64, l: f64, w: f64, placed: &[Placement], min_support: f64) -> bool {
    if y < SUPPORT_Y_FLOOR {
        return true;
    }
    let base_area = l * w;
    let mut supported_area = 0.0;
    for p in placed {
        if (p.y + p.height - y).abs() < FACE {
            let ox = overlap_1d(x, x + l, p.x, p.x + p.length);
            let oz = overlap_1d(z, z + w, p.z, p.z + p.width);
            supported_area += ox * oz;
        }
    }
    supported_area / base_area >= min_support
}

/// Placements of the same family whose footprint overlaps this candidate's
/// enough (>30% of the smaller footprint) to count as "directly below",
/// ordered from topmost to lowest.
fn below_same_family(ep: ExtremePoint, item: &Item, placed: &[Placement]) -> Vec<&Placement> {
    let footprint = item.length * item.width;
    let mut below: Vec<&Placement> = placed
        .iter()
        .filter(|p| {
            if p.family != item.family || p.y + p.height > ep.y + FACE {
                return false;
            }
            let ox = overlap_1d(ep.x, ep.x + item.length, p.x, p.x + p.length);
            let oz = overlap_1d(ep.z, ep.z + item.width, p.z, p.z + p.width);
            ox * oz > (footprint.min(p.length * p.width)) * FOOTPRINT_STACK
        })
        .collect();
    below.sort_by(|a, b| (b.y + b.height).partial_cmp(&(a.y + a.height)).unwrap());
    below
}

/// The 1-based stack layer this item would occupy if placed at `ep`: one
/// more than the count of contiguous same-family layers directly beneath it.
pub fn stack_layer(ep: ExtremePoint, item: &Item, placed: &[Placement]) -> u32 {
    let mut count = 0u32;
    let mut current_bottom = ep.y;
    for below in below_same_family(ep, item, placed) {
        if (below.y + below.height - current_bottom).abs() < STACK_GAP {
            count += 1;
            current_bottom = below.y;
        }
    }
    count + 1
}

/// True if placing `item` at `ep` would not exceed its own stack limit.
/// A limit of zero or less means unlimited stacking.
pub fn stack_limit_ok(ep: ExtremePoint, item: &Item, placed: &[Placement]) -> bool {
    if item.stack_limit == 0 {
        return true;
    }
    stack_layer(ep, item, placed) <= item.stack_limit
}

/// Runs every feasibility gate for `item` at `ep` and, if all pass, returns
/// the stack layer it would occupy.
pub fn evaluate(
    ep: ExtremePoint,
    item: &Item,
    container: &Container,
    placed: &[Placement],
    min_support: f64,
) -> Option<u32> {
    if !can_place(ep, item.length, item.height, item.width, container, placed) {
        return None;
    }
    if !support_ok(ep.x, ep.y, ep.z, item.length, item.width, placed, min_support) {
        return None;
    }
    if !stack_limit_ok(ep, item, placed) {
        return None;
    }
    Some(stack_layer(ep, item, placed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FamilyKey;

    fn container() -> Container {
        Container {
            length: 1000.0,
            height: 1000.0,
            width: 1000.0,
            max_weight: 1_000_000.0,
        }
    }

    fn placement(x: f64, y: f64, z: f64, l: f64, h: f64, w: f64, family: &str) -> Placement {
        Placement {
            name: family.into(),
            length: l,
            height: h,
            width: w,
            weight: 1.0,
            x,
            y,
            z,
            is_agg: false,
            agg_count: 1,
            stack_layer: 1,
            stack_limit: 10,
            orig_length: l,
            orig_height: h,
            orig_width: w,
            family: FamilyKey::new(family, l, h, w),
        }
    }

    fn item(family: &str, l: f64, h: f64, w: f64, stack_limit: u32) -> Item {
        Item {
            name: family.into(),
            length: l,
            height: h,
            width: w,
            weight: 1.0,
            stack_limit,
            allow_rotate: false,
            is_agg: false,
            agg_count: 1,
            family: FamilyKey::new(family, l, h, w),
            orig_length: l,
            orig_height: h,
            orig_width: w,
        }
    }

    #[test]
    fn fits_container_respects_bounds() {
        let c = container();
        assert!(fits_container(ExtremePoint::ORIGIN, 100.0, 100.0, 100.0, &c));
        assert!(!fits_container(
            ExtremePoint {
                x: 950.0,
                y: 0.0,
                z: 0.0
            },
            100.0,
            100.0,
            100.0,
            &c
        ));
    }

    #[test]
    fn no_overlap_detects_collision() {
        let placed = vec![placement(0.0, 0.0, 0.0, 100.0, 100.0, 100.0, "A")];
        assert!(!no_overlap(
            ExtremePoint {
                x: 50.0,
                y: 0.0,
                z: 0.0
            },
            100.0,
            100.0,
            100.0,
            &placed
        ));
        assert!(no_overlap(
            ExtremePoint {
                x: 100.0,
                y: 0.0,
                z: 0.0
            },
            100.0,
            100.0,
            100.0,
            &placed
        ));
    }

    #[test]
    fn floor_placement_is_always_supported() {
        assert!(support_ok(0.0, 0.0, 0.0, 100.0, 100.0, &[], 0.75));
    }

    #[test]
    fn elevated_placement_needs_coplanar_support() {
        let placed = vec![placement(0.0, 0.0, 0.0, 100.0, 50.0, 100.0, "base")];
        assert!(support_ok(0.0, 50.0, 0.0, 100.0, 100.0, &placed, 0.75));
        assert!(!support_ok(0.0, 50.0, 0.0, 100.0, 100.0, &[], 0.75));
    }

    #[test]
    fn stack_layer_counts_contiguous_same_family_below() {
        let placed = vec![
            placement(0.0, 0.0, 0.0, 100.0, 50.0, 100.0, "box"),
            placement(0.0, 50.0, 0.0, 100.0, 50.0, 100.0, "box"),
        ];
        let it = item("box", 100.0, 50.0, 100.0, 10);
        let ep = ExtremePoint {
            x: 0.0,
            y: 100.0,
            z: 0.0,
        };
        assert_eq!(stack_layer(ep, &it, &placed), 3);
    }

    #[test]
    fn stack_limit_blocks_beyond_cap() {
        let placed = vec![
            placement(0.0, 0.0, 0.0, 100.0, 50.0, 100.0, "box"),
            placement(0.0, 50.0, 0.0, 100.0, 50.0, 100.0, "box"),
        ];
        let it = item("box", 100.0, 50.0, 100.0, 2);
        let ep = ExtremePoint {
            x: 0.0,
            y: 100.0,
            z: 0.0,
        };
        assert!(!stack_limit_ok(ep, &it, &placed));
    }

    #[test]
    fn zero_stack_limit_means_unlimited() {
        let placed = vec![placement(0.0, 0.0, 0.0, 100.0, 50.0, 100.0, "box")];
        let it = item("box", 100.0, 50.0, 100.0, 0);
        let ep = ExtremePoint {
            x: 0.0,
            y: 50.0,
            z: 0.0,
        };
        assert!(stack_limit_ok(ep, &it, &placed));
    }
}
