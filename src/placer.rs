//! The extreme-point placer: the core of the packing engine.
//!
//! Maintains a frontier of candidate corners and, for each item in turn,
//! scans the frontier in a fixed sweep order for the first corner that
//! passes every feasibility gate. Mirrors the reference `Packer` class
//! method-for-method; the frontier itself is a flat `Vec`, since real
//! frontiers stay small enough that a linear scan beats the bookkeeping of a
//! tree.

use crate::consts::GEOM;
use crate::feasibility;
use crate::model::{Container, ExtremePoint, Item, Placement, UnplacedReason};

/// Owns the in-progress pack: the container being filled, the committed
/// placements, the current extreme-point frontier, and the running weight.
pub struct Placer<'a> {
    container: &'a Container,
    min_support: f64,
    frontier: Vec<ExtremePoint>,
    placements: Vec<Placement>,
    total_weight: f64,
}

impl<'a> Placer<'a> {
    /// `min_support` is a 0.0-1.0 fraction (the caller-facing `support_ratio`
    /// percentage, already divided by 100).
    pub fn new(container: &'a Container, min_support: f64) -> Self {
        Placer {
            container,
            min_support,
            frontier: vec![ExtremePoint::ORIGIN],
            placements: Vec::new(),
            total_weight: 0.0,
        }
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Attempts to place `item`, trying its given orientation first and,
    /// if it does not fit anywhere and rotation is allowed, a single
    /// length/width swap. On failure, classifies why.
    pub fn try_place(&mut self, item: &Item) -> Result<(), UnplacedReason> {
        if item.weight > self.container.max_weight
            || self.total_weight + item.weight > self.container.max_weight
        {
            return Err(UnplacedReason::TooHeavyForContainer);
        }

        if let Some((ep, layer)) = self.find_slot(item) {
            self.commit(item, ep, layer);
            return Ok(());
        }

        if item.allow_rotate {
            let rotated = item.rotated();
            if let Some((ep, layer)) = self.find_slot(&rotated) {
                self.commit(&rotated, ep, layer);
                return Ok(());
            }
        }

        if !fits_container_in_any_orientation(item, self.container) {
            return Err(UnplacedReason::DimensionsExceedContainer);
        }

        Err(UnplacedReason::NoStablePosition)
    }

    fn find_slot(&self, item: &Item) -> Option<(ExtremePoint, u32)> {
        for &ep in &self.frontier {
            if let Some(layer) =
                feasibility::evaluate(ep, item, self.container, &self.placements, self.min_support)
            {
                return Some((ep, layer));
            }
        }
        None
    }

    fn commit(&mut self, item: &Item, ep: ExtremePoint, stack_layer: u32) {
        debug_assert!(
            feasibility::evaluate(ep, item, self.container, &self.placements, self.min_support)
                == Some(stack_layer),
            "committed placement failed its own feasibility check"
        );

        let placement = Placement {
            name: item.name.clone(),
            length: item.length,
            height: item.height,
            width: item.width,
            weight: item.weight,
            x: round1(ep.x),
            y: round1(ep.y),
            z: round1(ep.z),
            is_agg: item.is_agg,
            agg_count: item.agg_count,
            stack_layer,
            stack_limit: item.stack_limit,
            orig_length: item.orig_length,
            orig_height: item.orig_height,
            orig_width: item.orig_width,
            family: item.family.clone(),
        };
        self.total_weight += item.weight;
        self.placements.push(placement);

        self.frontier.retain(|&e| e != ep);

        let successors = [
            ExtremePoint {
                x: ep.x + item.length,
                y: ep.y,
                z: ep.z,
            },
            ExtremePoint {
                x: ep.x,
                y: ep.y + item.height,
                z: ep.z,
            },
            ExtremePoint {
                x: ep.x,
                y: ep.y,
                z: ep.z + item.width,
            },
        ];

        for candidate in successors {
            if candidate.x > self.container.length + GEOM
                || candidate.y > self.container.height + GEOM
                || candidate.z > self.container.width + GEOM
            {
                continue;
            }
            if self.frontier.iter().any(|&e| dominates(e, candidate)) {
                continue;
            }
            self.frontier.retain(|&e| !dominates(candidate, e));
            self.frontier.push(candidate);
        }

        self.frontier
            .sort_by(|a, b| (a.y, a.x, a.z).partial_cmp(&(b.y, b.x, b.z)).unwrap());

        debug_assert!(
            !self
                .frontier
                .iter()
                .enumerate()
                .any(|(i, &a)| self
                    .frontier
                    .iter()
                    .enumerate()
                    .any(|(j, &b)| i != j && dominates(a, b))),
            "dominated extreme point survived frontier pruning"
        );
    }
}

/// True if `item` could fit inside an otherwise-empty `container` in its
/// given orientation or, if rotation is allowed, the length/width swap.
fn fits_container_in_any_orientation(item: &Item, container: &Container) -> bool {
    let fits = |l: f64, h: f64, w: f64| {
        l <= container.length + GEOM && h <= container.height + GEOM && w <= container.width + GEOM
    };
    fits(item.length, item.height, item.width)
        || (item.allow_rotate && fits(item.width, item.height, item.length))
}

/// `a` dominates `b` when it is at least as far out on every axis and
/// strictly further on at least one — a dominated point can never reach a
/// feasible slot its dominator couldn't also reach.
fn dominates(a: ExtremePoint, b: ExtremePoint) -> bool {
    a.x >= b.x
        && a.y >= b.y
        && a.z >= b.z
        && (a.x > b.x || a.y > b.y || a.z > b.z)
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
