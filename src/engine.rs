//! Top-level orchestration: wires normalizer, aggregator, orderer, placer,
//! and statistician into the single `pack()` entry point.

use std::collections::HashMap;
use std::time::Instant;

use crate::aggregator;
use crate::model::{CargoSpec, Container, Placement, Unplaced, ValidationError};
use crate::normalizer;
use crate::orderer;
use crate::placer::Placer;
use crate::statistics::{self, PackStats};

/// The full result of one pack run: what landed where, what didn't fit (and
/// why), and the derived statistics.
#[derive(Debug)]
pub struct PackResult {
    pub container: Container,
    pub placements: Vec<Placement>,
    pub unplaced: Vec<Unplaced>,
    pub packed_summary: HashMap<String, u32>,
    pub unpacked_summary: HashMap<String, u32>,
    pub stats: PackStats,
}

/// Runs the full pipeline: expand cargo into items, optionally aggregate
/// small numerous families into super-blocks, sort twice, then place
/// greedily onto the extreme-point frontier.
///
/// `support_ratio` is a percentage in `[0, 100]`; `enable_aggregation`
/// toggles the super-block folding stage.
pub fn pack(
    cargo: &[CargoSpec],
    container: Container,
    support_ratio: f64,
    enable_aggregation: bool,
) -> Result<PackResult, ValidationError> {
    if cargo.is_empty() {
        return Err(ValidationError::EmptyCargo);
    }
    for spec in cargo {
        spec.validate()?;
    }

    let start = Instant::now();

    let mut items = normalizer::expand(cargo);
    orderer::sort_initial(&mut items);

    if enable_aggregation {
        items = aggregator::aggregate(items, &container);
        orderer::sort_post_aggregation(&mut items);
    }

    let mut placer = Placer::new(&container, support_ratio / 100.0);
    let mut unplaced: Vec<Unplaced> = Vec::new();
    for item in &items {
        if let Err(reason) = placer.try_place(item) {
            unplaced.push(Unplaced {
                item: item.clone(),
                reason,
            });
        }
    }

    let elapsed = start.elapsed().as_secs_f64();
    let placements = placer.placements().to_vec();
    let total_weight = placer.total_weight();

    let stats = statistics::summarize(&placements, &unplaced, total_weight, &container, elapsed);

    let packed_summary = statistics::summarize_by_name(
        placements.iter().map(|p| (p.name.as_str(), p.agg_count)),
    );
    let unpacked_summary = statistics::summarize_by_name(
        unplaced.iter().map(|u| (u.item.name.as_str(), u.item.agg_count)),
    );

    Ok(PackResult {
        container,
        placements,
        unplaced,
        packed_summary,
        unpacked_summary,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cargo_spec(name: &str, l: f64, h: f64, w: f64, qty: u32) -> CargoSpec {
        CargoSpec {
            name: name.into(),
            length: l,
            height: h,
            width: w,
            weight: 10.0,
            quantity: qty,
            stack_limit: 10,
            allow_rotate: false,
        }
    }

    #[test]
    fn empty_cargo_is_rejected() {
        let container = Container::preset("40HC").unwrap();
        let result = pack(&[], container, 75.0, true);
        assert!(result.is_err());
    }

    #[test]
    fn all_items_pack_when_they_clearly_fit() {
        let container = Container::preset("40HC").unwrap();
        let cargo = vec![cargo_spec("pallet", 100.0, 100.0, 100.0, 4)];
        let result = pack(&cargo, container, 75.0, true).unwrap();
        assert_eq!(result.stats.packed_count, 4);
        assert_eq!(result.stats.unpacked_count, 0);
    }

    #[test]
    fn repeat_runs_are_deterministic() {
        let container = Container::preset("40HC").unwrap();
        let cargo = vec![
            cargo_spec("pallet", 100.0, 100.0, 100.0, 30),
            cargo_spec("crate", 50.0, 50.0, 50.0, 50),
        ];
        let a = pack(&cargo, container, 75.0, true).unwrap();
        let b = pack(&cargo, container, 75.0, true).unwrap();
        assert_eq!(a.placements.len(), b.placements.len());
        for (pa, pb) in a.placements.iter().zip(b.placements.iter()) {
            assert_eq!(pa.x, pb.x);
            assert_eq!(pa.y, pb.y);
            assert_eq!(pa.z, pb.z);
            assert_eq!(pa.name, pb.name);
        }
    }

    #[test]
    fn weight_over_capacity_leaves_items_unpacked() {
        let container = Container {
            length: 1000.0,
            height: 1000.0,
            width: 1000.0,
            max_weight: 15.0,
        };
        let cargo = vec![cargo_spec("heavy", 100.0, 100.0, 100.0, 3)];
        let result = pack(&cargo, container, 75.0, false).unwrap();
        assert!(result.stats.unpacked_count > 0);
        assert!(result
            .unplaced
            .iter()
            .all(|u| u.reason == crate::model::UnplacedReason::TooHeavyForContainer));
    }

    #[test]
    fn oversized_item_is_unplaced_with_dimension_reason() {
        let container = Container::preset("40HC").unwrap();
        let cargo = vec![cargo_spec("giant", 10_000.0, 10.0, 10.0, 1)];
        let result = pack(&cargo, container, 75.0, false).unwrap();
        assert_eq!(result.unplaced.len(), 1);
        assert_eq!(
            result.unplaced[0].reason,
            crate::model::UnplacedReason::DimensionsExceedContainer
        );
    }
}
