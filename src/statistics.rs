//! Post-pack statistics: utilization, weight, center-of-gravity offset, and
//! per-name summaries of what packed and what didn't.
//!
//! All percentage figures round to one decimal place, matching the
//! reference's `round(x, 1)` everywhere except elapsed time, which the
//! reference rounds to three decimals — that distinction is preserved here
//! rather than folded into one shared rounding helper.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{Container, Placement, Unplaced};

/// Aggregate statistics for one completed pack.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct PackStats {
    pub packed_count: u32,
    pub unpacked_count: u32,
    pub pack_rate: f64,
    pub space_utilization: f64,
    pub actual_weight: f64,
    pub max_weight: f64,
    pub weight_utilization: f64,
    pub calc_time: f64,
    pub cog_offset: f64,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Per-axis count of units represented, keyed by item name (not family,
/// since two differently-dimensioned items may share a display name only
/// coincidentally — but the reference keys on name, so this does too).
pub fn summarize_by_name<'a, I>(entries: I) -> HashMap<String, u32>
where
    I: IntoIterator<Item = (&'a str, u32)>,
{
    let mut out = HashMap::new();
    for (name, count) in entries {
        *out.entry(name.to_string()).or_insert(0) += count;
    }
    out
}

/// The horizontal (x/z only — never vertical) offset of the weighted
/// centroid from the container's horizontal center, expressed as a percent
/// of the half-extent on each axis and combined as a Euclidean distance.
pub fn center_of_gravity_offset(placements: &[Placement], container: &Container) -> f64 {
    let mut total_weight = 0.0;
    let mut weighted_x = 0.0;
    let mut weighted_z = 0.0;
    for p in placements {
        weighted_x += (p.x + p.length / 2.0) * p.weight;
        weighted_z += (p.z + p.width / 2.0) * p.weight;
        total_weight += p.weight;
    }
    if total_weight <= 0.0 {
        return 0.0;
    }
    let cx = weighted_x / total_weight;
    let cz = weighted_z / total_weight;
    let ox = (cx - container.length / 2.0).abs() / (container.length / 2.0) * 100.0;
    let oz = (cz - container.width / 2.0).abs() / (container.width / 2.0) * 100.0;
    round1((ox * ox + oz * oz).sqrt())
}

/// Builds the full stats block from the placer's output and the unplaced
/// remainder. `elapsed_secs` is the wall-clock duration of the pack run.
pub fn summarize(
    placements: &[Placement],
    unplaced: &[Unplaced],
    total_weight: f64,
    container: &Container,
    elapsed_secs: f64,
) -> PackStats {
    let packed_count: u32 = placements.iter().map(|p| p.agg_count).sum();
    let unpacked_count: u32 = unplaced.iter().map(|u| u.item.agg_count).sum();
    let total = packed_count + unpacked_count;

    let container_volume = container.volume();
    let used_volume: f64 = placements.iter().map(|p| p.length * p.height * p.width).sum();

    PackStats {
        packed_count,
        unpacked_count,
        pack_rate: if total > 0 {
            round1(packed_count as f64 / total as f64 * 100.0)
        } else {
            0.0
        },
        space_utilization: if container_volume > 0.0 {
            round1(used_volume / container_volume * 100.0)
        } else {
            0.0
        },
        actual_weight: round1(total_weight),
        max_weight: container.max_weight,
        weight_utilization: if container.max_weight > 0.0 {
            round1(total_weight / container.max_weight * 100.0)
        } else {
            0.0
        },
        calc_time: round3(elapsed_secs),
        cog_offset: center_of_gravity_offset(placements, container),
    }
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
            max_weight: 1000.0,
        }
    }

    fn placement(x: f64, z: f64, weight: f64) -> Placement {
        Placement {
            name: "box".into(),
            length: 100.0,
            height: 100.0,
            width: 100.0,
            weight,
            x,
            y: 0.0,
            z,
            is_agg: false,
            agg_count: 1,
            stack_layer: 1,
            stack_limit: 10,
            orig_length: 100.0,
            orig_height: 100.0,
            orig_width: 100.0,
            family: FamilyKey::new("box", 100.0, 100.0, 100.0),
        }
    }

    #[test]
    fn centered_load_has_zero_offset() {
        let placements = vec![placement(450.0, 450.0, 10.0)];
        let offset = center_of_gravity_offset(&placements, &container());
        assert_eq!(offset, 0.0);
    }

    #[test]
    fn off_center_load_has_positive_offset() {
        let placements = vec![placement(0.0, 0.0, 10.0)];
        let offset = center_of_gravity_offset(&placements, &container());
        assert!(offset > 0.0);
    }

    #[test]
    fn calc_time_rounds_to_three_decimals() {
        let stats = summarize(&[], &[], 0.0, &container(), 0.123456);
        assert_eq!(stats.calc_time, 0.123);
    }

    #[test]
    fn pack_rate_rounds_to_one_decimal() {
        let placements = vec![placement(0.0, 0.0, 10.0)];
        let stats = summarize(&placements, &[], 10.0, &container(), 0.0);
        assert_eq!(stats.pack_rate, 100.0);
    }
}
