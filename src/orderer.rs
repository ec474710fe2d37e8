//! The two stable sort passes that decide placement attempt order.
//!
//! Both mirror the reference implementation's `sorted(key=...)` calls, which
//! rely on Python's stable sort; Rust's `slice::sort_by` gives the same
//! stability guarantee, so ties keep their prior relative order.

use crate::model::Item;

const MID_BAND_MIN: f64 = 50.0;
const MID_BAND_MAX: f64 = 500.0;

fn size_band_rank(item: &Item) -> i32 {
    let longest = item.length.max(item.height).max(item.width);
    if (MID_BAND_MIN..=MID_BAND_MAX).contains(&longest) {
        1
    } else {
        0
    }
}

/// Primary ordering, applied once to the freshly expanded item list: items
/// whose longest edge falls in the mid-size band go first, then by
/// descending volume.
pub fn sort_initial(items: &mut Vec<Item>) {
    items.sort_by(|a, b| {
        size_band_rank(b)
            .cmp(&size_band_rank(a))
            .then(b.volume().partial_cmp(&a.volume()).unwrap())
    });
}

/// Secondary ordering, applied after aggregation: aggregated super-blocks go
/// first, then by descending volume.
pub fn sort_post_aggregation(items: &mut Vec<Item>) {
    items.sort_by(|a, b| {
        b.is_agg
            .cmp(&a.is_agg)
            .then(b.volume().partial_cmp(&a.volume()).unwrap())
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FamilyKey;

    fn item(name: &str, l: f64, h: f64, w: f64, is_agg: bool) -> Item {
        Item {
            name: name.into(),
            length: l,
            height: h,
            width: w,
            weight: 1.0,
            stack_limit: 10,
            allow_rotate: false,
            is_agg,
            agg_count: 1,
            family: FamilyKey::new(name, l, h, w),
            orig_length: l,
            orig_height: h,
            orig_width: w,
        }
    }

    #[test]
    fn mid_band_items_sort_before_extremes() {
        let mut items = vec![
            item("tiny", 5.0, 5.0, 5.0, false),
            item("mid", 100.0, 100.0, 100.0, false),
            item("huge", 900.0, 900.0, 900.0, false),
        ];
        sort_initial(&mut items);
        assert_eq!(items[0].name, "mid");
    }

    #[test]
    fn aggregated_items_sort_first_post_aggregation() {
        let mut items = vec![
            item("plain", 100.0, 100.0, 100.0, false),
            item("block", 90.0, 90.0, 90.0, true),
        ];
        sort_post_aggregation(&mut items);
        assert!(items[0].is_agg);
    }

    #[test]
    fn descending_volume_within_same_band() {
        let mut items = vec![
            item("small", 60.0, 60.0, 60.0, false),
            item("bigger", 100.0, 100.0, 100.0, false),
        ];
        sort_initial(&mut items);
        assert_eq!(items[0].name, "bigger");
    }
}
