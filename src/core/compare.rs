//! Attribute ordering for way records
//!
//! Two ways compare equal when every routing attribute matches; the name is
//! not part of the key. This is the key used to merge ways with identical
//! attributes into one stored record when a ways file is compacted.

use std::cmp::Ordering;

use super::layout::WayRecord;

/// Order two ways by `(type, allow, props, speed, weight, height, width, length)`
pub fn compare(a: &WayRecord, b: &WayRecord) -> Ordering {
    if std::ptr::eq(a, b) {
        return Ordering::Equal;
    }

    a.way_type()
        .cmp(&b.way_type())
        .then_with(|| a.allow().cmp(&b.allow()))
        .then_with(|| a.props().cmp(&b.props()))
        .then_with(|| a.speed().cmp(&b.speed()))
        .then_with(|| a.weight().cmp(&b.weight()))
        .then_with(|| a.height().cmp(&b.height()))
        .then_with(|| a.width().cmp(&b.width()))
        .then_with(|| a.length().cmp(&b.length()))
}

/// True if the two ways carry identical routing attributes
pub fn same_attributes(a: &WayRecord, b: &WayRecord) -> bool {
    compare(a, b) == Ordering::Equal
}

/// Stable sort by attributes, so duplicates end up adjacent
pub fn sort_by_attributes(ways: &mut [WayRecord]) {
    ways.sort_by(compare);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Highway, Transport, ONEWAY};

    fn way(way_type: u8, allow: u16, props: u8, speed: u8) -> WayRecord {
        WayRecord::new(way_type, allow).with_props(props).with_speed(speed)
    }

    #[test]
    fn test_name_is_not_part_of_key() {
        let a = way(1, 0x1, 0, 50).with_name(0);
        let b = way(1, 0x1, 0, 50).with_name(17);
        assert_eq!(compare(&a, &b), Ordering::Equal);
        assert!(same_attributes(&a, &b));
    }

    #[test]
    fn test_type_has_priority_over_later_fields() {
        let a = way(1, 0x3ff, 0xff, 255);
        let b = way(2, 0x1, 0, 0);
        assert_eq!(compare(&a, &b), Ordering::Less);
        assert_eq!(compare(&b, &a), Ordering::Greater);
    }

    #[test]
    fn test_each_field_breaks_ties() {
        let base = way(3, 0x4, 1, 30).with_limits(5, 6, 7, 8);
        let variants = [
            way(3, 0x5, 1, 30).with_limits(5, 6, 7, 8),
            way(3, 0x4, 2, 30).with_limits(5, 6, 7, 8),
            way(3, 0x4, 1, 31).with_limits(5, 6, 7, 8),
            way(3, 0x4, 1, 30).with_limits(6, 6, 7, 8),
            way(3, 0x4, 1, 30).with_limits(5, 7, 7, 8),
            way(3, 0x4, 1, 30).with_limits(5, 6, 8, 8),
            way(3, 0x4, 1, 30).with_limits(5, 6, 7, 9),
        ];
        for v in &variants {
            assert_eq!(compare(&base, v), Ordering::Less);
            assert_eq!(compare(v, &base), Ordering::Greater);
        }
    }

    #[test]
    fn test_oneway_flag_is_part_of_type() {
        let plain = way(Highway::Residential as u8, Transport::Foot.bit(), 0, 30);
        let oneway = way(Highway::Residential as u8 | ONEWAY, Transport::Foot.bit(), 0, 30);
        assert_eq!(compare(&plain, &oneway), Ordering::Less);
    }

    #[test]
    fn test_same_identity_is_equal() {
        let a = way(9, 0x1, 0, 10);
        assert_eq!(compare(&a, &a), Ordering::Equal);
    }

    #[test]
    fn test_transitive_chain() {
        let a = way(1, 0x1, 0, 50);
        let b = way(1, 0x2, 0, 10);
        let c = way(2, 0x1, 0, 5);
        assert_eq!(compare(&a, &b), Ordering::Less);
        assert_eq!(compare(&b, &c), Ordering::Less);
        assert_eq!(compare(&a, &c), Ordering::Less);
    }

    #[test]
    fn test_sort_groups_duplicates() {
        let mut ways = vec![
            way(2, 0x3, 1, 30),
            way(1, 0x1, 0, 50).with_name(4),
            way(2, 0x3, 1, 30).with_name(9),
            way(1, 0x1, 0, 50),
        ];
        sort_by_attributes(&mut ways);
        assert!(same_attributes(&ways[0], &ways[1]));
        assert!(same_attributes(&ways[2], &ways[3]));
        assert_eq!(ways[0].way_type(), 1);
        // stable: original relative order of equal elements is kept
        assert_eq!(ways[0].name_offset(), 4);
        assert_eq!(ways[2].name_offset(), 0);
    }
}
