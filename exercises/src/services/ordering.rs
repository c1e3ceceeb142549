//! Sort keys of exercises.
//!
//! Exercises in a category with order `c` occupy the range
//! `c * CATEGORY_STRIDE .. (c + 1) * CATEGORY_STRIDE`. Uncategorized
//! exercises start at [`UNCATEGORIZED_BASE`] so they sort after every
//! category a course will realistically have.

use std::collections::HashSet;

use uuid::Uuid;

pub const CATEGORY_STRIDE: i32 = 1000;
pub const UNCATEGORIZED_BASE: i32 = 999_999;

/// Returns the sort key of the exercise at `position` (0-based) of its
/// group. `category_order` is `None` for uncategorized exercises.
///
/// # Panics
/// Panics if the key does not fit into an `i32`.
pub fn allocate(category_order: Option<i32>, position: usize) -> i32 {
    let key = i32::try_from(position)
        .ok()
        .and_then(|position| match category_order {
            Some(order) => order.checked_mul(CATEGORY_STRIDE)?.checked_add(position),
            None => UNCATEGORIZED_BASE.checked_add(position),
        });
    match key {
        Some(key) => key,
        None => panic!("sort key out of range: category {category_order:?}, position {position}"),
    }
}

/// The sort key following `last`, the highest key currently used in a group.
/// Returns `None` if that key would leave the range of the category, in which
/// case the group has to be compacted first.
pub fn next_key(category_order: Option<i32>, last: Option<i32>) -> Option<i32> {
    let first = allocate(category_order, 0);
    let next = match last {
        Some(last) => last.checked_add(1)?.max(first),
        None => first,
    };
    match category_order {
        Some(order) if category_order_of(next) != order => None,
        _ => Some(next),
    }
}

/// Whether a category currently holding `count` exercises can take another
/// one without leaking into the range of the next category.
pub fn has_capacity(count: usize) -> bool {
    count < CATEGORY_STRIDE as usize
}

/// The 1-based number of an exercise within its category.
pub fn display_number(order_index: i32) -> i32 {
    order_index.rem_euclid(CATEGORY_STRIDE) + 1
}

pub fn category_order_of(order_index: i32) -> i32 {
    order_index.div_euclid(CATEGORY_STRIDE)
}

/// The 1-based position of `id` within an already sorted sequence.
pub fn continuous_display_number(sorted: impl IntoIterator<Item = Uuid>, id: Uuid) -> Option<u64> {
    sorted
        .into_iter()
        .position(|x| x == id)
        .map(|pos| pos as u64 + 1)
}

/// Assigns consecutive sort keys to the exercises of one group in the given
/// order.
pub fn recalculate_category(category_order: Option<i32>, ids: &[Uuid]) -> Vec<(Uuid, i32)> {
    ids.iter()
        .enumerate()
        .map(|(position, &id)| (id, allocate(category_order, position)))
        .collect()
}

/// Whether `ordered` contains exactly the ids of `current`, each once.
pub fn is_permutation(current: impl IntoIterator<Item = Uuid>, ordered: &[Uuid]) -> bool {
    let current = current.into_iter().collect::<HashSet<_>>();
    let ordered_set = ordered.iter().copied().collect::<HashSet<_>>();
    ordered_set.len() == ordered.len() && current == ordered_set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate() {
        assert_eq!(allocate(Some(0), 0), 0);
        assert_eq!(allocate(Some(2), 0), 2000);
        assert_eq!(allocate(Some(2), 3), 2003);
        assert_eq!(allocate(None, 0), 999_999);
        assert_eq!(allocate(None, 4), 1_000_003);
    }

    #[test]
    #[should_panic]
    fn test_allocate_out_of_range() {
        allocate(Some(i32::MAX / 1000 + 1), 0);
    }

    #[test]
    fn test_next_key() {
        assert_eq!(next_key(Some(2), None), Some(2000));
        assert_eq!(next_key(Some(2), Some(2000)), Some(2001));
        assert_eq!(next_key(Some(0), Some(2)), Some(3));
        assert_eq!(next_key(Some(2), Some(1500)), Some(2000));
        assert_eq!(next_key(Some(2), Some(2999)), None);
        assert_eq!(next_key(None, None), Some(999_999));
        assert_eq!(next_key(None, Some(1_000_002)), Some(1_000_003));
        assert_eq!(next_key(None, Some(i32::MAX)), None);
    }

    #[test]
    fn test_categories_do_not_overlap() {
        for order in 0..20 {
            let last = allocate(Some(order), CATEGORY_STRIDE as usize - 1);
            let next = allocate(Some(order + 1), 0);
            assert!(last < next);
            assert_eq!(category_order_of(last), order);
            assert_eq!(category_order_of(next), order + 1);
        }
        assert!(allocate(Some(998), 999) < allocate(None, 0));
    }

    #[test]
    fn test_capacity() {
        assert!(has_capacity(0));
        assert!(has_capacity(999));
        assert!(!has_capacity(1000));
    }

    #[test]
    fn test_display_number() {
        assert_eq!(display_number(2003), 4);
        assert_eq!(display_number(0), 1);
        assert_eq!(display_number(5999), 1000);
        for order in 0..10 {
            for position in [0, 1, 17, 999] {
                assert_eq!(
                    display_number(allocate(Some(order), position)),
                    position as i32 + 1
                );
            }
        }
    }

    #[test]
    fn test_display_number_uncategorized() {
        assert_eq!(display_number(999_999), 1000);
        assert_eq!(display_number(1_000_003), 4);
    }

    #[test]
    fn test_continuous_display_number() {
        let ids = (0..4).map(|_| Uuid::new_v4()).collect::<Vec<_>>();
        assert_eq!(continuous_display_number(ids.clone(), ids[0]), Some(1));
        assert_eq!(continuous_display_number(ids.clone(), ids[3]), Some(4));
        assert_eq!(continuous_display_number(ids, Uuid::new_v4()), None);
        assert_eq!(continuous_display_number([], Uuid::new_v4()), None);
    }

    #[test]
    fn test_recalculate_category() {
        let ids = (0..3).map(|_| Uuid::new_v4()).collect::<Vec<_>>();
        assert_eq!(
            recalculate_category(Some(1), &ids),
            vec![(ids[0], 1000), (ids[1], 1001), (ids[2], 1002)]
        );
        assert_eq!(
            recalculate_category(None, &ids[1..]),
            vec![(ids[1], 999_999), (ids[2], 1_000_000)]
        );
        assert!(recalculate_category(Some(4), &[]).is_empty());
    }

    #[test]
    fn test_is_permutation() {
        let ids = (0..3).map(|_| Uuid::new_v4()).collect::<Vec<_>>();
        assert!(is_permutation(ids.clone(), &[ids[2], ids[0], ids[1]]));
        assert!(!is_permutation(ids.clone(), &[ids[2], ids[0]]));
        assert!(!is_permutation(ids.clone(), &[ids[2], ids[0], ids[0]]));
        assert!(!is_permutation(
            ids.clone(),
            &[ids[2], ids[0], ids[1], Uuid::new_v4()]
        ));
        assert!(is_permutation([], &[]));
    }
}
