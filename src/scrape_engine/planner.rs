//! Page offset planning
//!
//! The screener addresses pages by the 1-based row they start at. The first
//! page is the bare listing URL; every later page adds the row offset.

/// Compute the ordered page-start offsets for a listing of `total` rows
///
/// Yields `ceil(total / page_size)` offsets: `1`, then `i * page_size + 1`.
/// An empty listing yields an empty plan. `page_size` must be non-zero,
/// which `ScrapeConfigBuilder::build` guarantees.
#[must_use]
pub fn plan_offsets(total: usize, page_size: usize) -> Vec<usize> {
    if page_size == 0 {
        return Vec::new();
    }
    let pages = total.div_ceil(page_size);
    (0..pages).map(|i| i * page_size + 1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_listing_plan() {
        let plan = plan_offsets(1355, 20);
        assert_eq!(plan.len(), 68);
        assert_eq!(plan[0], 1);
        assert_eq!(plan[1], 21);
        assert_eq!(plan[67], 1341);
    }

    #[test]
    fn small_listing_is_one_page() {
        assert_eq!(plan_offsets(7, 20), vec![1]);
        assert_eq!(plan_offsets(20, 20), vec![1]);
        assert_eq!(plan_offsets(21, 20), vec![1, 21]);
    }

    #[test]
    fn empty_listing_has_no_pages() {
        assert!(plan_offsets(0, 20).is_empty());
        assert!(plan_offsets(10, 0).is_empty());
    }

    proptest! {
        #[test]
        fn plan_covers_every_row(total in 1usize..5000, page_size in 1usize..200) {
            let plan = plan_offsets(total, page_size);

            prop_assert_eq!(plan.len(), total.div_ceil(page_size));
            prop_assert_eq!(plan[0], 1);
            prop_assert!(plan.windows(2).all(|w| w[1] - w[0] == page_size));
            // Last page starts inside the listing
            prop_assert!(*plan.last().unwrap() <= total);
        }
    }
}
