//! Category quotas
//!
//! Capacity is split evenly across categories before any filling, so a
//! category with high-scoring plants cannot crowd the others out. The
//! remainder goes one unit at a time to the first categories in order.

/// Split `total_capacity` into `n_categories` quotas summing to `total_capacity`
///
/// Returns an empty vector when there are no categories.
pub fn split_capacity(total_capacity: u32, n_categories: usize) -> Vec<u32> {
    if n_categories == 0 {
        return Vec::new();
    }

    let n = n_categories as u32;
    let base = total_capacity / n;
    let remainder = (total_capacity % n) as usize;

    (0..n_categories)
        .map(|idx| if idx < remainder { base + 1 } else { base })
        .collect()
}
