//! Fixed-size batching of commit ids and record ids

/// Commit ids fetched and resolved together
pub const DISCOVERY_BATCH_SIZE: usize = 100;

/// Record ids sent in one removal call
pub const REMOVAL_BATCH_SIZE: usize = 500;

/// Splits `items` into consecutive slices of at most `size` elements.
///
/// A `size` of zero is treated as one. Concatenating the slices yields
/// `items` unchanged and there are exactly `ceil(len / size)` of them.
pub fn partition<T>(items: &[T], size: usize) -> Vec<&[T]> {
    items.chunks(size.max(1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_keeps_order_and_count() {
        let items: Vec<u32> = (0..250).collect();
        for size in [1, 7, 100, 250, 251] {
            let parts = partition(&items, size);
            assert_eq!(parts.len(), items.len().div_ceil(size));
            assert!(parts.iter().all(|p| p.len() <= size));
            assert_eq!(parts.concat(), items);
        }
    }

    #[test]
    fn test_partition_empty() {
        let items: Vec<String> = Vec::new();
        assert!(partition(&items, DISCOVERY_BATCH_SIZE).is_empty());
    }

    #[test]
    fn test_partition_zero_size_is_one() {
        let parts = partition(&["a", "b"], 0);
        assert_eq!(parts, vec![&["a"][..], &["b"][..]]);
    }
}
