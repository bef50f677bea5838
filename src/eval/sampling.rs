//! Deterministic sentence shuffles.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// A pseudo-random permutation of `0..n`, fixed by `seed`.
///
/// `order[k]` is the original sentence placed at position `k`, which is the
/// form [`crate::EntityOccurrenceIndex::permute_sentences`] takes.
#[must_use]
pub fn shuffled_order(n: usize, seed: u64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    let mut state = hasher.finish();
    for i in 0..n {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let j = i + (state >> 33) as usize % (n - i);
        order.swap(i, j);
    }
    order
}

/// Up to `count` distinct non-identity permutations of `0..n`.
///
/// Fewer are returned when `n` is too small to have that many (a
/// two-sentence document has exactly one).
#[must_use]
pub fn permutations(n: usize, count: usize, seed: u64) -> Vec<Vec<usize>> {
    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    let mut result = Vec::with_capacity(count);
    if n < 2 {
        return result;
    }

    let max_attempts = count.saturating_mul(20).max(64);
    for attempt in 0..max_attempts as u64 {
        if result.len() == count {
            break;
        }
        let order = shuffled_order(n, seed.wrapping_add(attempt));
        if is_identity(&order) || !seen.insert(order.clone()) {
            continue;
        }
        result.push(order);
    }
    result
}

pub(crate) fn is_identity(order: &[usize]) -> bool {
    order.iter().enumerate().all(|(k, &original)| k == original)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shuffle_is_a_permutation() {
        for n in [0, 1, 2, 7, 30] {
            let mut order = shuffled_order(n, 42);
            order.sort_unstable();
            assert_eq!(order, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_shuffle_is_deterministic() {
        assert_eq!(shuffled_order(20, 7), shuffled_order(20, 7));
        // Different seeds should (almost always) differ on 20 elements.
        assert_ne!(shuffled_order(20, 7), shuffled_order(20, 8));
    }

    #[test]
    fn test_permutations_are_distinct_and_shuffled() {
        let perms = permutations(6, 20, 1);
        assert_eq!(perms.len(), 20);
        let unique: HashSet<_> = perms.iter().collect();
        assert_eq!(unique.len(), 20);
        assert!(perms.iter().all(|p| !is_identity(p)));
    }

    #[test]
    fn test_permutations_of_tiny_documents() {
        assert!(permutations(1, 5, 0).is_empty());
        assert_eq!(permutations(2, 5, 0), vec![vec![1, 0]]);
    }
}
