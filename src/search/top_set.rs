use std::cmp::Ordering;
use std::sync::Arc;
use crate::matches::Match;

/// Keeps the `capacity` greatest items seen, according to `compare`.
///
/// Adding is O(1) while the set has room and O(capacity) once it is full,
/// which suits the small capacities used to rank combinations.
pub struct TopSet<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    items: Vec<T>,
    capacity: usize,
    compare: C,
    min_index: Option<usize>,
    max_index: Option<usize>,
}

impl<T, C> TopSet<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    pub fn new(capacity: usize, compare: C) -> Self {
        TopSet {
            items: Vec::with_capacity(capacity),
            capacity,
            compare,
            min_index: None,
            max_index: None,
        }
    }

    /// Returns true if `item` was retained
    pub fn add(&mut self, item: T) -> bool {
        if self.items.len() < self.capacity {
            self.items.push(item);
            let idx = self.items.len() - 1;
            self.refresh(idx);
            return true;
        }

        let Some(min) = self.min_index else {
            return false;
        };
        if (self.compare)(&item, &self.items[min]) != Ordering::Greater {
            return false;
        }

        self.items[min] = item;
        // the new item beats the old min, so a max pointing at this slot stays correct
        if self.max_index.is_none_or(|max| (self.compare)(&self.items[min], &self.items[max]) == Ordering::Greater) {
            self.max_index = Some(min);
        }
        self.min_index = self.position_of(Ordering::Less);
        true
    }

    pub fn min(&self) -> Option<&T> {
        self.min_index.map(|i| &self.items[i])
    }

    pub fn max(&self) -> Option<&T> {
        self.max_index.map(|i| &self.items[i])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Items sorted descending
    pub fn into_sorted_vec(self) -> Vec<T> {
        let compare = self.compare;
        let mut items = self.items;
        items.sort_by(|a, b| compare(b, a));
        items
    }

    pub fn to_sorted_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut items = self.items.clone();
        items.sort_by(|a, b| (self.compare)(b, a));
        items
    }

    fn refresh(&mut self, idx: usize) {
        let item = &self.items[idx];
        if self.min_index.is_none_or(|min| (self.compare)(item, &self.items[min]) == Ordering::Less) {
            self.min_index = Some(idx);
        }
        if self.max_index.is_none_or(|max| (self.compare)(item, &self.items[max]) == Ordering::Greater) {
            self.max_index = Some(idx);
        }
    }

    /// Index of the item every other item compares `wanted`-or-equal against
    fn position_of(&self, wanted: Ordering) -> Option<usize> {
        (0..self.items.len()).reduce(|best, i| {
            if (self.compare)(&self.items[i], &self.items[best]) == wanted { i } else { best }
        })
    }
}

impl<T: Ord> TopSet<T, fn(&T, &T) -> Ordering> {
    /// Top set ordered by `T`'s own ordering
    pub fn natural(capacity: usize) -> Self {
        TopSet::new(capacity, T::cmp as fn(&T, &T) -> Ordering)
    }
}

/// A match combination with the score a caller gave it
#[derive(Debug, Clone)]
pub struct ScoredCombination {
    pub score: f32,
    pub matches: Vec<Arc<Match>>,
}

impl ScoredCombination {
    pub fn new(score: f32, matches: Vec<Arc<Match>>) -> Self {
        ScoredCombination { score, matches }
    }

    /// Sum of match scores weighted by matched tokens
    pub fn weighted(matches: &[Arc<Match>]) -> Self {
        let score = matches.iter()
            .map(|m| m.score() * m.matched_tokens() as f32)
            .sum();
        ScoredCombination::new(score, matches.to_vec())
    }
}

impl PartialEq for ScoredCombination {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score
    }
}

impl Eq for ScoredCombination {}

impl PartialOrd for ScoredCombination {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredCombination {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.total_cmp(&other.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rand::rngs::StdRng;

    #[test]
    fn test_keeps_top_items() {
        let mut set = TopSet::natural(10);
        for i in 1..=10 {
            assert!(set.add(i));
        }
        assert!(set.add(5));
        assert!(set.add(200));
        assert!(set.add(7));
        assert!(set.add(80));
        assert!(set.add(50));
        assert!(!set.add(1));

        assert_eq!(set.len(), 10);
        assert_eq!(set.max(), Some(&200));
        assert_eq!(set.min(), Some(&5));
        assert_eq!(set.into_sorted_vec(), vec![200, 80, 50, 10, 9, 8, 7, 7, 6, 5]);
    }

    #[test]
    fn test_zero_capacity() {
        let mut set = TopSet::natural(0);
        assert!(!set.add(1));
        assert!(set.is_empty());
        assert_eq!(set.min(), None);
    }

    #[test]
    fn test_equal_to_min_rejected() {
        let mut set = TopSet::natural(2);
        set.add(3);
        set.add(4);
        assert!(!set.add(3));
        assert_eq!(set.to_sorted_vec(), vec![4, 3]);
    }

    #[test]
    fn test_custom_comparator() {
        let mut set = TopSet::new(2, |a: &&str, b: &&str| a.len().cmp(&b.len()));
        set.add("aaa");
        set.add("b");
        set.add("cc");
        assert_eq!(set.into_sorted_vec(), vec!["aaa", "cc"]);
    }

    #[test]
    fn test_matches_sorted_reference() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let capacity = rng.gen_range(1..20);
            let mut values: Vec<i32> = (0..rng.gen_range(0..100)).map(|_| rng.gen_range(-50..50)).collect();
            values.shuffle(&mut rng);

            let mut set = TopSet::natural(capacity);
            for v in &values {
                set.add(*v);
            }

            let mut expected = values.clone();
            expected.sort_by(|a, b| b.cmp(a));
            expected.truncate(capacity);
            assert_eq!(set.to_sorted_vec(), expected);
            assert!(set.len() <= capacity);
        }
    }

    #[test]
    fn test_scored_combinations() {
        let mut set = TopSet::natural(2);
        set.add(ScoredCombination::new(0.5, Vec::new()));
        set.add(ScoredCombination::new(1.5, Vec::new()));
        set.add(ScoredCombination::new(0.9, Vec::new()));
        let scores: Vec<f32> = set.into_sorted_vec().iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![1.5, 0.9]);
    }
}
