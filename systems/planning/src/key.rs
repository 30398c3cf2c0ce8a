//! Priority key shared by the Dijkstra planners.

use std::cmp::Ordering;

/// Frontier entry priority ordered by cost, then turn count, then insertion order.
///
/// Costs compare with [`f64::total_cmp`], so the order is total and frontier
/// expansion is reproducible for equal-cost ties.
#[derive(Clone, Copy, Debug)]
pub struct SearchKey {
    /// Accumulated travel cost including turn penalties.
    pub cost: f64,
    /// Heading changes taken so far.
    pub turns: u32,
    /// Position of the entry in push order.
    pub sequence: u64,
}

impl SearchKey {
    /// Reports whether `(cost, turns)` is strictly better than the other key's, ignoring insertion order.
    #[must_use]
    pub fn improves_on(&self, other: &SearchKey) -> bool {
        self.cost
            .total_cmp(&other.cost)
            .then(self.turns.cmp(&other.turns))
            == Ordering::Less
    }
}

impl PartialEq for SearchKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchKey {}

impl PartialOrd for SearchKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then(self.turns.cmp(&other.turns))
            .then(self.sequence.cmp(&other.sequence))
    }
}

#[cfg(test)]
mod tests {
    use super::SearchKey;

    fn key(cost: f64, turns: u32, sequence: u64) -> SearchKey {
        SearchKey {
            cost,
            turns,
            sequence,
        }
    }

    #[test]
    fn cost_dominates_then_turns_then_sequence() {
        assert!(key(1.0, 5, 9) < key(2.0, 0, 0));
        assert!(key(2.0, 1, 9) < key(2.0, 2, 0));
        assert!(key(2.0, 1, 3) < key(2.0, 1, 4));
        assert_eq!(key(2.0, 1, 3), key(2.0, 1, 3));
    }

    #[test]
    fn improvement_ignores_sequence() {
        assert!(key(1.0, 0, 10).improves_on(&key(1.0, 1, 0)));
        assert!(!key(1.0, 1, 0).improves_on(&key(1.0, 1, 10)));
        assert!(!key(f64::INFINITY, 0, 0).improves_on(&key(3.0, 4, 0)));
    }
}
