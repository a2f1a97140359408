use crate::simulation::rng::UniformSource;

/// Upper bound on retained terminal prices, regardless of path count.
pub const RESERVOIR_CAP: usize = 20_000;

/// Fixed-capacity uniform sample of a stream (Vitter's Algorithm R).
///
/// After `i >= capacity` offers, each offered value is present with
/// probability `capacity / i`. Storage never grows past `capacity`.
#[derive(Debug, Clone)]
pub struct Reservoir {
    items: Vec<f64>,
    capacity: usize,
    seen: usize,
}

impl Reservoir {
    /// Capacity for a run of `path_count` paths: `min(path_count, RESERVOIR_CAP)`.
    #[inline]
    pub fn capacity_for(path_count: usize) -> usize {
        path_count.min(RESERVOIR_CAP)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            seen: 0,
        }
    }

    #[inline]
    pub fn offer<S: UniformSource + ?Sized>(&mut self, x: f64, src: &mut S) {
        let i = self.seen;
        self.seen += 1;
        if i < self.capacity {
            self.items.push(x);
            return;
        }
        let j = src.next_index(i);
        if j < self.capacity {
            self.items[j] = x;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total values offered so far.
    #[inline]
    pub fn seen(&self) -> usize {
        self.seen
    }

    /// Consume into an ascending-sorted sample.
    pub fn into_sorted(mut self) -> Vec<f64> {
        self.items.sort_unstable_by(f64::total_cmp);
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_capacity_cap() {
        assert_eq!(Reservoir::capacity_for(1_000), 1_000);
        assert_eq!(Reservoir::capacity_for(20_000), 20_000);
        assert_eq!(Reservoir::capacity_for(200_000), RESERVOIR_CAP);
    }

    #[test]
    fn test_fills_in_order_below_capacity() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut r = Reservoir::with_capacity(10);
        for x in 0..7 {
            r.offer(x as f64, &mut rng);
        }
        assert_eq!(r.len(), 7);
        assert_eq!(r.into_sorted(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut r = Reservoir::with_capacity(100);
        for x in 0..50_000 {
            r.offer(x as f64, &mut rng);
            assert!(r.len() <= 100);
        }
        assert_eq!(r.len(), 100);
        assert_eq!(r.seen(), 50_000);
    }

    #[test]
    fn test_inclusion_is_uniform() {
        // 20 slots over 100 values, 4000 trials: each value expected 800 times
        let mut rng = StdRng::seed_from_u64(42);
        let mut hits = [0u32; 100];
        for _ in 0..4_000 {
            let mut r = Reservoir::with_capacity(20);
            for x in 0..100 {
                r.offer(x as f64, &mut rng);
            }
            for v in r.into_sorted() {
                hits[v as usize] += 1;
            }
        }
        for (i, &h) in hits.iter().enumerate() {
            assert!((650..=950).contains(&h), "value {i} retained {h} times");
        }
        // Early and late halves retained equally often
        let early: u32 = hits[..50].iter().sum();
        let late: u32 = hits[50..].iter().sum();
        assert!((early as i64 - late as i64).abs() < 1_500, "early={early} late={late}");
    }

    #[test]
    fn test_sorted_output_handles_negatives() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut r = Reservoir::with_capacity(4);
        for x in [3.0, -1.0, 2.5, 0.0] {
            r.offer(x, &mut rng);
        }
        assert_eq!(r.into_sorted(), vec![-1.0, 0.0, 2.5, 3.0]);
    }
}
