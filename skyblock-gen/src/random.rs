use rand::Rng;

/// Uniform integer draws, the only randomness tree placement consumes.
///
/// Every [`rand::Rng`] is a source, so a seeded `StdRng` can be passed
/// straight in; tests can script exact draw sequences instead.
pub trait RandomSource {
    /// Uniform integer in `[0, bound)`. `bound` must be positive.
    fn next_int(&mut self, bound: i32) -> i32;
}

impl<R: Rng> RandomSource for R {
    fn next_int(&mut self, bound: i32) -> i32 {
        self.gen_range(0..bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_seeded_draws_repeat() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..64 {
            let draw = a.next_int(3);
            assert!((0..3).contains(&draw));
            assert_eq!(draw, b.next_int(3));
        }
    }
}
