use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SamplingError {
    #[error("weighted table has no entries with a positive weight")]
    Empty,
}

/// Categories with relative weights, sampled by cumulative weight.
///
/// A uniform draw is scaled to the total weight and the first entry whose
/// running total meets or exceeds it wins. Weights do not need to sum to
/// any particular value.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    entries: Vec<(T, u32)>,
    total: u64,
}

impl<T: Copy> WeightedTable<T> {
    pub fn new<I>(entries: I) -> Result<Self, SamplingError>
    where
        I: IntoIterator<Item = (T, u32)>,
    {
        // zero weights could only ever be hit by an exact 0.0 draw
        let entries = entries
            .into_iter()
            .filter(|(_, weight)| *weight > 0)
            .collect::<Vec<_>>();
        let total = entries.iter().map(|(_, w)| u64::from(*w)).sum::<u64>();

        if entries.is_empty() {
            return Err(SamplingError::Empty);
        }

        Ok(Self { entries, total })
    }

    pub fn total_weight(&self) -> u64 {
        self.total
    }

    pub fn entries(&self) -> &[(T, u32)] {
        &self.entries
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        let target = rng.random::<f64>() * self.total as f64;
        self.pick(target)
    }

    fn pick(&self, target: f64) -> T {
        let mut cumulative = 0_u64;
        for (value, weight) in &self.entries {
            cumulative += u64::from(*weight);
            if cumulative as f64 >= target {
                return *value;
            }
        }

        // entries is never empty
        self.entries[self.entries.len() - 1].0
    }
}
