use core::fmt;

/// Latency statistics over one engine's samples, in microseconds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Summary {
    pub min: u64,
    pub max: u64,
    /// Integer mean (sum / count)
    pub avg: u64,
    /// `sorted[len / 2]`, the upper median for even counts
    pub med: u64,
    pub count: usize,
}

impl Summary {
    /// Sorts `samples` in place. Returns `None` when there are none.
    pub fn from_samples(samples: &mut [u64]) -> Option<Summary> {
        if samples.is_empty() {
            return None;
        }
        samples.sort_unstable();

        let count = samples.len();
        let sum: u128 = samples.iter().map(|&s| s as u128).sum();

        Some(Summary {
            min: samples[0],
            max: samples[count - 1],
            avg: (sum / count as u128) as u64,
            med: samples[count / 2],
            count,
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "min: {} us, max: {} us, avg: {} us, med: {} us",
            self.min, self.max, self.avg, self.med)
    }
}
