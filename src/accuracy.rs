use crate::osu::ScoreEntry;

const MAX_HIT_VALUE: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitCounts {
    pub count50: u32,
    pub count100: u32,
    pub count300: u32,
    pub count_miss: u32,
}

impl HitCounts {
    pub fn new(count50: u32, count100: u32, count300: u32, count_miss: u32) -> Self {
        Self {
            count50,
            count100,
            count300,
            count_miss,
        }
    }

    pub fn total(&self) -> u64 {
        u64::from(self.count50)
            + u64::from(self.count100)
            + u64::from(self.count300)
            + u64::from(self.count_miss)
    }

    /// Misses weigh nothing.
    pub fn weighted(&self) -> u64 {
        50 * u64::from(self.count50) + 100 * u64::from(self.count100) + 300 * u64::from(self.count300)
    }

    pub fn accuracy(&self) -> f64 {
        accuracy(*self)
    }
}

impl From<&ScoreEntry> for HitCounts {
    fn from(entry: &ScoreEntry) -> Self {
        Self::new(
            entry.count50,
            entry.count100,
            entry.count300,
            entry.countmiss,
        )
    }
}

/// Accuracy percentage rounded to two decimals; `0.0` when nothing was hit.
pub fn accuracy(counts: HitCounts) -> f64 {
    let total = counts.total();
    if total == 0 {
        return 0.0;
    }
    let ratio = counts.weighted() as f64 / (total as f64 * MAX_HIT_VALUE);
    round2(ratio * 100.0)
}

/// Rounds the exact binary value half to even, so `90.625` becomes `90.62`.
fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
