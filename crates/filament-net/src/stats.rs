use std::time::Duration;

/// Monotone rewrite counters, the engine's sole required trace.
///
/// Workers each keep their own copy and the driver merges them at join, so
/// no counter is contended during reduction.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stats {
    pub beta_reductions: u64,
    pub duplications: u64,
    pub erasures: u64,
    pub annihilations: u64,
}

impl Stats {
    pub fn total(&self) -> u64 {
        self.beta_reductions + self.duplications + self.erasures + self.annihilations
    }

    pub fn merge(&mut self, other: &Stats) {
        self.beta_reductions += other.beta_reductions;
        self.duplications += other.duplications;
        self.erasures += other.erasures;
        self.annihilations += other.annihilations;
    }

    pub fn show(&self, elapsed: Duration) -> String {
        let per_second = if elapsed.as_secs_f64() > 0.0 {
            (self.total() as f64 / elapsed.as_secs_f64()) as u64
        } else {
            0
        };
        format!(
            "\
            \tBeta: {}\n\
            \tDuplicate: {}\n\
            \tErase: {}\n\
            \tAnnihilate: {}\n\
            \tTotal: {}\n\
            \tTime (ms): {}\n\
            \tPer second: {}\n\
            ",
            self.beta_reductions,
            self.duplications,
            self.erasures,
            self.annihilations,
            self.total(),
            elapsed.as_millis(),
            per_second,
        )
    }
}
