use log::info;

/// Success and failure counts of a single run.
///
/// Each track (sort mode) or matching playlist (delete mode) is recorded exactly once.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub success: usize,
    pub failure: usize,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, succeeded: bool) {
        if succeeded {
            self.success += 1;
        } else {
            self.failure += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.failure
    }

    pub fn log_summary(&self) {
        info!("Finished.");
        info!("Succeeded: {}", self.success);
        info!("Failed:    {}", self.failure);
        info!("Total:     {}", self.total());
    }
}
