/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// RNG seed for deterministic runs.
    pub seed: u64,
    /// Number of simulated kills.
    pub iterations: u64,
    /// How many of the most frequent items to report. 0 = none.
    pub top_items: usize,
    /// Threat level for every kill; `None` skips threat bands.
    pub threat: Option<f64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            iterations: 100_000,
            top_items: 20,
            threat: None,
        }
    }
}

impl SimConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of simulated kills.
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set how many top items to report (0 = none).
    pub fn with_top_items(mut self, count: usize) -> Self {
        self.top_items = count;
        self
    }

    /// Roll every kill at this threat level.
    pub fn with_threat(mut self, threat: f64) -> Self {
        self.threat = Some(threat);
        self
    }
}
