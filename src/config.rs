/// Work limits for a single solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Number of deepening passes allowed before giving up.
    pub max_iterations: usize,
    /// Total node expansions allowed across all passes. `None` means unbounded.
    pub max_expansions: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_iterations: 1_000_000,
            max_expansions: None,
        }
    }
}

impl SolverConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: u64) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = SolverConfig::default()
            .with_max_iterations(12)
            .with_max_expansions(500);
        assert_eq!(config.max_iterations, 12);
        assert_eq!(config.max_expansions, Some(500));
        assert_eq!(SolverConfig::default().max_expansions, None);
    }
}
