use serde::{Deserialize, Serialize};

/// Bounds on how much work a solve may do
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// The most moves a single stage may apply
    pub max_moves_per_stage: usize,
    /// The most moves the whole solve may apply
    pub max_total_moves: usize,
    /// How many steps a stage may take before it is considered stalled
    pub max_attempts: usize,
    /// The deepest F2L search, counted in inserts and U turns
    pub f2l_search_depth: u8,
    /// Refuse to solve states that fail the solvability check
    pub validate_solvability: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_moves_per_stage: 100,
            max_total_moves: 250,
            max_attempts: 10,
            f2l_search_depth: 9,
            validate_solvability: true,
        }
    }
}

impl SolverConfig {
    /// Read a configuration from TOML. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the text is not valid TOML or a value has the wrong type.
    pub fn from_toml(text: &str) -> Result<SolverConfig, toml::de::Error> {
        toml::from_str(text)
    }

    /// # Errors
    ///
    /// Fails only if serialization fails, which does not happen for this type.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    #[must_use]
    pub fn with_max_moves_per_stage(mut self, max_moves_per_stage: usize) -> Self {
        self.max_moves_per_stage = max_moves_per_stage;
        self
    }

    #[must_use]
    pub fn with_max_total_moves(mut self, max_total_moves: usize) -> Self {
        self.max_total_moves = max_total_moves;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn with_f2l_search_depth(mut self, f2l_search_depth: u8) -> Self {
        self.f2l_search_depth = f2l_search_depth;
        self
    }

    #[must_use]
    pub fn with_validate_solvability(mut self, validate_solvability: bool) -> Self {
        self.validate_solvability = validate_solvability;
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SolverConfig::from_toml("max_total_moves = 120\nmax_attempts = 4\n").unwrap();

        assert_eq!(
            config,
            SolverConfig::default()
                .with_max_total_moves(120)
                .with_max_attempts(4)
        );
    }

    #[test]
    fn toml_round_trips() {
        let config = SolverConfig::default()
            .with_f2l_search_depth(7)
            .with_validate_solvability(false);

        let text = config.to_toml().unwrap();
        assert_eq!(SolverConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(SolverConfig::from_toml("max_attempts = \"many\"").is_err());
    }
}
