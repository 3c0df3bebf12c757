use crate::{Error, Result};

/// Minimum match ratio a catalog name needs to resolve a query.
pub const DEFAULT_CUTOFF: f64 = 0.4;

/// Number of ranked items returned after the resolved item itself.
pub const DEFAULT_TOP_K: usize = 19;

/// Configuration for a recommendation index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommenderConfig {
    /// Fuzzy match acceptance threshold on a 0..=1 scale
    pub cutoff: f64,
    /// Size of the recommendation window
    pub top_k: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl RecommenderConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.cutoff) {
            return Err(Error::InvalidConfig(format!(
                "cutoff must be within [0.0, 1.0], got {}",
                self.cutoff
            )));
        }
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RecommenderConfig::default();
        assert_eq!(config.cutoff, 0.4);
        assert_eq!(config.top_k, 19);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let config = RecommenderConfig { cutoff: 1.5, ..Default::default() };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = RecommenderConfig { cutoff: f64::NAN, ..Default::default() };
        assert!(config.validate().is_err());

        let config = RecommenderConfig { top_k: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }
}
