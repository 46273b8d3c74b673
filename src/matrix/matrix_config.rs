use serde::{Deserialize, Serialize};

/// Knobs for [`Matrix::invert_with`](crate::Matrix::invert_with).
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct InvertConfig {
    /// Relative zero threshold. During pivot search a cell counts as zero
    /// when `|v| <= tolerance * max|a_ij|` of the matrix being inverted.
    pub tolerance: f64,
}

impl InvertConfig {
    pub const DEFAULT_TOLERANCE: f64 = 1e-12;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    /// `scale` is the largest absolute cell of the input matrix.
    #[inline(always)]
    pub fn is_zero(&self, value: f64, scale: f64) -> bool {
        value.abs() <= self.tolerance * scale
    }
}

impl Default for InvertConfig {
    fn default() -> Self {
        Self {
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tolerance() {
        let config = InvertConfig::new();
        assert_eq!(config.tolerance, 1e-12);
        assert!(config.is_zero(0.0, 1.0));
        assert!(config.is_zero(-1e-13, 1.0));
        assert!(!config.is_zero(1e-6, 1.0));
        assert!(config.is_zero(0.0, 0.0));
    }

    #[test]
    fn test_threshold_follows_scale() {
        let config = InvertConfig::new();
        assert!(!config.is_zero(1e-13, 1e-10));
        assert!(config.is_zero(1e-5, 1e8));
        assert!(!config.is_zero(1e-3, 1e8));
    }

    #[test]
    fn test_with_tolerance() {
        let config = InvertConfig::new().with_tolerance(-0.5);
        assert_eq!(config.tolerance, 0.5);
        assert!(config.is_zero(0.25, 1.0));
        assert!(!config.is_zero(0.75, 1.0));
        assert!(config.is_zero(0.75, 2.0));
    }

    #[test]
    fn test_config_from_json() {
        let config: InvertConfig = serde_json::from_str(r#"{"tolerance": 1e-9}"#).unwrap();
        assert_eq!(config, InvertConfig::new().with_tolerance(1e-9));
    }
}
