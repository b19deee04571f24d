//! Confidence normalization
//!
//! Specialist output is noisy, so malformed confidences are normalized rather
//! than rejected.

/// Confidence assigned when a response does not report one
pub const DEFAULT_CONFIDENCE: f64 = 0.7;

/// Facts below this confidence block convergence
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.4;

/// Normalize a reported confidence into [0.0, 1.0]
///
/// Non-finite values (NaN, ±∞) become 0.0.
///
/// # Examples
///
/// ```
/// use swarmboard_domain::normalize_confidence;
///
/// assert_eq!(normalize_confidence(0.85), 0.85);
/// assert_eq!(normalize_confidence(3.0), 1.0);
/// assert_eq!(normalize_confidence(-0.2), 0.0);
/// assert_eq!(normalize_confidence(f64::NAN), 0.0);
/// ```
pub fn normalize_confidence(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_untouched() {
        assert_eq!(normalize_confidence(0.0), 0.0);
        assert_eq!(normalize_confidence(0.4), 0.4);
        assert_eq!(normalize_confidence(1.0), 1.0);
    }

    #[test]
    fn test_infinities() {
        assert_eq!(normalize_confidence(f64::INFINITY), 0.0);
        assert_eq!(normalize_confidence(f64::NEG_INFINITY), 0.0);
    }
}
