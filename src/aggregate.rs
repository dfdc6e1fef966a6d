//! Sample aggregation
//!
//! Reduces the follower-count samples extracted from one upstream response
//! to a single representative integer via arithmetic mean.

/// Aggregates a batch of textual samples into one rounded integer.
///
/// An empty batch yields `None`. Any sample that fails to parse as a
/// number rejects the whole batch, treating the fetch as failed rather
/// than averaging a partial set; the upstream response shape is not under
/// our control, and a response with garbage in it is not trusted at all.
/// Rounding is half-away-from-zero.
pub fn aggregate(samples: &[String]) -> Option<i64> {
    if samples.is_empty() {
        return None;
    }

    let mut sum = 0.0;
    for sample in samples {
        sum += sample.trim().parse::<f64>().ok()?;
    }

    let mean = sum / samples.len() as f64;
    if !mean.is_finite() {
        return None;
    }
    Some(mean.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_batch_yields_none() {
        assert_eq!(aggregate(&[]), None);
    }

    #[test]
    fn test_single_sample() {
        assert_eq!(aggregate(&batch(&["7"])), Some(7));
    }

    #[test]
    fn test_mean_of_multiple_samples() {
        assert_eq!(aggregate(&batch(&["10", "20", "30"])), Some(20));
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        // mean of 1 and 2 is 1.5, which rounds up to 2
        assert_eq!(aggregate(&batch(&["1", "2"])), Some(2));
        // mean of 10 and 11 is 10.5, rounds to 11
        assert_eq!(aggregate(&batch(&["10", "11"])), Some(11));
        // mean of 10, 10, 11 is 10.33..., rounds to 10
        assert_eq!(aggregate(&batch(&["10", "10", "11"])), Some(10));
    }

    #[test]
    fn test_non_numeric_sample_rejects_whole_batch() {
        assert_eq!(aggregate(&batch(&["10", "oops", "30"])), None);
        assert_eq!(aggregate(&batch(&["not a number"])), None);
    }

    #[test]
    fn test_whitespace_around_samples_is_tolerated() {
        assert_eq!(aggregate(&batch(&[" 10 ", "20"])), Some(15));
    }
}
