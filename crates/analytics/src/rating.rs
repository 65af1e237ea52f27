//! Rating arithmetic shared by every aggregate.
//!
//! A rating counts only if it is an integer in `[1, 5]`. Anything else is
//! excluded from *all* aggregates (histogram, sums, per-category, per-tag,
//! per-product and per-user) and reported as skipped.

use serde::{Serialize, Serializer};
use std::fmt;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Ratings at or above this are positive / "high"
pub const HIGH_RATING: i32 = 4;
/// Ratings at or below this are negative / "low"
pub const LOW_RATING: i32 = 2;

/// Number of histogram buckets (one per star)
pub const BUCKETS: usize = (MAX_RATING - MIN_RATING + 1) as usize;

pub fn is_valid_rating(rating: i32) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

/// Histogram bucket for a rating, `None` when out of range
pub fn bucket(rating: i32) -> Option<usize> {
    is_valid_rating(rating).then(|| (rating - MIN_RATING) as usize)
}

/// Round to one decimal place, half away from zero
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// An average rating rounded to one decimal place.
///
/// Serializes as a string with exactly one decimal (`"3.7"`, `"5.0"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Average(f64);

impl Average {
    /// `round(sum / count, 1)`, or zero when nothing was counted
    pub fn of(sum: i64, count: u32) -> Self {
        if count == 0 {
            Average(0.0)
        } else {
            Average(round1(sum as f64 / count as f64))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl Serialize for Average {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Running sum and count of valid ratings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingTally {
    pub sum: i64,
    pub count: u32,
}

impl RatingTally {
    pub fn add(&mut self, rating: i32) {
        self.sum += i64::from(rating);
        self.count += 1;
    }

    pub fn merge(&mut self, other: RatingTally) {
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn average(&self) -> Average {
        Average::of(self.sum, self.count)
    }
}

/// Coarse sentiment bucket of a single review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn of(rating: i32) -> Self {
        if rating >= HIGH_RATING {
            Sentiment::Positive
        } else if rating <= LOW_RATING {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets() {
        assert_eq!(bucket(1), Some(0));
        assert_eq!(bucket(5), Some(4));
        assert_eq!(bucket(0), None);
        assert_eq!(bucket(6), None);
        assert_eq!(bucket(-3), None);
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        assert_eq!(Average::of(11, 3).value(), 3.7);
        assert_eq!(Average::of(9, 2).value(), 4.5);
        assert_eq!(Average::of(0, 0).value(), 0.0);
        assert_eq!(Average::of(5, 1).to_string(), "5.0");
    }

    #[test]
    fn test_average_serializes_as_string() {
        let json = serde_json::to_string(&Average::of(11, 3)).unwrap();
        assert_eq!(json, "\"3.7\"");
    }

    #[test]
    fn test_sentiment_thresholds() {
        assert_eq!(Sentiment::of(5), Sentiment::Positive);
        assert_eq!(Sentiment::of(4), Sentiment::Positive);
        assert_eq!(Sentiment::of(3), Sentiment::Neutral);
        assert_eq!(Sentiment::of(2), Sentiment::Negative);
        assert_eq!(Sentiment::of(1), Sentiment::Negative);
    }
}
