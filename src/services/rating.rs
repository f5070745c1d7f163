// src/services/rating.rs
// DOCUMENTATION: Embedded review aggregate arithmetic
// PURPOSE: Keep `average_rating`/`total_ratings` consistent with review writes

/// Average shown for a listing with no reviews
pub const DEFAULT_AVERAGE_RATING: f64 = 3.5;

/// Average rating and review count stored on each listing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingAggregate {
    pub average: f64,
    pub count: i32,
}

impl Default for RatingAggregate {
    fn default() -> Self {
        RatingAggregate {
            average: DEFAULT_AVERAGE_RATING,
            count: 0,
        }
    }
}

impl RatingAggregate {
    pub fn new(average: f64, count: i32) -> Self {
        RatingAggregate { average, count }
    }

    /// A new review: `(avg*count + rating) / (count + 1)`
    pub fn with_added(self, rating: i16) -> Self {
        let count = self.count.max(0);
        let total = self.average * count as f64 + rating as f64;
        RatingAggregate::new(clamp(total / (count + 1) as f64), count + 1)
    }

    /// A review's rating changed: `(avg*count - old + new) / count`
    pub fn with_replaced(self, old: i16, new: i16) -> Self {
        if self.count <= 0 {
            return RatingAggregate::default().with_added(new);
        }
        let total = self.average * self.count as f64 - old as f64 + new as f64;
        RatingAggregate::new(clamp(total / self.count as f64), self.count)
    }

    /// A review was deleted. Resets to the default once no reviews remain.
    pub fn with_removed(self, rating: i16) -> Self {
        let remaining = self.count - 1;
        if remaining <= 0 {
            return RatingAggregate::default();
        }
        let total = self.average * self.count as f64 - rating as f64;
        RatingAggregate::new(clamp(total / remaining as f64), remaining)
    }
}

fn clamp(average: f64) -> f64 {
    if average.is_finite() {
        average.clamp(0.0, 5.0)
    } else {
        DEFAULT_AVERAGE_RATING
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_first_review_replaces_default() {
        let agg = RatingAggregate::default().with_added(4);
        assert_eq!(agg.count, 1);
        assert!(approx(agg.average, 4.0));
    }

    #[test]
    fn test_running_average() {
        let agg = RatingAggregate::default()
            .with_added(5)
            .with_added(3)
            .with_added(4);
        assert_eq!(agg.count, 3);
        assert!(approx(agg.average, 4.0));
    }

    #[test]
    fn test_replace_rating() {
        let agg = RatingAggregate::new(4.0, 2).with_replaced(5, 1);
        assert_eq!(agg.count, 2);
        assert!(approx(agg.average, 2.0));
    }

    #[test]
    fn test_remove_rating() {
        let agg = RatingAggregate::new(4.0, 2).with_removed(5);
        assert_eq!(agg.count, 1);
        assert!(approx(agg.average, 3.0));
    }

    #[test]
    fn test_remove_last_review_resets_default() {
        let agg = RatingAggregate::new(2.0, 1).with_removed(2);
        assert_eq!(agg, RatingAggregate::default());
    }

    #[test]
    fn test_average_stays_in_range() {
        // Drifted aggregate (e.g. hand-edited rows) cannot push the average out of 0..5
        let agg = RatingAggregate::new(0.5, 2).with_removed(5);
        assert!(agg.average >= 0.0);
        let agg = RatingAggregate::new(5.0, 1).with_replaced(1, 5).with_added(5);
        assert!(agg.average <= 5.0);
    }
}
