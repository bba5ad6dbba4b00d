use serde::{Deserialize, Serialize};

/// Point values applied to each vote type when computing a score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VotePoints {
    pub up: f64,
    pub down: f64,
}

impl VotePoints {
    pub fn new(up: f64, down: f64) -> Self {
        Self { up, down }
    }

    /// `up * up_count + down * down_count`
    pub fn score(&self, up_count: i64, down_count: i64) -> f64 {
        self.up * up_count as f64 + self.down * down_count as f64
    }
}

impl Default for VotePoints {
    fn default() -> Self {
        Self { up: 1.0, down: -1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_score() {
        let points = VotePoints::default();
        assert_eq!(points.score(0, 0), 0.0);
        assert_eq!(points.score(3, 1), 2.0);
        assert_eq!(points.score(1, 4), -3.0);
    }

    #[test]
    fn test_weighted_points_score() {
        let points = VotePoints::new(2.5, -0.5);
        assert_eq!(points.score(2, 3), 3.5);
    }
}
