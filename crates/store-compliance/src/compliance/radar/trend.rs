use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// Movement of a zone's risk score against the preceding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
    pub delta: i64,
    pub direction: TrendDirection,
    /// Whole-percent change, zero when the previous window scored zero.
    pub percentage: i64,
}

impl Trend {
    pub fn between(current: i64, previous: i64) -> Self {
        let delta = current - previous;
        let direction = match delta {
            d if d > 0 => TrendDirection::Up,
            d if d < 0 => TrendDirection::Down,
            _ => TrendDirection::Stable,
        };
        let percentage = if previous == 0 {
            0
        } else {
            // Halves round towards positive infinity.
            (delta as f64 * 100.0 / previous as f64 + 0.5).floor() as i64
        };

        Self {
            delta,
            direction,
            percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_previous_score_reports_zero_percent() {
        let trend = Trend::between(10, 0);
        assert_eq!(trend.delta, 10);
        assert_eq!(trend.direction, TrendDirection::Up);
        assert_eq!(trend.percentage, 0);
    }

    #[test]
    fn percentage_is_relative_to_previous_window() {
        assert_eq!(Trend::between(15, 10).percentage, 50);
        let falling = Trend::between(6, 9);
        assert_eq!(falling.direction, TrendDirection::Down);
        assert_eq!(falling.delta, -3);
        assert_eq!(falling.percentage, -33);
        let flat = Trend::between(7, 7);
        assert_eq!(flat.direction, TrendDirection::Stable);
        assert_eq!(flat.percentage, 0);
    }
}
